//! # tally2ledger
//!
//! tally2ledger converts the comma-separated voucher export of Tally into
//! ledger journal entries, optionally renaming accounts and payees on the way.
//!
//! ```no_run
//! use tally2ledger::{Export, RuleTable};
//!
//! let (mut export, errors) = Export::from_file("daybook.txt").unwrap();
//! for error in &errors {
//!     eprintln!("{}", error);
//! }
//! export.rewrite(&RuleTable::from_file("rules.json").unwrap());
//! print!("{}", export.to_ledger());
//! ```

mod export;
mod ledger;
pub mod parse;
pub mod rules;
pub mod utils;

pub use export::Export;
pub use ledger::*;
pub use rules::{RuleTable, RuleTarget};
