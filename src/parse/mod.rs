//! Turns the text of a Tally export into [`Voucher`](crate::Voucher)s:
//! fields, then one [`FieldGroup`] per voucher, then a [`Classified`] record
//! that builds the voucher.

mod builder;
mod lexer;
mod parser;
mod record;
mod segment;
mod term;
mod token;

pub use builder::DEFAULT_PAYEE;
pub use lexer::Lexer;
pub use parser::Parser;
pub use record::{
    amount_index, classify, dcpartition, is_payment_mode, Block, Classified, Partition, Record,
    VoucherFields, BLOCK_LEN, KIND_INDEX, PARTITION_BASE, PAYMENT_MODES, SKIP_LEN, TAIL_RESERVE,
};
pub use segment::{is_voucher_no, segment, FieldGroup, VOUCHER_NO_PREFIX};
pub use term::{Field, Term};
pub use token::Token;
