//! Renaming of accounts and payees after vouchers are built.
//!
//! A rule file is a JSON document like
//!
//! ```json
//! {
//!     "accountname": {
//!         "HDFC Bank": "Assets:Bank:HDFC",
//!         "Suspense": { "dr": "Expenses:Unknown", "cr": "Income:Unknown" }
//!     },
//!     "payee": { "Payee": "Tally" }
//! }
//! ```
//!
//! Names are matched exactly. Rewriting never touches amounts, the number of
//! postings, their order or their side.

use crate::{Error, ErrorLevel, ErrorType, Location, Posting, Source, SrcFile, Voucher};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

/// The replacement of an account name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleTarget {
    /// Used on both sides.
    Uniform(String),
    /// One name for debit postings and one for credit postings.
    Split {
        #[serde(rename = "dr")]
        debit: String,
        #[serde(rename = "cr")]
        credit: String,
    },
}

impl RuleTarget {
    pub fn debit(&self) -> &str {
        match self {
            RuleTarget::Uniform(name) => name,
            RuleTarget::Split { debit, .. } => debit,
        }
    }

    pub fn credit(&self) -> &str {
        match self {
            RuleTarget::Uniform(name) => name,
            RuleTarget::Split { credit, .. } => credit,
        }
    }
}

/// Account and payee renaming rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleTable {
    #[serde(rename = "accountname")]
    account_rules: HashMap<String, RuleTarget>,
    #[serde(rename = "payee")]
    payee_rules: HashMap<String, String>,
}

impl RuleTable {
    /// Parses a rule table from JSON text. Both `accountname` and `payee` must
    /// be present.
    pub fn from_json(text: &str, file: &SrcFile) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error {
            msg: format!("Invalid rule file: {}.", e),
            src: Source::at(file, Location::from((e.line(), e.column()))),
            r#type: ErrorType::Rules,
            level: ErrorLevel::Error,
            voucher: None,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        let file = Arc::new(path.to_string());
        let text = fs::read_to_string(path).map_err(|e| Error {
            msg: format!("Couldn't read {}: {:?}", path, e),
            src: Source::at(&file, (1, 1).into()),
            r#type: ErrorType::Io,
            level: ErrorLevel::Error,
            voucher: None,
        })?;
        let table = Self::from_json(&text, &file)?;
        log::debug!(
            "Loaded {} account rules and {} payee rules from {}.",
            table.account_rules.len(),
            table.payee_rules.len(),
            path
        );
        Ok(table)
    }

    pub fn account_rules(&self) -> &HashMap<String, RuleTarget> {
        &self.account_rules
    }

    pub fn payee_rules(&self) -> &HashMap<String, String> {
        &self.payee_rules
    }

    pub fn is_empty(&self) -> bool {
        self.account_rules.is_empty() && self.payee_rules.is_empty()
    }

    /// Renames the payee and the accounts of `voucher` in place.
    pub fn rewrite(&self, voucher: &mut Voucher) {
        if let Some(payee) = self.payee_rules.get(&voucher.payee) {
            voucher.payee = payee.clone();
        }
        Self::rename(&mut voucher.debit_postings, RuleTarget::debit, &self.account_rules);
        Self::rename(&mut voucher.credit_postings, RuleTarget::credit, &self.account_rules);
    }

    fn rename(
        postings: &mut [Posting],
        pick: impl Fn(&RuleTarget) -> &str,
        rules: &HashMap<String, RuleTarget>,
    ) {
        for posting in postings.iter_mut() {
            if let Some(target) = rules.get(&posting.account) {
                posting.account = pick(target).to_string();
            }
        }
    }
}
