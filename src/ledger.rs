pub use chrono::NaiveDate as Date;
use getset::{CopyGetters, Getters};
pub use rust_decimal::Decimal;
use std::convert::From;
use std::fmt;
use std::sync::Arc;

/// Representing a location, line number and column number, in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn advance(&self, width: usize) -> Self {
        Location {
            col: self.col + width,
            line: self.line,
        }
    }
}

impl From<(usize, usize)> for Location {
    fn from(tuple: (usize, usize)) -> Self {
        Location {
            line: tuple.0,
            col: tuple.1,
        }
    }
}

/// A string wrapped in [`Arc`](std::sync::Arc)
/// representing the source file path.
pub type SrcFile = Arc<String>;

/// Represents a range in a source file. Used to trace a [`Voucher`] or an
/// [`Error`] back to the fields of the export it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub file: SrcFile,
    pub start: Location,
    pub end: Location,
}

impl Source {
    pub(crate) fn at(file: &SrcFile, start: Location) -> Self {
        Source {
            file: file.clone(),
            start,
            end: start,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.start.line, self.start.col)
    }
}

/// Kinds of errors that `tally2ledger` encountered while converting an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// IO error, e.g., the input file cannot be read or the output cannot be
    /// written.
    Io,
    /// The export text cannot be split into fields.
    Syntax,
    /// A voucher of a kind other than `Jrnl`, `Rcpt`, `Pymt` or `Ctra`.
    Unsupported,
    /// A field of a voucher is missing or cannot be decoded.
    Decode,
    /// A voucher was decoded but has no posting on one of its sides.
    Incomplete,
    /// The rule file is malformed.
    Rules,
}

/// The level of an error. Vouchers resulting an [`ErrorLevel::Error`] are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

/// Contains the full information of an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    pub msg: String,
    pub src: Source,
    pub r#type: ErrorType,
    pub level: ErrorLevel,
    /// The voucher the error is attributed to, if any.
    pub voucher: Option<Ordinal>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.level)?;
        if let Some(ordinal) = &self.voucher {
            write!(f, "{}: ", ordinal)?;
        }
        write!(
            f,
            "{}\n  {}:{}:{}",
            self.msg, self.src.file, self.src.start.line, self.src.start.col
        )
    }
}

impl std::error::Error for Error {}

/// The kind of a voucher, read from the fifth field of its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoucherKind {
    Journal,
    Receipt,
    Payment,
    Contra,
}

impl VoucherKind {
    pub const ALL: [VoucherKind; 4] = [
        VoucherKind::Journal,
        VoucherKind::Receipt,
        VoucherKind::Payment,
        VoucherKind::Contra,
    ];

    /// Maps the abbreviation used by the export, e.g. `Rcpt`, to a kind.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Jrnl" => Some(VoucherKind::Journal),
            "Rcpt" => Some(VoucherKind::Receipt),
            "Pymt" => Some(VoucherKind::Payment),
            "Ctra" => Some(VoucherKind::Contra),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for VoucherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VoucherKind::Journal => "Journal",
            VoucherKind::Receipt => "Receipt",
            VoucherKind::Payment => "Payment",
            VoucherKind::Contra => "Contra",
        };
        f.write_str(name)
    }
}

/// Identifies a voucher by its kind and its 1-based position among the
/// vouchers of that kind in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal {
    pub kind: VoucherKind,
    pub seq: usize,
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.seq)
    }
}

/// Number of vouchers seen per [`VoucherKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindCounts {
    counts: [usize; 4],
}

impl KindCounts {
    /// Counts one more voucher of `kind` and returns its [`Ordinal`].
    pub fn next(&mut self, kind: VoucherKind) -> Ordinal {
        let count = &mut self.counts[kind.index()];
        *count += 1;
        Ordinal { kind, seq: *count }
    }

    pub fn get(&self, kind: VoucherKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in VoucherKind::ALL.iter() {
            write!(f, "{}: {}, ", kind, self.get(*kind))?;
        }
        write!(f, "Total: {}", self.total())
    }
}

/// A posting like `Bank A -100.00` inside a [`Voucher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub amount: Decimal,
}

impl Posting {
    /// Postings with a negative amount belong to the debit side.
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<40.40}  {:>9.2}",
            self.account,
            self.amount.round_dp(2)
        )
    }
}

/// Represents a voucher reconstructed from a Tally export.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Voucher {
    /// Returns the transaction date.
    #[getset(get_copy = "pub")]
    pub(crate) date: Date,

    /// Returns the voucher kind.
    #[getset(get_copy = "pub")]
    pub(crate) kind: VoucherKind,

    /// Returns the position of this voucher among the vouchers of its kind.
    #[getset(get_copy = "pub")]
    pub(crate) ordinal: Ordinal,

    /// Returns the payee.
    #[getset(get = "pub")]
    pub(crate) payee: String,

    /// Returns the postings with negative amounts.
    #[getset(get = "pub")]
    pub(crate) debit_postings: Vec<Posting>,

    /// Returns the postings with non-negative amounts.
    #[getset(get = "pub")]
    pub(crate) credit_postings: Vec<Posting>,

    /// Returns the free-text notes.
    #[getset(get = "pub")]
    pub(crate) notes: Vec<String>,

    /// Returns the source of this voucher.
    #[getset(get = "pub")]
    pub(crate) src: Source,
}

impl Voucher {
    /// Renders the voucher as ledger lines: a header, the debit postings, the
    /// credit postings and the notes as comments.
    pub fn to_ledger(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(
            1 + self.debit_postings.len() + self.credit_postings.len() + self.notes.len(),
        );
        lines.push(format!("{}  {} ; {}", self.date, self.payee, self.kind));
        for posting in self.debit_postings.iter().chain(self.credit_postings.iter()) {
            lines.push(format!("    {}", posting));
        }
        for note in &self.notes {
            lines.push(format!("    ; {}", note));
        }
        lines
    }
}

impl fmt::Display for Voucher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ledger().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn posting(account: &str, amount: i64) -> Posting {
        Posting {
            account: account.to_string(),
            amount: Decimal::new(amount, 2),
        }
    }

    fn journal() -> Voucher {
        Voucher {
            date: Date::from_ymd_opt(1970, 1, 1).unwrap(),
            kind: VoucherKind::Journal,
            ordinal: Ordinal {
                kind: VoucherKind::Journal,
                seq: 1,
            },
            payee: "Payee".to_string(),
            debit_postings: vec![posting("Bank A", -10000)],
            credit_postings: vec![posting("Bank B", 10000)],
            notes: vec![],
            src: Source::at(&Arc::new("test".to_string()), (1, 1).into()),
        }
    }

    #[test]
    fn render_journal() {
        assert_eq!(
            journal().to_string(),
            "1970-01-01  Payee ; Journal\n\
             \x20   Bank A                                      -100.00\n\
             \x20   Bank B                                       100.00"
        );
    }

    #[test]
    fn render_notes_after_postings() {
        let mut voucher = journal();
        voucher.notes = vec!["being transfer".to_string(), "ref 12".to_string()];
        let lines = voucher.to_ledger();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "    ; being transfer");
        assert_eq!(lines[4], "    ; ref 12");
    }

    #[test]
    fn posting_account_is_truncated_to_40_columns() {
        let long = "A".repeat(45);
        let line = posting(&long, 5).to_string();
        assert_eq!(&line[..40], "A".repeat(40));
        assert_eq!(&line[40..], "       0.05");
    }

    #[test]
    fn posting_amount_has_two_decimals() {
        let p = Posting {
            account: "Cash".to_string(),
            amount: Decimal::from_f64(12.5).unwrap(),
        };
        assert!(p.to_string().ends_with("    12.50"));
        let p = Posting {
            account: "Cash".to_string(),
            amount: Decimal::new(12345, 3),
        };
        assert!(p.to_string().ends_with("    12.34"));
    }

    #[test]
    fn posting_side_follows_sign() {
        assert!(posting("a", -1).is_debit());
        assert!(!posting("a", 0).is_debit());
        assert!(!posting("a", 1).is_debit());
    }

    #[test]
    fn kind_codes() {
        let codes = ["Jrnl", "Rcpt", "Pymt", "Ctra"];
        for (code, kind) in codes.iter().zip(VoucherKind::ALL.iter()) {
            assert_eq!(VoucherKind::from_code(code), Some(*kind));
        }
        assert_eq!(VoucherKind::from_code("Sale"), None);
        assert_eq!(VoucherKind::from_code("jrnl"), None);
    }

    #[test]
    fn counts_assign_ordinals_per_kind() {
        let mut counts = KindCounts::default();
        assert_eq!(counts.next(VoucherKind::Receipt).seq, 1);
        assert_eq!(counts.next(VoucherKind::Journal).seq, 1);
        assert_eq!(counts.next(VoucherKind::Receipt).seq, 2);
        assert_eq!(counts.total(), 3);
        assert_eq!(
            counts.to_string(),
            "Journal: 1, Receipt: 2, Payment: 0, Contra: 0, Total: 3"
        );
    }

    #[test]
    fn error_names_the_voucher() {
        let error = Error {
            msg: "Name is empty.".to_string(),
            src: Source::at(&Arc::new("export.txt".to_string()), (1, 42).into()),
            r#type: ErrorType::Decode,
            level: ErrorLevel::Error,
            voucher: Some(Ordinal {
                kind: VoucherKind::Payment,
                seq: 3,
            }),
        };
        assert_eq!(
            error.to_string(),
            "Error: Payment #3: Name is empty.\n  export.txt:1:42"
        );
    }
}
