//! Classification of [`FieldGroup`]s and the positional layout of voucher
//! records.
//!
//! A record starts with a fixed header (date, first account, kind and the
//! amount of the first posting) followed by posting blocks of eight fields.
//! Blocks whose account field names a payment mode such as `Cash` are only
//! four fields long and carry no posting. The last eight fields hold notes
//! and the voucher number.

use super::segment::FieldGroup;
use super::term::{Field, Term};
use crate::{
    Error, ErrorLevel, ErrorType, KindCounts, Location, Ordinal, Source, SrcFile, VoucherKind,
};

pub const DATE_INDEX: usize = 0;
pub const NAME_INDEX: usize = 1;
pub const KIND_INDEX: usize = 4;
/// Where the first posting block may start.
pub const PARTITION_BASE: usize = 7;
pub const BLOCK_LEN: usize = 8;
/// Length of a payment mode block.
pub const SKIP_LEN: usize = 4;
/// Fields at the end of a record that never hold a posting block.
pub const TAIL_RESERVE: usize = 8;

const BLOCK_NAME: usize = 1;
const BLOCK_AMOUNT: usize = 2;

/// Payment modes annotating the account field of a block that is not a
/// posting.
pub const PAYMENT_MODES: [&str; 5] = [
    "Cash",
    "Cheque",
    "Cheque/DD",
    "Electronic DD/PO",
    "Inter Bank Transfer",
];

pub fn is_payment_mode(term: &Term) -> bool {
    term.as_text()
        .map_or(false, |text| PAYMENT_MODES.contains(&text.trim()))
}

/// Index of the first posting's amount in the header.
pub fn amount_index(kind: VoucherKind) -> usize {
    match kind {
        VoucherKind::Journal | VoucherKind::Payment => 5,
        VoucherKind::Receipt | VoucherKind::Contra => 6,
    }
}

/// Posting block offsets found by [`dcpartition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Start of each posting block.
    pub offsets: Vec<usize>,
    /// Where the scan stopped; notes start here.
    pub end: usize,
}

/// Locates the posting blocks of a record, starting at `base`.
///
/// Scans in strides of [`BLOCK_LEN`] while a whole block plus the
/// [`TAIL_RESERVE`] still fits. A block whose account field is a payment mode
/// is not recorded and advances the scan by [`SKIP_LEN`] only; such a block
/// is consumed as long as its own four fields fit before the reserve.
pub fn dcpartition(fields: &[Field], base: usize) -> Partition {
    let mut offsets = Vec::new();
    let mut offset = base;
    while offset + SKIP_LEN + TAIL_RESERVE <= fields.len() {
        if is_payment_mode(&fields[offset + BLOCK_NAME].term) {
            offset += SKIP_LEN;
            continue;
        }
        if offset + BLOCK_LEN + TAIL_RESERVE > fields.len() {
            break;
        }
        offsets.push(offset);
        offset += BLOCK_LEN;
    }
    Partition {
        offsets,
        end: offset,
    }
}

/// The fields of one posting block.
#[derive(Debug, Clone, Copy)]
pub struct Block<'g> {
    fields: &'g [Field<'g>],
}

impl<'g> Block<'g> {
    pub fn name(&self) -> &'g Field<'g> {
        &self.fields[BLOCK_NAME]
    }

    /// Fields that may hold the amount, in scan order.
    pub fn amount_fields(&self) -> &'g [Field<'g>] {
        &self.fields[BLOCK_AMOUNT..]
    }
}

/// A voucher record with every field at its place.
#[derive(Debug, Clone)]
pub struct VoucherFields<'g> {
    pub date: &'g Field<'g>,
    pub name: &'g Field<'g>,
    pub amount: &'g Field<'g>,
    pub blocks: Vec<Block<'g>>,
    pub notes: &'g [Field<'g>],
}

/// A record laid out according to its kind.
#[derive(Debug, Clone)]
pub enum Record<'g> {
    Journal(VoucherFields<'g>),
    Receipt(VoucherFields<'g>),
    Payment(VoucherFields<'g>),
    Contra(VoucherFields<'g>),
}

/// A [`FieldGroup`] whose kind is known, numbered among the vouchers of that
/// kind.
#[derive(Debug, Clone)]
pub struct Classified<'g> {
    pub ordinal: Ordinal,
    pub fields: &'g [Field<'g>],
    pub file: SrcFile,
}

/// Reads the kind of a voucher and assigns it the next [`Ordinal`] of that
/// kind. Any kind other than `Jrnl`, `Rcpt`, `Pymt` or `Ctra` is an
/// [`ErrorType::Unsupported`] error.
pub fn classify<'g>(
    group: &'g FieldGroup<'g>,
    counts: &mut KindCounts,
    file: &SrcFile,
) -> Result<Classified<'g>, Error> {
    let fields = group.fields();
    let kind = match fields.get(KIND_INDEX) {
        Some(field) => field
            .term
            .as_text()
            .and_then(VoucherKind::from_code)
            .ok_or_else(|| Error {
                msg: format!("Unsupported voucher type: {}.", field.term),
                src: Source {
                    file: file.clone(),
                    start: field.start,
                    end: field.end,
                },
                r#type: ErrorType::Unsupported,
                level: ErrorLevel::Error,
                voucher: None,
            })?,
        None => {
            let start = fields.first().map_or(Location::default(), |f| f.start);
            return Err(Error {
                msg: format!("Voucher type is missing, record has {} fields.", fields.len()),
                src: Source::at(file, start),
                r#type: ErrorType::Unsupported,
                level: ErrorLevel::Error,
                voucher: None,
            });
        }
    };
    Ok(Classified {
        ordinal: counts.next(kind),
        fields,
        file: file.clone(),
    })
}

impl<'g> Classified<'g> {
    pub fn kind(&self) -> VoucherKind {
        self.ordinal.kind
    }

    /// The range of the record in the export.
    pub fn src(&self) -> Source {
        let start = self.fields.first().map_or(Location::default(), |f| f.start);
        let end = self.fields.last().map_or(start, |f| f.end);
        Source {
            file: self.file.clone(),
            start,
            end,
        }
    }

    /// A decode error at `field`, attributed to this voucher.
    pub fn error(&self, field: &Field, msg: String) -> Error {
        Error {
            msg,
            src: Source {
                file: self.file.clone(),
                start: field.start,
                end: field.end,
            },
            r#type: ErrorType::Decode,
            level: ErrorLevel::Error,
            voucher: Some(self.ordinal),
        }
    }

    /// Lays the fields out according to the voucher kind.
    pub fn record(&self) -> Result<Record<'g>, Error> {
        let fields = self.fields;
        let amount_at = amount_index(self.kind());
        if fields.len() <= amount_at {
            let mut error = self.error(
                &fields[fields.len() - 1],
                format!("Voucher has only {} fields.", fields.len()),
            );
            error.src = self.src();
            return Err(error);
        }
        let partition = dcpartition(fields, PARTITION_BASE);
        let layout = VoucherFields {
            date: &fields[DATE_INDEX],
            name: &fields[NAME_INDEX],
            amount: &fields[amount_at],
            blocks: partition
                .offsets
                .iter()
                .map(|&offset| Block {
                    fields: &fields[offset..offset + BLOCK_LEN],
                })
                .collect(),
            notes: fields.get(partition.end..).unwrap_or(&[]),
        };
        Ok(match self.kind() {
            VoucherKind::Journal => Record::Journal(layout),
            VoucherKind::Receipt => Record::Receipt(layout),
            VoucherKind::Payment => Record::Payment(layout),
            VoucherKind::Contra => Record::Contra(layout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn field(term: Term<'static>) -> Field<'static> {
        Field::new(term, Location::default(), Location::default())
    }

    fn text(s: &str) -> Field<'static> {
        field(Term::Text(s.to_string().into()))
    }

    fn empties(n: usize) -> Vec<Field<'static>> {
        (0..n).map(|_| field(Term::Empty)).collect()
    }

    fn header(code: &str) -> Vec<Field<'static>> {
        vec![
            field(Term::Date("1-1-1970")),
            text("Bank A"),
            text(""),
            text(""),
            text(code),
            field(Term::Number("100.00")),
            field(Term::Number("100.00")),
        ]
    }

    fn block(name: &str) -> Vec<Field<'static>> {
        let mut fields = empties(BLOCK_LEN);
        fields[1] = text(name);
        fields[2] = field(Term::Number("100.00"));
        fields
    }

    fn skip(mode: &str) -> Vec<Field<'static>> {
        let mut fields = empties(SKIP_LEN);
        fields[1] = text(mode);
        fields
    }

    fn tail() -> Vec<Field<'static>> {
        let mut fields = empties(TAIL_RESERVE - 2);
        fields.push(text("being settled"));
        fields.push(text("(No. : 1)"));
        fields
    }

    fn record(code: &str, parts: Vec<Vec<Field<'static>>>) -> Vec<Field<'static>> {
        let mut fields = header(code);
        for part in parts {
            fields.extend(part);
        }
        fields.extend(tail());
        fields
    }

    #[test]
    fn partition_single_block() {
        let fields = record("Jrnl", vec![block("Bank B")]);
        let partition = dcpartition(&fields, PARTITION_BASE);
        assert_eq!(partition.offsets, vec![7]);
        assert_eq!(partition.end, 15);
    }

    #[test]
    fn partition_multiple_blocks() {
        let fields = record("Jrnl", vec![block("B"), block("C"), block("D")]);
        let partition = dcpartition(&fields, PARTITION_BASE);
        assert_eq!(partition.offsets, vec![7, 15, 23]);
        assert_eq!(partition.end, 31);
    }

    #[test]
    fn partition_skips_every_payment_mode() {
        for mode in PAYMENT_MODES.iter() {
            let fields = record("Rcpt", vec![skip(mode), block("Customer")]);
            let partition = dcpartition(&fields, PARTITION_BASE);
            assert_eq!(partition.offsets, vec![11], "mode {}", mode);
            assert_eq!(partition.end, 19);
        }
    }

    #[test]
    fn partition_consumes_trailing_payment_mode() {
        let fields = record("Rcpt", vec![block("Customer"), skip("Cash")]);
        let partition = dcpartition(&fields, PARTITION_BASE);
        assert_eq!(partition.offsets, vec![7]);
        assert_eq!(partition.end, 19);

        let fields = record("Rcpt", vec![skip("Cheque")]);
        let partition = dcpartition(&fields, PARTITION_BASE);
        assert!(partition.offsets.is_empty());
        assert_eq!(partition.end, 11);
    }

    #[test]
    fn partition_marker_with_padding() {
        let fields = record("Ctra", vec![skip(" Cash "), block("Bank")]);
        assert_eq!(dcpartition(&fields, PARTITION_BASE).offsets, vec![11]);
    }

    #[test]
    fn partition_keeps_the_tail_reserve() {
        let fields = header("Jrnl")
            .into_iter()
            .chain(block("B"))
            .chain(empties(TAIL_RESERVE - 1))
            .collect::<Vec<_>>();
        let partition = dcpartition(&fields, PARTITION_BASE);
        assert!(partition.offsets.is_empty());
        assert_eq!(partition.end, PARTITION_BASE);
    }

    #[test]
    fn partition_of_a_short_record() {
        let fields = header("Jrnl");
        let partition = dcpartition(&fields[..3], PARTITION_BASE);
        assert!(partition.offsets.is_empty());
    }

    #[test]
    fn classify_numbers_per_kind() {
        let file = Arc::new("test".to_string());
        let groups: Vec<FieldGroup> = ["Rcpt", "Jrnl", "Rcpt"]
            .iter()
            .map(|code| FieldGroup::from(record(code, vec![block("B")])))
            .collect();
        let mut counts = KindCounts::default();
        let classified = groups
            .iter()
            .map(|group| classify(group, &mut counts, &file).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(classified[0].ordinal.seq, 1);
        assert_eq!(classified[1].kind(), VoucherKind::Journal);
        assert_eq!(classified[1].ordinal.seq, 1);
        assert_eq!(classified[2].ordinal.seq, 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn classify_rejects_unknown_kinds() {
        let file = Arc::new("test".to_string());
        let mut counts = KindCounts::default();
        let group = FieldGroup::from(record("Sale", vec![]));
        let err = classify(&group, &mut counts, &file).unwrap_err();
        assert_eq!(err.r#type, ErrorType::Unsupported);
        assert!(err.msg.contains("Sale"));

        let group = FieldGroup::from(vec![field(Term::Date("1-1-1970")), text("(No. : 1)")]);
        let err = classify(&group, &mut counts, &file).unwrap_err();
        assert_eq!(err.r#type, ErrorType::Unsupported);

        let mut fields = header("Jrnl");
        fields[KIND_INDEX] = field(Term::Number("5"));
        let group = FieldGroup::from(fields);
        assert!(classify(&group, &mut counts, &file).is_err());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn record_layout_follows_kind() {
        let file = Arc::new("test".to_string());
        let mut counts = KindCounts::default();
        let group = FieldGroup::from(record("Rcpt", vec![skip("Cash"), block("Customer")]));
        let classified = classify(&group, &mut counts, &file).unwrap();
        match classified.record().unwrap() {
            Record::Receipt(layout) => {
                assert_eq!(layout.amount.term, Term::Number("100.00"));
                assert_eq!(layout.blocks.len(), 1);
                assert_eq!(layout.blocks[0].name().term, Term::Text("Customer".into()));
                assert_eq!(layout.notes.len(), TAIL_RESERVE);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn record_too_short() {
        let file = Arc::new("test".to_string());
        let mut counts = KindCounts::default();
        let group = FieldGroup::from(header("Rcpt")[..6].to_vec());
        let classified = classify(&group, &mut counts, &file).unwrap();
        let err = classified.record().unwrap_err();
        assert_eq!(err.r#type, ErrorType::Decode);
        assert_eq!(err.voucher, Some(classified.ordinal));
    }
}
