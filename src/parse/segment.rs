use super::term::{Field, Term};

/// Prefix of the voucher number field that closes every voucher record.
pub const VOUCHER_NO_PREFIX: &str = "(No. :";

/// Returns `true` if `term` is the voucher number field closing a record.
pub fn is_voucher_no(term: &Term) -> bool {
    matches!(term.as_text(), Some(text) if text.starts_with(VOUCHER_NO_PREFIX))
}

/// The fields of one voucher, voucher number field included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup<'source> {
    fields: Vec<Field<'source>>,
}

impl<'source> FieldGroup<'source> {
    pub fn fields(&self) -> &[Field<'source>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'source> From<Vec<Field<'source>>> for FieldGroup<'source> {
    fn from(fields: Vec<Field<'source>>) -> Self {
        FieldGroup { fields }
    }
}

/// Splits the fields of an export into one [`FieldGroup`] per voucher.
///
/// Fields after the last voucher number field do not belong to any voucher
/// and are dropped.
pub fn segment(fields: Vec<Field<'_>>) -> Vec<FieldGroup<'_>> {
    let mut groups = Vec::new();
    let mut pending = Vec::new();
    for field in fields {
        let closes = is_voucher_no(&field.term);
        pending.push(field);
        if closes {
            groups.push(FieldGroup::from(std::mem::take(&mut pending)));
        }
    }
    if !pending.is_empty() {
        log::debug!("Dropped {} trailing fields.", pending.len());
    }
    groups
}
