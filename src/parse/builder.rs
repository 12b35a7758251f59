use super::record::{is_payment_mode, Block, Classified, Record, VoucherFields};
use super::segment::VOUCHER_NO_PREFIX;
use super::term::{Field, Term};
use crate::utils::{parse_date, parse_decimal};
use crate::{Date, Decimal, Error, Posting, Source, Voucher};

/// Payee of every voucher; Tally exports do not carry one.
pub const DEFAULT_PAYEE: &str = "Payee";

/// The side the header posting of a voucher is booked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Debit,
    Credit,
}

impl<'g> Classified<'g> {
    /// Decodes the record into a [`Voucher`].
    pub fn build(&self) -> Result<Voucher, Error> {
        match self.record()? {
            Record::Journal(fields) => self.build_journal(fields),
            Record::Receipt(fields) => self.build_receipt(fields),
            Record::Payment(fields) => self.build_payment(fields),
            Record::Contra(fields) => self.build_contra(fields),
        }
    }

    fn build_journal(&self, fields: VoucherFields<'g>) -> Result<Voucher, Error> {
        self.assemble(fields, Side::Debit)
    }

    fn build_receipt(&self, fields: VoucherFields<'g>) -> Result<Voucher, Error> {
        self.assemble(fields, Side::Credit)
    }

    fn build_payment(&self, fields: VoucherFields<'g>) -> Result<Voucher, Error> {
        self.assemble(fields, Side::Debit)
    }

    fn build_contra(&self, fields: VoucherFields<'g>) -> Result<Voucher, Error> {
        self.assemble(fields, Side::Credit)
    }

    fn assemble(&self, fields: VoucherFields<'g>, side: Side) -> Result<Voucher, Error> {
        let date = self.decode_date(fields.date)?;
        let account = self.decode_name(fields.name)?;
        let amount = self.decode_amount(fields.amount)?;
        let first = Posting {
            account,
            amount: match side {
                Side::Debit => -amount,
                Side::Credit => amount,
            },
        };

        let mut debit_postings = vec![];
        let mut credit_postings = vec![];
        let mut book = |posting: Posting| {
            if posting.is_debit() {
                debit_postings.push(posting)
            } else {
                credit_postings.push(posting)
            }
        };
        book(first);
        for block in fields.blocks.iter() {
            book(self.decode_block(block)?);
        }

        let notes = fields
            .notes
            .iter()
            .filter(|field| !is_payment_mode(&field.term))
            .filter_map(|field| field.term.as_text())
            .map(str::trim)
            .filter(|note| !note.is_empty() && !note.starts_with(VOUCHER_NO_PREFIX))
            .map(str::to_string)
            .collect();

        Ok(Voucher {
            date,
            kind: self.kind(),
            ordinal: self.ordinal,
            payee: DEFAULT_PAYEE.to_string(),
            debit_postings,
            credit_postings,
            notes,
            src: self.src(),
        })
    }

    fn field_src(&self, field: &Field) -> Source {
        Source {
            file: self.file.clone(),
            start: field.start,
            end: field.end,
        }
    }

    fn attribute(&self, mut error: Error) -> Error {
        error.voucher = Some(self.ordinal);
        error
    }

    fn decode_date(&self, field: &Field) -> Result<Date, Error> {
        match &field.term {
            Term::Date(text) => {
                parse_date(text, &self.field_src(field)).map_err(|e| self.attribute(e))
            }
            Term::Text(text) if !text.trim().is_empty() => {
                parse_date(text, &self.field_src(field)).map_err(|e| self.attribute(e))
            }
            term => Err(self.error(field, format!("Expect a date, found {}.", term))),
        }
    }

    fn decode_name(&self, field: &Field) -> Result<String, Error> {
        match &field.term {
            term if term.is_blank() => Err(self.error(field, "Name is empty.".to_string())),
            Term::Text(text) => Ok(text.trim().to_string()),
            term => Err(self.error(field, format!("Expect a name, found {}.", term))),
        }
    }

    fn decode_amount(&self, field: &Field) -> Result<Decimal, Error> {
        match &field.term {
            term if term.is_blank() => Err(self.error(field, "Amount is empty.".to_string())),
            Term::Number(text) => {
                parse_decimal(text, &self.field_src(field)).map_err(|e| self.attribute(e))
            }
            term => Err(self.error(field, format!("Expect an amount, found {}.", term))),
        }
    }

    /// The amount of a block is its first numeric field after the account.
    /// Quoted text, such as a cheque number, is never an amount.
    fn decode_block(&self, block: &Block<'g>) -> Result<Posting, Error> {
        let account = self.decode_name(block.name())?;
        for field in block.amount_fields() {
            if let Term::Number(text) = &field.term {
                let amount =
                    parse_decimal(text, &self.field_src(field)).map_err(|e| self.attribute(e))?;
                return Ok(Posting { account, amount });
            }
        }
        Err(self.error(
            block.name(),
            format!("No amount found for posting {}.", account),
        ))
    }
}
