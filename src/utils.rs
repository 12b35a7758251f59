//! Useful functions for decoding Tally exports.

use crate::{Date, Decimal, Error, ErrorLevel, ErrorType, Source, SrcFile};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Turns the raw bytes of an export into text ready for
/// [`Parser`](crate::parse::Parser): drops the byte-order mark and every
/// CR-LF pair.
pub fn prepare_input(bytes: &[u8], file: &SrcFile) -> Result<String, Error> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    let mut data = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().peekable();
    while let Some(&b) = iter.next() {
        if b == b'\r' && iter.peek() == Some(&&b'\n') {
            iter.next();
            continue;
        }
        data.push(b);
    }
    String::from_utf8(data).map_err(|e| Error {
        msg: format!("Input is not valid UTF-8: {}.", e.utf8_error()),
        src: Source::at(file, (1, 1).into()),
        r#type: ErrorType::Syntax,
        level: ErrorLevel::Error,
        voucher: None,
    })
}

/// Parses a [`Decimal`](crate::Decimal) from a [`&str`].
#[inline]
pub fn parse_decimal(num_str: &str, src: &Source) -> Result<Decimal, Error> {
    match num_str.trim().parse::<Decimal>() {
        Ok(num) => Ok(num),
        Err(_) => Err(Error {
            msg: format!("Invalid number: {}.", num_str),
            src: src.clone(),
            r#type: ErrorType::Decode,
            level: ErrorLevel::Error,
            voucher: None,
        }),
    }
}

/// Parses a `D-M-YYYY` or `DD-MM-YYYY` date.
pub fn parse_date(date_str: &str, src: &Source) -> Result<Date, Error> {
    Date::parse_from_str(date_str.trim(), "%d-%m-%Y").map_err(|_| Error {
        msg: format!("Invalid date: {}.", date_str),
        src: src.clone(),
        r#type: ErrorType::Decode,
        level: ErrorLevel::Error,
        voucher: None,
    })
}
