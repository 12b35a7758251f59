use crate::Location;
use std::borrow::Cow;
use std::fmt;

/// A single comma-separated field of a Tally export.
///
/// Dates and numbers keep their text so that a malformed value only spoils the
/// voucher it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term<'source> {
    /// A `D-M-YYYY` date.
    Date(&'source str),
    /// A quoted string with the quotes removed.
    Text(Cow<'source, str>),
    /// An unquoted number.
    Number(&'source str),
    /// Nothing between two separators.
    Empty,
}

impl<'source> Term<'source> {
    /// Returns the text of a [`Term::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Term::Text(text) => Some(text),
            _ => None,
        }
    }

    /// `true` for [`Term::Empty`] and for strings holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Term::Empty => true,
            Term::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

impl<'source> fmt::Display for Term<'source> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Date(text) | Term::Number(text) => f.write_str(text),
            Term::Text(text) => write!(f, "{:?}", text),
            Term::Empty => f.write_str("<empty>"),
        }
    }
}

/// A [`Term`] plus where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'source> {
    pub term: Term<'source>,
    pub start: Location,
    pub end: Location,
}

impl<'source> Field<'source> {
    pub fn new(term: Term<'source>, start: Location, end: Location) -> Self {
        Field { term, start, end }
    }
}
