use super::lexer::Lexer;
use super::term::{Field, Term};
use super::token::Token;
use crate::{Error, ErrorLevel, ErrorType, Source, SrcFile};
use std::borrow::Cow;

/// Splits the text of a Tally export into [`Field`]s.
///
/// The grammar is `field (',' field)*`, where a field is a date, a quoted
/// string, a number, or nothing at all. `n` separators always produce `n + 1`
/// fields.
pub struct Parser<'source> {
    lexer: Lexer<'source, Token>,
    file: SrcFile,
}

impl<'source> Parser<'source> {
    pub fn new(src: &'source str, file: SrcFile) -> Self {
        Parser {
            lexer: Lexer::new(src, file.clone()),
            file,
        }
    }

    fn unexpected(&self, token: Token, text: &str) -> Error {
        Error {
            level: ErrorLevel::Error,
            r#type: ErrorType::Syntax,
            msg: format!("Unexpected token {:?}({}), expect a separator.", token, text),
            src: Source {
                file: self.file.clone(),
                start: self.lexer.location(),
                end: self.lexer.location().advance(text.chars().count()),
            },
            voucher: None,
        }
    }

    #[inline]
    fn remove_quotes(input: &str) -> Cow<'_, str> {
        let mut chars = input.chars();
        chars.next();
        chars.next_back();
        let inner = chars.as_str();
        if inner.contains("\"\"") {
            Cow::Owned(inner.replace("\"\"", "\""))
        } else {
            Cow::Borrowed(inner)
        }
    }

    fn parse_field(&mut self) -> Field<'source> {
        let start = self.lexer.location();
        let term = match self.lexer.peek() {
            Ok((Token::Date, text)) => Term::Date(text),
            Ok((Token::Number, text)) => Term::Number(text),
            Ok((Token::String, text)) => Term::Text(Self::remove_quotes(text)),
            _ => return Field::new(Term::Empty, start, start),
        };
        self.lexer.consume();
        Field::new(term, start, self.lexer.last_token_end())
    }

    pub fn parse_fields(&mut self) -> Result<Vec<Field<'source>>, Error> {
        let mut fields = Vec::new();
        loop {
            fields.push(self.parse_field());
            if self.lexer.is_eof() {
                break;
            }
            let (token, text) = self.lexer.peek()?;
            if token != Token::Comma {
                return Err(self.unexpected(token, text));
            }
            self.lexer.consume();
        }
        Ok(fields)
    }

    /// Parses the whole of `src`, failing at the first position that is not
    /// a field or a separator.
    pub fn parse(src: &'source str, file: SrcFile) -> Result<Vec<Field<'source>>, Error> {
        Parser::new(src, file).parse_fields()
    }
}
