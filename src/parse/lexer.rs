use super::Token;
use crate::{Error, ErrorLevel, ErrorType, Location, Source, SrcFile};
use logos::{Lexer as LogosLexer, Logos};

pub struct Lexer<'source, Token: Logos<'source>> {
    llex: LogosLexer<'source, Token>,
    location: Location,
    last_token_end: Location,
    peeked_token: Option<(Token, &'source str)>,
    file: SrcFile,
}

impl<'source> Lexer<'source, Token> {
    pub fn new(src: &'source str, file: SrcFile) -> Self {
        let mut lexer = Lexer {
            llex: Token::lexer(src),
            location: (1, 1).into(),
            last_token_end: (1, 1).into(),
            peeked_token: None,
            file,
        };
        lexer.skip_space();
        lexer
    }

    pub fn last_token_end(&self) -> Location {
        self.last_token_end
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_eof(&self) -> bool {
        self.peeked_token.is_none()
    }

    fn skip_space(&mut self) {
        while let Some(token) = self.llex.next() {
            match token {
                Token::NewLine => {
                    self.location.col = 1;
                    self.location.line += 1;
                }
                Token::WhiteSpace => self.location.col += self.llex.slice().chars().count(),
                _ => {
                    self.peeked_token = Some((token, self.llex.slice()));
                    return;
                }
            }
        }
    }

    pub fn peek(&mut self) -> Result<(Token, &'source str), Error> {
        let error = Error {
            msg: "Unexpected end of file.".to_string(),
            src: Source::at(&self.file, self.location),
            r#type: ErrorType::Syntax,
            level: ErrorLevel::Error,
            voucher: None,
        };
        self.peeked_token.ok_or(error)
    }

    #[inline]
    pub fn consume(&mut self) {
        if let Some((_, text)) = self.peeked_token.take() {
            // quoted strings may still span lines when only a bare LF was left
            for c in text.chars() {
                if c == '\n' {
                    self.location.col = 1;
                    self.location.line += 1;
                } else {
                    self.location.col += 1;
                }
            }
            self.last_token_end = self.location;
            self.skip_space();
        }
    }
}
