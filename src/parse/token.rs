use logos::Logos;

#[derive(Debug, PartialEq, Logos, Clone, Copy)]
pub enum Token {
    #[regex(r"[ \f\r\t\v]+")]
    WhiteSpace,

    #[token("\n")]
    NewLine,

    #[token(",")]
    Comma,

    #[regex(r#""([^"]|"")*""#)]
    String,

    #[regex(r"\d\d?-\d\d?-\d\d\d\d")]
    Date,

    #[regex(r"[\-\+]?\d+(\.\d*)?")]
    #[regex(r"[\-\+]?\.\d+")]
    Number,

    #[error]
    Error,
}
