use thiserror::Error;

/// A syntactic violation together with where it happened.
///
/// `line` is 1-based; `column` is a 0-based unit offset within the line
/// (code units for the UTF-16 parser, bytes for the UTF-8 parser).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    pub kind: SyntaxError,
    pub line: usize,
    pub column: usize,
}

/// What went wrong, without the position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("expected '{0}'")]
    Expected(char),
    #[error("expected a property name")]
    ExpectedPropertyName,
    #[error("invalid unicode escape at '{0}'")]
    InvalidUnicodeEscape(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

impl SyntaxError {
    pub(crate) fn at(self, line: usize, column: usize) -> ParseError {
        ParseError {
            kind: self,
            line,
            column,
        }
    }
}
