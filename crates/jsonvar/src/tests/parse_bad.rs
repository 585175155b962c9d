use crate::{parse_str, parse_units, SyntaxError};

fn fail(input: &str) -> crate::ParseError {
    let err = parse_str(input).unwrap_err();
    let units: Vec<u16> = input.encode_utf16().collect();
    assert_eq!(
        parse_units(&units).unwrap_err(),
        err,
        "parsers disagree on {input:?}"
    );
    err
}

#[test]
fn empty_input() {
    let err = fail("");
    assert_eq!(err.kind, SyntaxError::UnexpectedEndOfInput);
    assert_eq!((err.line, err.column), (1, 0));

    let err = fail("  // only trivia\n");
    assert_eq!(err.kind, SyntaxError::UnexpectedEndOfInput);
    assert_eq!(err.line, 2);
}

#[test]
fn unterminated_string() {
    let err = fail("\"abc");
    assert_eq!(err.kind, SyntaxError::UnterminatedString);
    assert_eq!((err.line, err.column), (1, 4));

    let err = fail("\"ab\\");
    assert_eq!(err.kind, SyntaxError::UnterminatedString);
}

#[test]
fn unterminated_comment() {
    let err = fail("/* never closed");
    assert_eq!(err.kind, SyntaxError::UnterminatedComment);
}

#[test]
fn missing_colon() {
    let err = fail("{\"a\" 1}");
    assert_eq!(err.kind, SyntaxError::Expected(':'));
}

#[test]
fn missing_separator() {
    let err = fail("[1 2]");
    assert_eq!(err.kind, SyntaxError::Expected(','));
    let err = fail("{\"a\": 1 \"b\": 2}");
    assert_eq!(err.kind, SyntaxError::Expected(','));
}

#[test]
fn unclosed_containers() {
    assert_eq!(fail("{").kind, SyntaxError::Expected('}'));
    assert_eq!(fail("{\"a\": 1,").kind, SyntaxError::Expected('}'));
    assert_eq!(fail("[1,").kind, SyntaxError::Expected(']'));
    assert_eq!(fail("{\"a\":").kind, SyntaxError::UnexpectedEndOfInput);
}

#[test]
fn bad_unicode_escape() {
    let err = fail("\"\\u00G1\"");
    assert_eq!(err.kind, SyntaxError::InvalidUnicodeEscape('G'));

    let err = fail("\"\\u12");
    assert_eq!(err.kind, SyntaxError::InvalidUnicodeEscape('\0'));
}

#[test]
fn garbage_tokens() {
    let err = fail("hello");
    assert_eq!(err.kind, SyntaxError::UnexpectedToken("hello".to_owned()));
    // Case matters for the literal tokens.
    assert_eq!(
        fail("TRUE").kind,
        SyntaxError::UnexpectedToken("TRUE".to_owned())
    );
    assert_eq!(
        fail("nan").kind,
        SyntaxError::UnexpectedToken("nan".to_owned())
    );
}

#[test]
fn stray_punctuation() {
    let err = fail("[\n1,\n:");
    assert_eq!(err.kind, SyntaxError::InvalidCharacter(':'));
    assert_eq!((err.line, err.column), (3, 0));
}

#[test]
fn trailing_content() {
    let err = fail("1 x");
    assert_eq!(err.kind, SyntaxError::InvalidCharacter('x'));
    assert_eq!((err.line, err.column), (1, 2));

    assert_eq!(fail("{} {}").kind, SyntaxError::InvalidCharacter('{'));
}

#[test]
fn missing_property_name() {
    let err = fail("{:1}");
    assert_eq!(err.kind, SyntaxError::ExpectedPropertyName);
}

#[test]
fn errors_render_with_position() {
    let err = fail("[1 2]");
    assert_eq!(err.to_string(), "expected ',' at 1:3");
}
