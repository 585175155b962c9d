use crate::{
    format, format_bytes, parse_str, FormatError, FormatPolicy, ReturnPolicy, SpecialFloatPolicy,
    Variant,
};

fn with_float_policy(special: SpecialFloatPolicy) -> FormatPolicy {
    FormatPolicy {
        special_float_policy: special,
        ..FormatPolicy::one_liner()
    }
}

#[test]
fn scalars() {
    let policy = FormatPolicy::one_liner();
    assert_eq!(format(&Variant::new(), &policy).unwrap(), "null");
    assert_eq!(format(&Variant::from(true), &policy).unwrap(), "true");
    assert_eq!(format(&Variant::from(-7), &policy).unwrap(), "-7");
    assert_eq!(format(&Variant::from(2.5), &policy).unwrap(), "2.5");
    assert_eq!(format(&Variant::from("hi"), &policy).unwrap(), "\"hi\"");
}

#[test]
fn one_liner_containers() {
    let v = parse_str(r#"{"a": 1, "b": [1, 2], "c": {}}"#).unwrap();
    assert_eq!(
        format(&v, &FormatPolicy::one_liner()).unwrap(),
        r#"{"a": 1, "b": [1, 2], "c": {}}"#
    );
}

#[test]
fn special_floats() {
    let nan = Variant::from(f64::NAN);
    assert_eq!(
        format(&nan, &with_float_policy(SpecialFloatPolicy::AsString)).unwrap(),
        "\"NaN\""
    );
    assert_eq!(
        format(&nan, &with_float_policy(SpecialFloatPolicy::AsJsLiteral)).unwrap(),
        "NaN"
    );
    assert_eq!(
        format(&nan, &with_float_policy(SpecialFloatPolicy::Throw)).unwrap_err(),
        FormatError::NonFiniteNumber
    );

    let neg_inf = Variant::from(f64::NEG_INFINITY);
    assert_eq!(
        format(&neg_inf, &with_float_policy(SpecialFloatPolicy::AsJsLiteral)).unwrap(),
        "-Infinity"
    );

    // The JS literals round-trip through the lenient parser.
    let back = parse_str("NaN").unwrap();
    assert!(back.as_double().is_nan());
}

#[test]
fn named_escapes() {
    let v = Variant::from("a\"b\\c\u{8}\t\n\u{c}\r");
    assert_eq!(
        format(&v, &FormatPolicy::one_liner()).unwrap(),
        r#""a\"b\\c\b\t\n\f\r""#
    );
}

#[test]
fn control_characters_always_escape() {
    let v = Variant::from("\u{1}\u{1f}");
    assert_eq!(
        format(&v, &FormatPolicy::one_liner()).unwrap(),
        r#""\u0001\u001F""#
    );
}

#[test]
fn solidus_is_not_escaped() {
    let v = Variant::from("a/b");
    assert_eq!(format(&v, &FormatPolicy::one_liner()).unwrap(), "\"a/b\"");
}

#[test]
fn unicode_escaping_is_opt_in() {
    let v = Variant::from("héllo \u{1F600}");
    assert_eq!(
        format(&v, &FormatPolicy::one_liner()).unwrap(),
        "\"héllo \u{1F600}\""
    );

    let policy = FormatPolicy {
        escape_unicode: true,
        ..FormatPolicy::one_liner()
    };
    assert_eq!(
        format(&v, &policy).unwrap(),
        r#""h\u00E9llo \uD83D\uDE00""#
    );
}

#[test]
fn keys_are_escaped() {
    let v = Variant::new();
    v.set("a\"b", 1);
    assert_eq!(
        format(&v, &FormatPolicy::one_liner()).unwrap(),
        r#"{"a\"b": 1}"#
    );
}

#[test]
fn byte_sink_matches_text_sink() {
    let v = parse_str(r#"{"k": ["é", 1.5, null]}"#).unwrap();
    for policy in [
        FormatPolicy::one_liner(),
        FormatPolicy::pretty(),
        FormatPolicy::mixed(),
    ] {
        let text = format(&v, &policy).unwrap();
        let bytes = format_bytes(&v, &policy).unwrap();
        assert_eq!(bytes, text.as_bytes());
    }
}

#[test]
fn every_regime_breaks_empty_containers() {
    let policy = FormatPolicy {
        return_policy: ReturnPolicy::Every,
        indent: "  ".to_owned(),
        ..FormatPolicy::one_liner()
    };
    let v = parse_str("[[]]").unwrap();
    assert_eq!(format(&v, &policy).unwrap(), "[\n  [\n  ]\n]");

    let except_empty = FormatPolicy::pretty();
    assert_eq!(format(&v, &except_empty).unwrap(), "[\n  []\n]");
}

#[test]
fn simple_regime_keeps_flat_containers_inline() {
    let v = parse_str(r#"{"a": 1, "b": [1, 2], "c": {"deep": [3]}}"#).unwrap();
    let text = format(&v, &FormatPolicy::mixed()).unwrap();
    // "b" is simple and stays inline; "c" holds a composite value, so it
    // breaks out, while the [3] inside it is simple again.
    assert_eq!(
        text,
        "{\n  \"a\": 1,\n  \"b\": [1, 2],\n  \"c\": {\n    \"deep\": [3]\n  }\n}"
    );
}

#[test]
fn display_uses_the_compact_form() {
    let v = parse_str(r#"{"n": NaN, "xs": [1]}"#).unwrap();
    assert_eq!(v.to_string(), r#"{"n": NaN, "xs": [1]}"#);
}
