use std::sync::Arc;

use crate::{parse_bytes, parse_str, parse_str_with, parse_units, Kind, TempStringCache};

/// Runs the same input through both alphabets and checks they agree
/// before handing back the byte-parser result.
fn parse_both(input: &str) -> crate::Variant {
    let from_bytes = parse_str(input).unwrap();
    let units: Vec<u16> = input.encode_utf16().collect();
    let from_units = parse_units(&units).unwrap();
    assert!(
        from_bytes.equivalent(&from_units, crate::DEFAULT_MAX_DEPTH),
        "parsers disagree on {input:?}: {from_bytes:?} vs {from_units:?}"
    );
    from_bytes
}

#[test]
fn lenient_object() {
    let v = parse_both("{/*c*/ a: 1, b: [1,2,], c:'x', }");
    assert_eq!(v.kind(), Kind::Object);
    assert_eq!(v.get("a").kind(), Kind::Integer);
    assert_eq!(v.get("a").as_long(), 1);
    assert_eq!(v.get("b").kind(), Kind::Array);
    assert_eq!(v.get("b").as_array().count(), 2);
    assert_eq!(v.get("b").at(1).as_long(), 2);
    assert_eq!(v.get("c").kind(), Kind::String);
    assert_eq!(&*v.get("c").as_string(), "x");
}

#[test]
fn escapes_and_line_continuation() {
    // "a\nb\<newline>cA" decodes to a, LF, b, c, A: the literal
    // newline after the backslash is absorbed.
    let v = parse_both("\"a\\nb\\\nc\\u0041\"");
    assert_eq!(&*v.as_string(), "a\nbcA");

    let crlf = parse_both("\"x\\\r\ny\"");
    assert_eq!(&*crlf.as_string(), "xy");

    // Unknown escapes decode to themselves.
    let v = parse_both(r#""q\w\'\/e""#);
    assert_eq!(&*v.as_string(), "qw'/e");
}

#[test]
fn special_float_tokens() {
    assert!(parse_both("NaN").as_double().is_nan());
    assert_eq!(parse_both("Infinity").as_double(), f64::INFINITY);
    assert_eq!(parse_both("-Infinity").as_double(), f64::NEG_INFINITY);
    assert_eq!(parse_both("NaN").kind(), Kind::Float);
}

#[test]
fn literal_tokens() {
    assert!(parse_both("null").is_null());
    assert_eq!(parse_both("true").as_bool(), true);
    assert_eq!(parse_both("false").as_bool(), false);
    assert_eq!(parse_both("true").kind(), Kind::Boolean);
}

#[test]
fn number_leniency() {
    assert_eq!(parse_both("+5").as_long(), 5);
    assert_eq!(parse_both("+5").kind(), Kind::Integer);
    assert_eq!(parse_both("007").as_long(), 7);
    assert_eq!(parse_both("-12").as_long(), -12);

    // Integer first, double as the fallback.
    assert_eq!(parse_both("10").kind(), Kind::Integer);
    assert_eq!(parse_both("2.5").kind(), Kind::Float);
    assert_eq!(parse_both("2.5").as_double(), 2.5);
    assert_eq!(parse_both("1e3").as_double(), 1000.0);

    // A trailing non-digit inside the token stops parsing without error.
    let v = parse_both("123abc");
    assert_eq!(v.kind(), Kind::Float);
    assert_eq!(v.as_double(), 123.0);

    // Wider than i64 falls through to the double parser.
    let wide = parse_both("92233720368547758070");
    assert_eq!(wide.kind(), Kind::Float);
    assert_eq!(wide.as_double(), 9.223_372_036_854_776e19);
}

#[test]
fn quotes_both_ways() {
    assert_eq!(&*parse_both("'it\"s'").as_string(), "it\"s");
    assert_eq!(&*parse_both("\"it's\"").as_string(), "it's");
}

#[test]
fn nested_pick() {
    let v = parse_both("{\"1\":{\"1\":{\"1\":\"hit\"}}}");
    assert_eq!(&*v.pick("1.1.1").as_string(), "hit");
    assert!(v.pick("1.2.1").is_null());
    assert_eq!(&*v.pick(" 1 . 1 . 1 ").as_string(), "hit");
}

#[test]
fn pick_follows_arrays_by_integer_key() {
    let v = parse_both(r#"{"rows": [[1, 2], [3, 4]]}"#);
    assert_eq!(v.pick("rows.1.0").as_long(), 3);
    assert!(v.pick("rows.9.0").is_null());
    assert!(v.pick("rows.x").is_null());
}

#[test]
fn byte_order_marks_are_whitespace() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b" [1] ");
    assert_eq!(parse_bytes(&bytes).unwrap().at(0).as_long(), 1);

    let mut units: Vec<u16> = vec![0xFEFF];
    units.extend("{a:1}".encode_utf16());
    assert_eq!(parse_units(&units).unwrap().get("a").as_long(), 1);
}

#[test]
fn surrogate_escape_pairs() {
    let v = parse_both(r#""😀""#);
    assert_eq!(&*v.as_string(), "\u{1F600}");

    // Unpaired halves decode to the replacement character.
    let lone = parse_str(r#""\uD83Dx""#).unwrap();
    assert_eq!(&*lone.as_string(), "\u{FFFD}x");
}

#[test]
fn non_ascii_passthrough() {
    let v = parse_both(r#"{"greeting": "héllo é"}"#);
    assert_eq!(&*v.get("greeting").as_string(), "héllo é");
}

#[test]
fn invalid_utf8_decodes_lossily() {
    let v = parse_bytes(b"\"a\xFF\xFEb\"").unwrap();
    assert_eq!(&*v.as_string(), "a\u{FFFD}\u{FFFD}b");
}

#[test]
fn repeated_keys_share_one_interned_string() {
    let v = parse_str(r#"[{"key": 1}, {"key": 2}]"#).unwrap();
    let first = v.get(0_usize).as_object().keys()[0].clone();
    let second = v.get(1_usize).as_object().keys()[0].clone();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn escaped_strings_intern_under_the_raw_slice() {
    let v = parse_str(r#"["a\nb", "a\nb"]"#).unwrap();
    let first = v.get(0_usize).as_string();
    let second = v.get(1_usize).as_string();
    assert_eq!(&*first, "a\nb");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn caller_supplied_cache_spans_parses() {
    let mut cache = TempStringCache::new();
    let a = parse_str_with(r#""shared text""#, &mut cache).unwrap();
    let b = parse_str_with(r#""shared text""#, &mut cache).unwrap();
    assert!(Arc::ptr_eq(&a.as_string(), &b.as_string()));
}

#[test]
fn duplicate_object_keys_keep_the_last_value() {
    let v = parse_both(r#"{"k": 1, "k": 2}"#);
    assert_eq!(v.as_object().count(), 1);
    assert_eq!(v.get("k").as_long(), 2);
}

#[test]
fn deeply_nested_input_parses() {
    let mut text = String::new();
    for _ in 0..200 {
        text.push('[');
    }
    text.push('1');
    for _ in 0..200 {
        text.push(']');
    }
    let v = parse_str(&text).unwrap();
    assert_eq!(v.pick("0.0.0").kind(), Kind::Array);
}
