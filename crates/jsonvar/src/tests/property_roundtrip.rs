use quickcheck::QuickCheck;

use super::arbitrary::ArbTree;
use crate::{
    format, parse_bytes, parse_str, parse_units, FormatPolicy, SpecialFloatPolicy,
    DEFAULT_MAX_DEPTH,
};

/// Emitting under the compact policy and re-parsing, through either
/// alphabet, lands on an equivalent tree.
#[test]
fn roundtrip_quickcheck() {
    fn prop(tree: ArbTree) -> bool {
        let value = tree.0;
        // JS literals so non-finite floats survive the trip.
        let policy = FormatPolicy {
            special_float_policy: SpecialFloatPolicy::AsJsLiteral,
            ..FormatPolicy::one_liner()
        };
        let text = match format(&value, &policy) {
            Ok(text) => text,
            Err(_) => return false,
        };

        let from_str = match parse_str(&text) {
            Ok(v) => v,
            Err(_) => return false,
        };
        let units: Vec<u16> = text.encode_utf16().collect();
        let from_units = match parse_units(&units) {
            Ok(v) => v,
            Err(_) => return false,
        };

        from_str.equivalent(&value, DEFAULT_MAX_DEPTH)
            && from_units.equivalent(&value, DEFAULT_MAX_DEPTH)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}

/// The byte emitter and the byte parser agree with the text pair.
#[test]
fn byte_pipeline_quickcheck() {
    fn prop(tree: ArbTree) -> bool {
        let value = tree.0;
        let policy = FormatPolicy {
            special_float_policy: SpecialFloatPolicy::AsJsLiteral,
            ..FormatPolicy::pretty()
        };
        let Ok(bytes) = crate::format_bytes(&value, &policy) else {
            return false;
        };
        let Ok(back) = parse_bytes(&bytes) else {
            return false;
        };
        back.equivalent(&value, DEFAULT_MAX_DEPTH)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}

/// Duplication produces an equivalent but disjoint tree.
#[test]
fn duplicate_quickcheck() {
    fn prop(tree: ArbTree) -> bool {
        let value = tree.0;
        let copy = value.duplicate();
        let same = value.equivalent(&copy, DEFAULT_MAX_DEPTH);
        let distinct = !value.is_composite() || !value.equals(&copy);
        same && distinct
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(ArbTree) -> bool);
}
