#![no_main]

use jsonvar::{
    format, parse_bytes, parse_str, parse_units, FormatError, FormatPolicy, SpecialFloatPolicy,
};
use libfuzzer_sys::fuzz_target;

// Feed arbitrary bytes to both parsers. Whatever parses must emit (or
// trip the depth guard), and the emission must re-parse to an
// equivalent tree.
fuzz_target!(|data: &[u8]| {
    let policy = FormatPolicy {
        special_float_policy: SpecialFloatPolicy::AsJsLiteral,
        ..FormatPolicy::one_liner()
    };

    if let Ok(tree) = parse_bytes(data) {
        match format(&tree, &policy) {
            Ok(text) => {
                let back = parse_str(&text).expect("emitted text re-parses");
                assert!(back.equivalent(&tree, jsonvar::DEFAULT_MAX_DEPTH));
            }
            Err(FormatError::TooDeep(_)) => {}
            Err(err) => panic!("unexpected format failure: {err}"),
        }
    }

    // The same bytes reinterpreted as code units exercise the UTF-16
    // reader.
    let units: Vec<u16> = data.iter().map(|&b| u16::from(b)).collect();
    if let Ok(tree) = parse_units(&units) {
        match format(&tree, &policy) {
            Ok(text) => {
                parse_str(&text).expect("emitted text re-parses");
            }
            Err(FormatError::TooDeep(_)) => {}
            Err(err) => panic!("unexpected format failure: {err}"),
        }
    }
});
