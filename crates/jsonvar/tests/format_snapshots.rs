use jsonvar::{format, parse_str, FormatPolicy, ReturnPolicy, Variant};

fn sample() -> Variant {
    parse_str(r#"{"a": 1, "b": [1, 2]}"#).unwrap()
}

#[test]
fn snapshot_one_liner() {
    insta::assert_snapshot!(
        format(&sample(), &FormatPolicy::one_liner()).unwrap(),
        @r#"{"a": 1, "b": [1, 2]}"#
    );
}

#[test]
fn snapshot_pretty() {
    insta::assert_snapshot!(format(&sample(), &FormatPolicy::pretty()).unwrap(), @r#"
    {
      "a": 1,
      "b": [
        1,
        2
      ]
    }
    "#);
}

#[test]
fn snapshot_mixed() {
    insta::assert_snapshot!(format(&sample(), &FormatPolicy::mixed()).unwrap(), @r#"
    {
      "a": 1,
      "b": [1, 2]
    }
    "#);
}

#[test]
fn snapshot_every() {
    let policy = FormatPolicy {
        return_policy: ReturnPolicy::Every,
        indent: "    ".to_owned(),
        ..FormatPolicy::one_liner()
    };
    let v = parse_str(r#"{"empty": {}, "xs": [null]}"#).unwrap();
    insta::assert_snapshot!(format(&v, &policy).unwrap(), @r#"
    {
        "empty": {
        },
        "xs": [
            null
        ]
    }
    "#);
}

#[test]
fn snapshot_nested_mixed() {
    let v = parse_str(
        r#"{
            /* exercise all three container shapes */
            flags: {verbose: true},
            matrix: [[1, 0], [0, 1]],
            name: 'id',
        }"#,
    )
    .unwrap();
    insta::assert_snapshot!(format(&v, &FormatPolicy::mixed()).unwrap(), @r#"
    {
      "flags": {"verbose": true},
      "matrix": [
        [1, 0],
        [0, 1]
      ],
      "name": "id"
    }
    "#);
}
