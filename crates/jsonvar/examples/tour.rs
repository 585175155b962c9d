//! A quick tour: parse leniently, poke at the tree, print it back.

use jsonvar::FormatPolicy;

fn main() {
    let config = jsonvar::parse_str(
        r#"{
            // comments and bare keys are fine
            name: 'demo',
            retries: +3,
            thresholds: [0.5, 0.9,],
        }"#,
    )
    .expect("config parses");

    println!("name    = {}", config.get("name").as_string());
    println!("retries = {}", config.get("retries").as_long());
    println!("second  = {}", config.pick("thresholds.1").as_double());

    config.set("verbose", true);
    config.at("thresholds").add(1.0);

    let pretty = jsonvar::format(&config, &FormatPolicy::pretty()).expect("tree is finite");
    println!("{pretty}");
}
