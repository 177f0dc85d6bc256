//! Parse an xCDN document, navigate it, and write it back.
//!
//! Run with: cargo run --example roundtrip

use std::error::Error;
use xcdn::{parse_str, to_string, to_string_pretty};

const INPUT: &str = r#"
$schema: "https://gslf.github.io/xCDN/schemas/v1/meta.xcdn",

config: {
  name: "demo",
  ids: [1, 2, 3,],
  timeout: r"PT30S",
  id: u"550e8400-e29b-41d4-a716-446655440000",
  created_at: t"2025-12-07T10:00:00Z",
  payload: b"aGVsbG8=",
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = parse_str(INPUT)?;

    if let Some(schema) = doc.directive("schema") {
        println!("Schema: {}", schema.value);
    }

    let config = doc.get_mut("config")?;
    println!("Name: {}", config.get("name")?.value);
    println!("First id: {}", config.get("ids")?.get(0)?.value);

    config.get_mut("ids")?.set(0, 10)?;
    config.get_mut("ids")?.append(4)?;

    println!("\nCompact:\n{}", to_string(&doc)?);

    let pretty = to_string_pretty(&doc)?;
    println!("\nPretty:\n{}\n", pretty);

    assert_eq!(parse_str(&pretty)?, doc);
    println!("✓ Round-trip successful");

    Ok(())
}
