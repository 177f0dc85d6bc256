//! Building documents at runtime and bridging serde types.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use std::error::Error;
use xcdn::{from_value, to_string_pretty, to_value, xcdn, Annotation, Document, Node, Value};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build a config with the xcdn! macro
    let server = xcdn!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging"],
        "timeout": (Value::duration("PT30S"))
    });

    let mut doc = Document::new();
    doc.set("server", server)?;
    doc.get_mut("server")?.set(
        "port",
        Node::new(8443)
            .with_tag("override")
            .with_annotation(Annotation::new("range").with_arg(1).with_arg(65535)),
    )?;

    println!("Config as xCDN:\n{}\n", to_string_pretty(&doc)?);

    let server = doc.get("server")?;
    for (key, node) in server.items()? {
        println!("  {} ({}): {}", key, node.value.type_name(), node);
    }

    // Convert an existing struct to a Value and back
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let value = to_value(&user)?;
    println!("\nUser as Value: {}", value);

    let user_back: User = from_value(value)?;
    assert_eq!(user, user_back);
    println!("✓ Conversion successful");

    Ok(())
}
