//! Controlling the output layout with XcdnOptions.
//!
//! Run with: cargo run --example custom_options

use std::error::Error;
use xcdn::{parse_str, to_string_with_options, XcdnOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let doc = parse_str(
        r#"$version: 2
        service: { name: "billing", owner: @contact("ops@example.com") #internal "team" }
        ports: [8080, 8443]"#,
    )?;

    println!("Compact:\n{}\n", to_string_with_options(&doc, XcdnOptions::new())?);

    println!(
        "Braced root:\n{}\n",
        to_string_with_options(&doc, XcdnOptions::new().with_implicit_root(false))?
    );

    println!(
        "Pretty (indent 4, trailing commas):\n{}",
        to_string_with_options(
            &doc,
            XcdnOptions::pretty()
                .with_indent(4)
                .with_trailing_commas(true)
        )?
    );

    Ok(())
}
