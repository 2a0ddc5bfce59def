// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration example.
//!
//! This example demonstrates:
//! - Describing sources as data and assembling them through the registry
//! - How later sources override earlier ones, and how lists concatenate
//! - Editing a writable tree, then sealing it
//! - Walking a tree with a cursor while removing entries
//!
//! To run this example:
//! ```bash
//! export DEMO_DATABASE__HOST="db.example.com"
//! cargo run --example layered_sources
//! ```

use cfgtree::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("=== cfgtree: Layered Sources Example ===\n");

    let yaml_content = r#"
app:
  name: "YamlApp"
  port: 8080
database:
  host: "localhost"
  port: 5432
plugins:
  - auth
  - metrics
"#;

    let temp_file = tempfile::NamedTempFile::new()?;
    std::fs::write(temp_file.path(), yaml_content)?;

    // Built-in defaults, then the file, then the environment
    let descriptors = RawValue::map([(
        "sources",
        RawValue::list([
            RawValue::map([
                ("type", RawValue::from("static")),
                (
                    "config",
                    RawValue::map([
                        ("app", RawValue::map([("name", "Default"), ("log_level", "info")])),
                        ("plugins", RawValue::list(["core"])),
                    ]),
                ),
            ]),
            RawValue::map([
                ("type", RawValue::from("yaml")),
                (
                    "config",
                    RawValue::from(temp_file.path().display().to_string()),
                ),
            ]),
            RawValue::map([
                ("type", RawValue::from("env")),
                ("config", RawValue::map([("prefix", "DEMO_")])),
            ]),
        ]),
    )]);

    let assembler = Assembler::from_raw(&descriptors, &SourceRegistry::with_defaults())?;
    println!("Sources in merge order: {:?}\n", assembler.source_names());

    let mut config = assembler.assemble()?;

    println!("app.name      = {}", show(config.lookup("app.name")));
    println!("app.log_level = {}", show(config.lookup("app.log_level")));
    println!("database.host = {}", show(config.lookup("database.host")));
    if let Some(plugins) = config.get_node("plugins") {
        let names: Vec<String> = plugins.iter().map(|(_, v)| v.to_string()).collect();
        println!("plugins       = {:?}\n", names);
    }

    // The assembled tree is writable until sealed
    config.set("environment", "staging")?;
    if let Some(plugins) = config.get_node_mut("plugins")? {
        let key = plugins.append("tracing")?;
        println!("Appended plugin under key {}", key);

        let mut cursor = plugins.cursor();
        while cursor.valid() {
            if let Some(key) = cursor.key().cloned() {
                if cursor.current(plugins).and_then(ConfigValue::as_str) == Some("metrics") {
                    plugins.unset(&key)?;
                    println!("Removed plugin under key {}", key);
                }
            }
            cursor.advance(plugins);
        }
    }

    config.set_read_only();
    match config.set("environment", "production") {
        Ok(()) => println!("Unexpected: sealed tree accepted a change"),
        Err(e) => println!("\nAfter sealing: {}", e),
    }

    println!("\nFinal tree:\n{:#?}", config.to_array());

    Ok(())
}

fn show(value: Option<&ConfigValue>) -> String {
    value.map_or_else(|| "<unset>".to_string(), ToString::to_string)
}
