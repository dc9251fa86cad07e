//! Archetypes Command
//!
//! Prints the archetype catalog so users can pick a hint for `generate
//! --archetype` and see which semantic checks each one carries.

use console::style;

use crate::cli::ui::Output;
use crate::schema::SchemaRegistry;
use crate::types::Result;

pub fn run() -> Result<()> {
    let output = Output::new();
    let vocabulary = SchemaRegistry::vocabulary();

    output.header("Archetypes");
    for archetype in &vocabulary.archetypes {
        println!();
        println!(
            "  {}  {}",
            style(archetype.name()).bold(),
            archetype.description()
        );
        println!(
            "      typical: {}",
            archetype.typical_features().join(", ")
        );

        let mut checks = Vec::new();
        if archetype.requires_path() {
            checks.push("one start and one end tile");
        }
        if archetype.expects_enclosure() {
            checks.push("enclosed boundary");
        }
        if !checks.is_empty() {
            println!("      checked: {}", checks.join(", "));
        }
    }
    println!();

    Ok(())
}
