//! Languages command implementation.

use anyhow::Result;
use syllable_engine::LanguageSpec;

/// Run the languages command.
pub fn run() -> Result<()> {
    println!("Built-in languages:");
    for id in LanguageSpec::builtin_ids() {
        let language = LanguageSpec::builtin(id)?;
        println!(
            "  {:<8} {:<8} {:?}  {} ({} vowels, {} consonants)",
            language.id,
            language.tag,
            language.policy,
            language.name,
            language.vowels.len(),
            language.consonants.len(),
        );
    }
    Ok(())
}
