//! In-memory sample table.
//!
//! Real voicebank loading lives in the host. This table backs the CLI and
//! tests: a set of recorded aliases plus optional subbanks that decorate an
//! alias with a prefix/suffix for a tone range and voice color.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::PhonemizerResult;
use crate::traits::Voicebank;

/// Tone- and color-specific alias decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subbank {
    /// Voice color tag; empty for the default color.
    pub color: String,
    /// Lowest tone served, inclusive.
    pub tone_low: i32,
    /// Highest tone served, inclusive.
    pub tone_high: i32,
    /// Prefix added to the alias.
    pub prefix: String,
    /// Suffix added to the alias.
    pub suffix: String,
}

impl Subbank {
    /// Create a subbank for the default color.
    pub fn new(tone_low: i32, tone_high: i32, suffix: impl Into<String>) -> Self {
        Self {
            color: String::new(),
            tone_low,
            tone_high,
            prefix: String::new(),
            suffix: suffix.into(),
        }
    }

    /// Set the voice color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn serves(&self, tone: i32) -> bool {
        (self.tone_low..=self.tone_high).contains(&tone)
    }

    fn decorate(&self, alias: &str) -> String {
        format!("{}{}{}", self.prefix, alias, self.suffix)
    }
}

/// Sample table held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryVoicebank {
    aliases: HashSet<String>,
    subbanks: Vec<Subbank>,
    location: Option<PathBuf>,
}

impl MemoryVoicebank {
    /// Create a table from a list of recorded aliases.
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            subbanks: Vec::new(),
            location: None,
        }
    }

    /// Parse an alias list: one alias per line, `#` starts a comment line.
    pub fn from_alias_list(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load an alias list file; the file's directory becomes the location.
    pub fn from_alias_file(path: impl AsRef<Path>) -> PhonemizerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut voicebank = Self::from_alias_list(&text);
        voicebank.location = path.parent().map(Path::to_path_buf);
        Ok(voicebank)
    }

    /// Add a subbank.
    pub fn with_subbank(mut self, subbank: Subbank) -> Self {
        self.subbanks.push(subbank);
        self
    }

    /// Set the voicebank directory.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Number of recorded aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn lookup_in<'a>(
        &self,
        alias: &str,
        mut subbanks: impl Iterator<Item = &'a Subbank>,
    ) -> Option<String> {
        subbanks.find_map(|subbank| {
            let decorated = subbank.decorate(alias);
            self.aliases.contains(&decorated).then_some(decorated)
        })
    }
}

impl Voicebank for MemoryVoicebank {
    fn try_get_mapped(&self, alias: &str, tone: i32, color: Option<&str>) -> Option<String> {
        let color = color.unwrap_or("");
        self.lookup_in(
            alias,
            self.subbanks
                .iter()
                .filter(|s| s.color == color && s.serves(tone)),
        )
        .or_else(|| {
            if color.is_empty() {
                return None;
            }
            self.lookup_in(
                alias,
                self.subbanks
                    .iter()
                    .filter(|s| s.color.is_empty() && s.serves(tone)),
            )
        })
        .or_else(|| self.aliases.contains(alias).then(|| alias.to_string()))
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn subbank_tone_sets(&self) -> Vec<Vec<i32>> {
        self.subbanks
            .iter()
            .filter(|s| s.color.is_empty())
            .map(|s| (s.tone_low..=s.tone_high).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_alias_list_parsing() {
        let vb = MemoryVoicebank::from_alias_list("# header\n-k\n\n ka \n");
        assert_eq!(vb.len(), 2);
        assert!(vb.has("ka", 60));
        assert!(vb.has("-k", 60));
        assert!(!vb.has("# header", 60));
    }

    #[test]
    fn test_subbank_suffix_mapping() {
        let vb = MemoryVoicebank::new(["a", "a_C4", "a_C5", "a_soft"])
            .with_subbank(Subbank::new(0, 65, "_C4"))
            .with_subbank(Subbank::new(66, 127, "_C5"))
            .with_subbank(Subbank::new(0, 127, "_soft").with_color("soft"));

        assert_eq!(vb.try_get_mapped("a", 60, None).as_deref(), Some("a_C4"));
        assert_eq!(vb.try_get_mapped("a", 72, None).as_deref(), Some("a_C5"));
        assert_eq!(
            vb.try_get_mapped("a", 72, Some("soft")).as_deref(),
            Some("a_soft")
        );
        assert_eq!(
            vb.try_get_mapped("a", 60, Some("unknown")).as_deref(),
            Some("a_C4")
        );
        assert!(vb.try_get_mapped("i", 60, None).is_none());
        assert!(!vb.same_subbank(60, 72));
    }

    #[test]
    fn test_alias_file_sets_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "ka").unwrap();

        let vb = MemoryVoicebank::from_alias_file(&path).unwrap();
        assert_eq!(vb.location(), Some(dir.path()));
        assert!(vb.has("ka", 60));
    }
}
