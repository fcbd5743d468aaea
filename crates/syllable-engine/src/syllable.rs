//! Syllable and ending records produced by the segmenter.

use std::fmt;

use phonemizer_core::PhonemeAttributes;

/// One vowel with the consonants leading into it.
///
/// Aliases for the cluster are placed before `position`; the vowel alias
/// starts at `position`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Syllable {
    /// Vowel of the previous syllable; empty at phrase start.
    pub prev_v: String,
    /// Consonant cluster; may be empty.
    pub cc: Vec<String>,
    /// Nucleus. The last symbol stands in when a word has no vowel.
    pub v: String,
    /// Vowel start, in ticks relative to the first note of the group.
    pub position: i32,
    /// Length of the previous note, the container for the cluster. `None`
    /// at phrase start.
    pub duration: Option<i32>,
    /// Tone for the cluster aliases.
    pub tone: i32,
    /// Attributes for the cluster aliases.
    pub attr: Vec<PhonemeAttributes>,
    /// Tone for the vowel alias.
    pub vowel_tone: i32,
    /// Attributes for the vowel alias.
    pub vowel_attr: Vec<PhonemeAttributes>,
    /// How many leading cluster consonants came from the previous word.
    pub prev_word_consonants_count: usize,
    /// Only syllables after the first of a group may extend the previous alias.
    pub can_alias_be_extended: bool,
}

impl Syllable {
    pub fn is_starting_v(&self) -> bool {
        self.prev_v.is_empty() && self.cc.is_empty()
    }

    pub fn is_vv(&self) -> bool {
        !self.prev_v.is_empty() && self.cc.is_empty()
    }

    pub fn is_starting_cv(&self) -> bool {
        self.prev_v.is_empty() && !self.cc.is_empty()
    }

    pub fn is_vcv(&self) -> bool {
        !self.prev_v.is_empty() && !self.cc.is_empty()
    }

    pub fn is_starting_cv_with_one_consonant(&self) -> bool {
        self.prev_v.is_empty() && self.cc.len() == 1
    }

    pub fn is_starting_cv_with_more_than_one_consonant(&self) -> bool {
        self.prev_v.is_empty() && self.cc.len() > 1
    }

    pub fn is_vcv_with_one_consonant(&self) -> bool {
        !self.prev_v.is_empty() && self.cc.len() == 1
    }

    pub fn is_vcv_with_more_than_one_consonant(&self) -> bool {
        !self.prev_v.is_empty() && self.cc.len() > 1
    }

    /// Consonants carried over from the previous word.
    pub fn previous_word_cc(&self) -> &[String] {
        &self.cc[..self.prev_word_consonants_count.min(self.cc.len())]
    }

    /// Consonants belonging to this word.
    pub fn current_word_cc(&self) -> &[String] {
        &self.cc[self.prev_word_consonants_count.min(self.cc.len())..]
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} {}", self.prev_v, self.cc.join(" "), self.v)
    }
}

/// Trailing consonants after the last vowel of a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ending {
    /// Last vowel of the group.
    pub prev_v: String,
    /// Consonants after it; may be empty.
    pub cc: Vec<String>,
    /// End of the group, relative to its first note. Ending aliases finish here.
    pub position: i32,
    /// Length of the last syllable, the container for the ending aliases.
    pub duration: i32,
    pub tone: i32,
    pub attr: Vec<PhonemeAttributes>,
}

impl Ending {
    pub fn is_ending_v(&self) -> bool {
        self.cc.is_empty()
    }

    pub fn is_ending_vc(&self) -> bool {
        !self.cc.is_empty()
    }

    pub fn is_ending_vc_with_one_consonant(&self) -> bool {
        self.cc.len() == 1
    }

    pub fn is_ending_vc_with_more_than_one_consonant(&self) -> bool {
        self.cc.len() > 1
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.prev_v, self.cc.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syllable(prev_v: &str, cc: &[&str], v: &str) -> Syllable {
        Syllable {
            prev_v: prev_v.to_string(),
            cc: cc.iter().map(|c| c.to_string()).collect(),
            v: v.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_flags() {
        assert!(syllable("", &[], "a").is_starting_v());
        assert!(syllable("a", &[], "o").is_vv());
        assert!(syllable("", &["k"], "a").is_starting_cv_with_one_consonant());
        assert!(syllable("", &["s", "t"], "a").is_starting_cv_with_more_than_one_consonant());
        assert!(syllable("a", &["k"], "a").is_vcv_with_one_consonant());
        assert!(syllable("a", &["s", "t"], "a").is_vcv_with_more_than_one_consonant());
        assert!(!syllable("a", &["k"], "a").is_starting_cv());
    }

    #[test]
    fn test_word_split_of_cluster() {
        let mut s = syllable("a", &["t", "s", "k"], "o");
        s.prev_word_consonants_count = 1;
        assert_eq!(s.previous_word_cc(), ["t"]);
        assert_eq!(s.current_word_cc(), ["s", "k"]);
        assert_eq!(s.to_string(), "(a) t s k o");
    }

    #[test]
    fn test_ending_flags() {
        let ending = Ending {
            prev_v: "a".into(),
            cc: vec!["s".into(), "t".into()],
            ..Default::default()
        };
        assert!(ending.is_ending_vc_with_more_than_one_consonant());
        assert!(!ending.is_ending_v());
    }
}
