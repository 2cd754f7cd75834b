use serde::{Deserialize, Serialize};
use std::fmt;

/// Toxicity categories scored upstream. Declaration order is the canonical
/// ordering used for tie-breaks and chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Toxic,
    Hatespeech,
    Abusive,
    Threat,
    Provocative,
    Obscene,
    Racist,
    Nationalist,
    Sexist,
    Homophobic,
    ReligiousHate,
    Radicalism,
}

impl Category {
    pub const COUNT: usize = 12;

    pub fn all() -> &'static [Category; Category::COUNT] {
        &[
            Category::Toxic,
            Category::Hatespeech,
            Category::Abusive,
            Category::Threat,
            Category::Provocative,
            Category::Obscene,
            Category::Racist,
            Category::Nationalist,
            Category::Sexist,
            Category::Homophobic,
            Category::ReligiousHate,
            Category::Radicalism,
        ]
    }

    /// Position in the canonical ordering.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Wire key, as used in `is_<key>` and `<key>_probability` fields.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Toxic => "toxic",
            Category::Hatespeech => "hatespeech",
            Category::Abusive => "abusive",
            Category::Threat => "threat",
            Category::Provocative => "provocative",
            Category::Obscene => "obscene",
            Category::Racist => "racist",
            Category::Nationalist => "nationalist",
            Category::Sexist => "sexist",
            Category::Homophobic => "homophobic",
            Category::ReligiousHate => "religious_hate",
            Category::Radicalism => "radicalism",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Toxic => "General Toxic",
            Category::Hatespeech => "Hate Speech",
            Category::Abusive => "Abusive",
            Category::Threat => "Threat",
            Category::Provocative => "Provocative",
            Category::Obscene => "Obscene",
            Category::Racist => "Racist",
            Category::Nationalist => "Nationalist",
            Category::Sexist => "Sexist",
            Category::Homophobic => "Homophobic",
            Category::ReligiousHate => "Religious Hate",
            Category::Radicalism => "Radicalism",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Toxic => "#FF6B6B",
            Category::Hatespeech => "#FF4757",
            Category::Abusive => "#FF3838",
            Category::Threat => "#D63031",
            Category::Provocative => "#FF6348",
            Category::Obscene => "#FF7675",
            Category::Racist => "#FF5252",
            Category::Nationalist => "#A29BFE",
            Category::Sexist => "#FD79A8",
            Category::Homophobic => "#FDCB6E",
            Category::ReligiousHate => "#E17055",
            Category::Radicalism => "#6C5CE7",
        }
    }

    /// Flat upstream flag field, e.g. `is_religious_hate`.
    pub fn flag_field(&self) -> String {
        format!("is_{}", self.key())
    }

    /// Flat upstream probability field, e.g. `toxic_probability`.
    pub fn probability_field(&self) -> String {
        format!("{}_probability", self.key())
    }

    pub fn from_key(key: &str) -> Option<Category> {
        let key = key.trim().to_lowercase();
        let key = key.strip_prefix("is_").unwrap_or(&key);
        Category::all().iter().copied().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
