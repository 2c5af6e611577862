// src/classify/phrases.rs
//! Phrase book: the tunable data behind the classifier.
//!
//! Every list and weight can be overridden from a TOML file; anything left out
//! falls back to the built-in defaults below. Example:
//!
//! ```toml
//! announcement = ["habemus papam", "new pope elected"]
//! noise = ["wildfire", "rumor", "fake", "hoax", "fiction"]
//!
//! [scoring]
//! announcement_threshold = 6
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_CLASSIFIER_CONFIG_PATH: &str = "CLASSIFIER_CONFIG_PATH";

const EXPLANATORY: &[&str] = &["history", "behind", "explain", "explained", "guide", "what is"];

const NEGATIVE: &[&str] = &["black smoke"];

const ANNOUNCEMENT: &[&str] = &[
    "habemus papam",
    "new pope elected",
    "cardinal elected pope",
    "pope francis elected",
    "we have a pope",
    "vatican announces new pope",
    "pope has been elected",
    "new pontiff",
    "bishop of rome elected",
    "cardinals elect new pope",
    "new bishop of rome",
    "new pope chosen",
    "pontiff chosen",
    "pope selected",
];

const SMOKE_SIGNAL: &[&str] = &["white smoke"];

const ELECTION_CONTEXT: &[&str] = &[
    "pope",
    "conclave",
    "elect",
    "elected",
    "papal",
    "new pope",
    "pontiff",
];

const GENERIC: &[&str] = &[
    "white smoke",
    "papal conclave",
    "conclave",
    "sistine chapel",
    "vatican city",
    "cardinals vote",
    "voting underway",
    "smoke rises",
    "papal election",
    "vatican crowd",
    "pope watchers",
];

const NOISE: &[&str] = &["wildfire", "rumor", "fake", "hoax"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Error)]
pub enum PhraseBookError {
    #[error("reading phrase book {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing phrase book: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("phrase list `{0}` contains an empty phrase")]
    EmptyPhrase(&'static str),
    #[error("announcement threshold {announcement} is below generic threshold {generic}")]
    ThresholdOrder { announcement: i32, generic: i32 },
    #[error("explanatory pattern `{pattern}` failed to compile: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Weights and thresholds of the fallback score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scoring {
    pub announcement_weight: i32,
    pub generic_weight: i32,
    /// Subtracted once per noise phrase hit.
    pub noise_penalty: i32,
    pub announcement_threshold: i32,
    pub generic_threshold: i32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            announcement_weight: 3,
            generic_weight: 1,
            noise_penalty: 3,
            announcement_threshold: 5,
            generic_threshold: 1,
        }
    }
}

/// Category → ordered trigger phrases. Lists are matched lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhraseBook {
    /// Whole-word patterns marking explainers and retrospectives.
    pub explanatory: Vec<String>,
    /// Phrases that negate an election outright.
    pub negative: Vec<String>,
    pub announcement: Vec<String>,
    /// Ambiguous signals that only count next to an election-context term.
    pub smoke_signal: Vec<String>,
    pub election_context: Vec<String>,
    pub generic: Vec<String>,
    pub noise: Vec<String>,
    pub scoring: Scoring,
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self {
            explanatory: owned(EXPLANATORY),
            negative: owned(NEGATIVE),
            announcement: owned(ANNOUNCEMENT),
            smoke_signal: owned(SMOKE_SIGNAL),
            election_context: owned(ELECTION_CONTEXT),
            generic: owned(GENERIC),
            noise: owned(NOISE),
            scoring: Scoring::default(),
        }
    }
}

impl PhraseBook {
    pub fn from_toml_str(s: &str) -> Result<Self, PhraseBookError> {
        let book: PhraseBook = toml::from_str(s)?;
        book.validate()?;
        Ok(book)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self, PhraseBookError> {
        let content = fs::read_to_string(path).map_err(|source| PhraseBookError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Lower-cases and trims every phrase, rejecting empty ones
    /// (an empty substring would match every article).
    pub(crate) fn normalized(mut self) -> Result<Self, PhraseBookError> {
        for (name, list) in [
            ("explanatory", &mut self.explanatory),
            ("negative", &mut self.negative),
            ("announcement", &mut self.announcement),
            ("smoke_signal", &mut self.smoke_signal),
            ("election_context", &mut self.election_context),
            ("generic", &mut self.generic),
            ("noise", &mut self.noise),
        ] {
            for phrase in list.iter_mut() {
                *phrase = phrase.trim().to_lowercase();
                if phrase.is_empty() {
                    return Err(PhraseBookError::EmptyPhrase(name));
                }
            }
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), PhraseBookError> {
        let s = &self.scoring;
        if s.announcement_threshold < s.generic_threshold {
            return Err(PhraseBookError::ThresholdOrder {
                announcement: s.announcement_threshold,
                generic: s.generic_threshold,
            });
        }
        self.clone().normalized().map(|_| ())
    }
}
