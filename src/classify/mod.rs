// src/classify/mod.rs
//! Tiered classifier deciding whether a feed entry announces a papal election.
//!
//! Tiers are evaluated in order and the first match wins:
//! 1. explanatory override (whole word)  → `Generic`
//! 2. negative override ("black smoke")  → `Irrelevant`
//! 3. exact announcement phrase          → `Announcement`
//! 4. smoke signal + election context    → `Announcement`
//! 5. weighted score against thresholds
//!
//! All other tiers match plain substrings of the lower-cased text.

pub mod phrases;

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::Path;

pub use phrases::{PhraseBook, PhraseBookError, Scoring};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Announcement,
    Generic,
    Irrelevant,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Announcement => "announcement",
            Classification::Generic => "generic",
            Classification::Irrelevant => "irrelevant",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Explanatory,
    NegativeOverride,
    ExactPhrase,
    ContextualSmoke,
    Score,
}

/// Classification plus the evidence behind it (for logs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub classification: Classification,
    pub rule: Rule,
    /// Only set when the fallback score decided.
    pub score: Option<i32>,
    pub matched: Vec<String>,
}

impl Verdict {
    fn decided(classification: Classification, rule: Rule, matched: Vec<String>) -> Self {
        Self {
            classification,
            rule,
            score: None,
            matched,
        }
    }
}

#[derive(Debug)]
pub struct Classifier {
    book: PhraseBook,
    explanatory: Vec<(String, Regex)>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PhraseBook::default()).expect("built-in phrase book")
    }
}

impl Classifier {
    pub fn new(book: PhraseBook) -> Result<Self, PhraseBookError> {
        book.validate()?;
        let book = book.normalized()?;
        let explanatory = book
            .explanatory
            .iter()
            .map(|p| {
                let re = Regex::new(&format!(r"\b{}\b", regex::escape(p))).map_err(|source| {
                    PhraseBookError::Pattern {
                        pattern: p.clone(),
                        source,
                    }
                })?;
                Ok((p.clone(), re))
            })
            .collect::<Result<Vec<_>, PhraseBookError>>()?;
        Ok(Self { book, explanatory })
    }

    /// Build from `$CLASSIFIER_CONFIG_PATH`-style optional path; `None` means defaults.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, PhraseBookError> {
        match path {
            Some(p) => Self::new(PhraseBook::from_toml_path(p)?),
            None => Ok(Self::default()),
        }
    }

    pub fn classify(&self, title: &str, summary: &str) -> Classification {
        self.explain(title, summary).classification
    }

    pub fn explain(&self, title: &str, summary: &str) -> Verdict {
        let text = format!("{title} {summary}").to_lowercase();
        let book = &self.book;

        let explanatory: Vec<String> = self
            .explanatory
            .iter()
            .filter(|(_, re)| re.is_match(&text))
            .map(|(p, _)| p.clone())
            .collect();
        if !explanatory.is_empty() {
            return Verdict::decided(Classification::Generic, Rule::Explanatory, explanatory);
        }

        let negative = hits(&text, &book.negative);
        if !negative.is_empty() {
            return Verdict::decided(
                Classification::Irrelevant,
                Rule::NegativeOverride,
                negative,
            );
        }

        if let Some(phrase) = book.announcement.iter().find(|p| text.contains(p.as_str())) {
            return Verdict::decided(
                Classification::Announcement,
                Rule::ExactPhrase,
                vec![phrase.clone()],
            );
        }

        let smoke = hits(&text, &book.smoke_signal);
        if !smoke.is_empty() {
            let context = hits(&text, &book.election_context);
            if !context.is_empty() {
                let mut matched = smoke;
                matched.extend(context);
                return Verdict::decided(
                    Classification::Announcement,
                    Rule::ContextualSmoke,
                    matched,
                );
            }
        }

        let s = &book.scoring;
        let announce = hits(&text, &book.announcement);
        let generic = hits(&text, &book.generic);
        let noise = hits(&text, &book.noise);
        // Weights come from operator TOML; clamp instead of overflowing.
        let weighted = |weight: i32, hits: usize| {
            weight.saturating_mul(i32::try_from(hits).unwrap_or(i32::MAX))
        };
        let score = weighted(s.announcement_weight, announce.len())
            .saturating_add(weighted(s.generic_weight, generic.len()))
            .saturating_sub(weighted(s.noise_penalty, noise.len()));

        let classification = if score >= s.announcement_threshold {
            Classification::Announcement
        } else if score >= s.generic_threshold {
            Classification::Generic
        } else {
            Classification::Irrelevant
        };

        let mut matched = announce;
        matched.extend(generic);
        matched.extend(noise.into_iter().map(|n| format!("-{n}")));
        Verdict {
            classification,
            rule: Rule::Score,
            score: Some(score),
            matched,
        }
    }
}

fn hits(text: &str, phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .filter(|p| text.contains(p.as_str()))
        .cloned()
        .collect()
}
