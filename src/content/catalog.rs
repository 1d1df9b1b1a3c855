use std::collections::BTreeMap;
use std::fmt;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Embed)]
#[folder = "assets/content/"]
pub(crate) struct ContentAssets;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("bundled content asset missing: {0}")]
    MissingAsset(String),

    #[error("content asset {0} is not valid UTF-8")]
    Encoding(String),

    #[error("content JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Anfänger (Beginner)",
            Difficulty::Intermediate => "Mittelstufe (Intermediate)",
            Difficulty::Advanced => "Fortgeschritten (Advanced)",
        }
    }

    /// 1-based tier used for scoring and the best-level record.
    pub fn tier(self) -> u32 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
        }
    }

    /// Next tier up, saturating at advanced.
    pub fn harder(self) -> Difficulty {
        match self {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate | Difficulty::Advanced => Difficulty::Advanced,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Typing,
    Builder,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Typing => "typing",
            Mode::Builder => "builder",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Typing => "Typing Practice",
            Mode::Builder => "Sentence Builder",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingText {
    pub text: String,
    pub translation: String,
    pub pattern: String,
    pub explanation: String,
}

/// One acceptable answer to a builder challenge. `gloss` is empty when the
/// source listed the answer as a bare string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub target: String,
    pub gloss: String,
}

impl Answer {
    pub fn new(target: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            gloss: gloss.into(),
        }
    }
}

// Both answer shapes seen in content files; unified into `Answer` on load.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Plain(String),
    Pair { german: String, english: String },
}

impl From<RawAnswer> for Answer {
    fn from(raw: RawAnswer) -> Self {
        match raw {
            RawAnswer::Plain(target) => Answer::new(target, ""),
            RawAnswer::Pair { german, english } => Answer::new(german, english),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBuilderChallenge {
    #[serde(default)]
    key_words: Vec<String>,
    #[serde(default)]
    possible_answers: Vec<RawAnswer>,
    #[serde(default)]
    hints: Vec<String>,
    #[serde(default)]
    pattern: String,
    #[serde(default)]
    explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderChallenge {
    pub key_words: Vec<String>,
    pub answers: Vec<Answer>,
    pub hints: Vec<String>,
    pub pattern: String,
    pub explanation: String,
}

impl From<RawBuilderChallenge> for BuilderChallenge {
    fn from(raw: RawBuilderChallenge) -> Self {
        Self {
            key_words: raw.key_words,
            answers: raw.possible_answers.into_iter().map(Answer::from).collect(),
            hints: raw.hints,
            pattern: raw.pattern,
            explanation: raw.explanation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Challenge {
    Typing(TypingText),
    Builder(BuilderChallenge),
}

impl Challenge {
    pub fn mode(&self) -> Mode {
        match self {
            Challenge::Typing(_) => Mode::Typing,
            Challenge::Builder(_) => Mode::Builder,
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Challenge::Typing(t) => &t.pattern,
            Challenge::Builder(b) => &b.pattern,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Challenge::Typing(t) => &t.explanation,
            Challenge::Builder(b) => &b.explanation,
        }
    }
}

/// Read-only catalog of typing texts and builder challenges per tier.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    typing: BTreeMap<Difficulty, Vec<TypingText>>,
    builder: BTreeMap<Difficulty, Vec<BuilderChallenge>>,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        let typing = asset_str("typing.json")?;
        let builder = asset_str("builder.json")?;
        Self::from_json(&typing, &builder)
    }

    pub fn from_json(typing_json: &str, builder_json: &str) -> Result<Self, CatalogError> {
        let typing: BTreeMap<Difficulty, Vec<TypingText>> = serde_json::from_str(typing_json)?;
        let raw_builder: BTreeMap<Difficulty, Vec<RawBuilderChallenge>> =
            serde_json::from_str(builder_json)?;
        let builder = raw_builder
            .into_iter()
            .map(|(tier, list)| (tier, list.into_iter().map(BuilderChallenge::from).collect()))
            .collect();

        let catalog = Self { typing, builder };
        catalog.report_malformed();
        Ok(catalog)
    }

    pub fn from_parts(
        typing: BTreeMap<Difficulty, Vec<TypingText>>,
        builder: BTreeMap<Difficulty, Vec<BuilderChallenge>>,
    ) -> Self {
        Self { typing, builder }
    }

    pub fn typing(&self, difficulty: Difficulty) -> &[TypingText] {
        self.typing.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn builder(&self, difficulty: Difficulty) -> &[BuilderChallenge] {
        self.builder.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The canonical (unshuffled) challenge list for one tier and mode.
    pub fn challenges(&self, difficulty: Difficulty, mode: Mode) -> Vec<Challenge> {
        match mode {
            Mode::Typing => self
                .typing(difficulty)
                .iter()
                .cloned()
                .map(Challenge::Typing)
                .collect(),
            Mode::Builder => self
                .builder(difficulty)
                .iter()
                .cloned()
                .map(Challenge::Builder)
                .collect(),
        }
    }

    // Malformed entries stay in the catalog; they just can never be solved.
    fn report_malformed(&self) {
        for (tier, texts) in &self.typing {
            for (i, t) in texts.iter().enumerate() {
                if t.text.is_empty() {
                    warn!(%tier, index = i, "typing text is empty");
                }
            }
        }
        for (tier, list) in &self.builder {
            for (i, c) in list.iter().enumerate() {
                if c.answers.is_empty() {
                    warn!(%tier, index = i, "builder challenge has no possible answers");
                }
            }
        }
    }
}

pub(crate) fn asset_str(name: &str) -> Result<String, CatalogError> {
    let file =
        ContentAssets::get(name).ok_or_else(|| CatalogError::MissingAsset(name.to_string()))?;
    String::from_utf8(file.data.into_owned()).map_err(|_| CatalogError::Encoding(name.to_string()))
}
