use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::content::{Difficulty, Mode};
use crate::engine::hint::{HintPolicy, RevealThreshold};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintConfig {
    pub policy: HintPolicy,
    pub threshold: RevealThreshold,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_typing_advance_ms")]
    pub typing_advance_ms: u64,
    #[serde(default = "default_builder_advance_ms")]
    pub builder_advance_ms: u64,
    #[serde(default = "default_shake_ms")]
    pub shake_ms: u64,
    #[serde(default = "default_idle_gap_ms")]
    pub idle_gap_ms: u64,
    #[serde(default = "default_skip_penalty")]
    pub skip_penalty: u32,
    #[serde(default = "default_typing_hints")]
    pub typing_hints: HintConfig,
    #[serde(default = "default_builder_hints")]
    pub builder_hints: HintConfig,
    #[serde(default = "default_suggest_min_completed")]
    pub suggest_min_completed: usize,
    #[serde(default = "default_suggest_min_accuracy")]
    pub suggest_min_accuracy: u32,
    #[serde(default = "default_suggest_min_wpm")]
    pub suggest_min_wpm: u32,
}

fn default_theme() -> String {
    "default".to_string()
}
fn default_difficulty() -> Difficulty {
    Difficulty::Beginner
}
fn default_mode() -> Mode {
    Mode::Typing
}
fn default_typing_advance_ms() -> u64 {
    1500
}
fn default_builder_advance_ms() -> u64 {
    5000
}
fn default_shake_ms() -> u64 {
    400
}
fn default_idle_gap_ms() -> u64 {
    5000
}
fn default_skip_penalty() -> u32 {
    10
}
fn default_typing_hints() -> HintConfig {
    HintConfig {
        policy: HintPolicy::WordLevel,
        threshold: RevealThreshold::Fixed { count: 4 },
    }
}
fn default_builder_hints() -> HintConfig {
    HintConfig {
        policy: HintPolicy::Progressive { max_reveals: 5 },
        threshold: RevealThreshold::Fixed { count: 2 },
    }
}
fn default_suggest_min_completed() -> usize {
    5
}
fn default_suggest_min_accuracy() -> u32 {
    95
}
fn default_suggest_min_wpm() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            difficulty: default_difficulty(),
            mode: default_mode(),
            typing_advance_ms: default_typing_advance_ms(),
            builder_advance_ms: default_builder_advance_ms(),
            shake_ms: default_shake_ms(),
            idle_gap_ms: default_idle_gap_ms(),
            skip_penalty: default_skip_penalty(),
            typing_hints: default_typing_hints(),
            builder_hints: default_builder_hints(),
            suggest_min_completed: default_suggest_min_completed(),
            suggest_min_accuracy: default_suggest_min_accuracy(),
            suggest_min_wpm: default_suggest_min_wpm(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tippwerk")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp values a hand-edited file could get wrong.
    pub fn validate(&mut self) {
        self.typing_advance_ms = self.typing_advance_ms.clamp(200, 30_000);
        self.builder_advance_ms = self.builder_advance_ms.clamp(200, 30_000);
        self.shake_ms = self.shake_ms.clamp(50, 2_000);
        self.idle_gap_ms = self.idle_gap_ms.clamp(500, 60_000);
        self.suggest_min_accuracy = self.suggest_min_accuracy.min(100);
        self.suggest_min_completed = self.suggest_min_completed.max(1);
        for hints in [&mut self.typing_hints, &mut self.builder_hints] {
            hints.threshold = match hints.threshold {
                RevealThreshold::Fixed { count } => RevealThreshold::Fixed {
                    count: count.clamp(1, 20),
                },
                RevealThreshold::Random { min, max } => {
                    let lo = min.min(max).clamp(1, 20);
                    let hi = min.max(max).clamp(lo, 20);
                    RevealThreshold::Random { min: lo, max: hi }
                }
            };
            if let HintPolicy::Progressive { max_reveals } = hints.policy {
                hints.policy = HintPolicy::Progressive {
                    max_reveals: max_reveals.clamp(1, 50),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.typing_advance_ms, 1500);
        assert_eq!(config.builder_advance_ms, 5000);
        assert_eq!(config.shake_ms, 400);
        assert_eq!(config.difficulty, Difficulty::Beginner);
        assert_eq!(config.builder_hints.policy, HintPolicy::Progressive { max_reveals: 5 });
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
difficulty = "advanced"
mode = "builder"
skip_penalty = 0

[typing_hints]
policy = { kind = "single" }
threshold = { kind = "random", min = 3, max = 7 }
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.difficulty, Difficulty::Advanced);
        assert_eq!(config.mode, Mode::Builder);
        assert_eq!(config.skip_penalty, 0);
        assert_eq!(config.typing_hints.policy, HintPolicy::Single);
        assert_eq!(
            config.typing_hints.threshold,
            RevealThreshold::Random { min: 3, max: 7 }
        );
        // Untouched fields keep defaults
        assert_eq!(config.builder_advance_ms, 5000);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.typing_hints, deserialized.typing_hints);
        assert_eq!(config.builder_hints, deserialized.builder_hints);
        assert_eq!(config.idle_gap_ms, deserialized.idle_gap_ms);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.typing_advance_ms = 0;
        config.suggest_min_accuracy = 150;
        config.typing_hints.threshold = RevealThreshold::Random { min: 9, max: 0 };
        config.builder_hints.threshold = RevealThreshold::Fixed { count: 0 };
        config.validate();
        assert_eq!(config.typing_advance_ms, 200);
        assert_eq!(config.suggest_min_accuracy, 100);
        assert_eq!(
            config.typing_hints.threshold,
            RevealThreshold::Random { min: 1, max: 9 }
        );
        assert_eq!(
            config.builder_hints.threshold,
            RevealThreshold::Fixed { count: 1 }
        );
    }
}
