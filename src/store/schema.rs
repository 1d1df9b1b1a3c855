use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

/// Aggregate progress across sessions. Updated once per finished session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    pub high_score: u32,
    pub total_games_played: u32,
    pub average_score: f64,
    pub best_level: u32,
    pub last_played_date: Option<NaiveDate>,
    pub streak_days: u32,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            high_score: 0,
            total_games_played: 0,
            average_score: 0.0,
            best_level: 0,
            last_played_date: None,
            streak_days: 0,
        }
    }
}

impl ProgressData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn record_session(&mut self, score: u32, level: u32, today: NaiveDate) {
        let played = self.total_games_played as f64;
        self.average_score = (self.average_score * played + score as f64) / (played + 1.0);
        self.total_games_played += 1;
        self.high_score = self.high_score.max(score);
        self.best_level = self.best_level.max(level);

        if self.last_played_date != Some(today) {
            let yesterday = today.pred_opt();
            self.streak_days = match self.last_played_date {
                Some(last) if Some(last) == yesterday => self.streak_days + 1,
                _ => 1,
            };
            self.last_played_date = Some(today);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_running_average() {
        let mut progress = ProgressData::default();
        progress.record_session(100, 1, date(2024, 3, 1));
        progress.record_session(200, 2, date(2024, 3, 1));
        progress.record_session(0, 1, date(2024, 3, 1));
        assert_eq!(progress.total_games_played, 3);
        assert!((progress.average_score - 100.0).abs() < f64::EPSILON);
        assert_eq!(progress.high_score, 200);
        assert_eq!(progress.best_level, 2);
    }

    #[test]
    fn test_streak_consecutive_days() {
        let mut progress = ProgressData::default();
        progress.record_session(10, 1, date(2024, 2, 28));
        assert_eq!(progress.streak_days, 1);
        progress.record_session(10, 1, date(2024, 2, 29));
        assert_eq!(progress.streak_days, 2);
        progress.record_session(10, 1, date(2024, 3, 1));
        assert_eq!(progress.streak_days, 3);
    }

    #[test]
    fn test_streak_same_day_unchanged() {
        let mut progress = ProgressData::default();
        progress.record_session(10, 1, date(2024, 5, 1));
        progress.record_session(10, 1, date(2024, 5, 2));
        progress.record_session(10, 1, date(2024, 5, 2));
        assert_eq!(progress.streak_days, 2);
    }

    #[test]
    fn test_streak_gap_resets() {
        let mut progress = ProgressData::default();
        progress.record_session(10, 1, date(2024, 5, 1));
        progress.record_session(10, 1, date(2024, 5, 2));
        progress.record_session(10, 1, date(2024, 5, 5));
        assert_eq!(progress.streak_days, 1);
        assert_eq!(progress.last_played_date, Some(date(2024, 5, 5)));
    }

    #[test]
    fn test_stale_schema_detected() {
        let progress = ProgressData {
            schema_version: 0,
            ..ProgressData::default()
        };
        assert!(progress.needs_reset());
        assert!(!ProgressData::default().needs_reset());
    }
}
