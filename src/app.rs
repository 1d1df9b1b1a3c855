use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use tippwerk::config::Config;
use tippwerk::content::{Catalog, Glossary};
use tippwerk::session::{Phase, Session, SessionSettings};
use tippwerk::store::{JsonStore, ProgressData};

use crate::ui::components::menu::MenuState;
use crate::ui::theme::Theme;

/// Glue between terminal key events, the session controller and the
/// progress store.
pub struct App {
    pub session: Session,
    pub glossary: Glossary,
    pub progress: ProgressData,
    pub store: Option<JsonStore>,
    pub theme: Theme,
    pub menu: MenuState,
    pub show_info: bool,
    pub should_quit: bool,
    progress_recorded: bool,
}

impl App {
    pub fn new(config: Config, theme: Theme) -> Result<Self> {
        let catalog = Catalog::bundled()?;
        let glossary = Glossary::bundled()?;
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(%err, "progress storage unavailable, keeping progress in memory");
                None
            }
        };
        let session = Session::new(catalog, SessionSettings::from(&config));
        Ok(Self::with_parts(session, config, glossary, store, theme))
    }

    pub fn with_parts(
        session: Session,
        config: Config,
        glossary: Glossary,
        store: Option<JsonStore>,
        theme: Theme,
    ) -> Self {
        let progress = store
            .as_ref()
            .map(JsonStore::load_progress)
            .unwrap_or_default();
        let menu = MenuState::new(config.difficulty, config.mode);
        Self {
            session,
            glossary,
            progress,
            store,
            theme,
            menu,
            show_info: false,
            should_quit: false,
            progress_recorded: false,
        }
    }

    pub fn start_session(&mut self, now: Instant) {
        self.progress_recorded = false;
        self.session.start(self.menu.difficulty, self.menu.mode, now);
        self.after_transition();
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        let mut input = self.session.input().to_string();
        input.push(ch);
        self.session.input_changed(&input, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let mut input = self.session.input().to_string();
        if input.pop().is_some() {
            self.session.input_changed(&input, now);
        }
    }

    /// Enter in builder mode: retry after a miss, submit otherwise.
    pub fn submit_or_retry(&mut self, now: Instant) {
        let missed = self
            .session
            .drill()
            .is_some_and(|drill| drill.verdict == Some(false));
        if missed {
            self.session.retry(now);
        } else {
            self.session.submit(now);
        }
    }

    pub fn reset_current(&mut self, now: Instant) {
        self.session.reset_current(now);
    }

    pub fn skip(&mut self, now: Instant) {
        self.session.skip(now);
        self.after_transition();
    }

    pub fn reshuffle(&mut self, now: Instant) {
        self.session.reshuffle(now);
        self.after_transition();
    }

    pub fn practice_again(&mut self, now: Instant) {
        self.progress_recorded = false;
        self.session.practice_again(now);
        self.after_transition();
    }

    pub fn go_to_menu(&mut self) {
        self.session.back_to_menu();
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
        self.after_transition();
    }

    pub fn toggle_info(&mut self) {
        self.show_info = !self.show_info;
    }

    fn after_transition(&mut self) {
        if self.session.phase() == Phase::Result {
            self.record_progress();
        }
    }

    /// Once per finished session. Storage failures are logged and ignored.
    fn record_progress(&mut self) {
        if self.progress_recorded {
            return;
        }
        let Some(summary) = self.session.summary() else {
            return;
        };
        self.progress_recorded = true;
        self.progress
            .record_session(summary.score, summary.level(), Local::now().date_naive());
        if let Some(store) = self.store.as_ref() {
            if let Err(err) = store.save_progress(&self.progress) {
                tracing::warn!(%err, "failed to save progress");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tempfile::TempDir;
    use tippwerk::content::{Difficulty, Mode, TypingText};

    use super::*;

    fn catalog() -> Catalog {
        let text = |t: &str| TypingText {
            text: t.to_string(),
            translation: String::new(),
            pattern: String::new(),
            explanation: String::new(),
        };
        let mut typing = BTreeMap::new();
        typing.insert(Difficulty::Beginner, vec![text("Ich bin"), text("Du bist")]);
        Catalog::from_parts(typing, BTreeMap::new())
    }

    fn make_app(dir: &TempDir) -> App {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let session = Session::with_rng(
            catalog(),
            SessionSettings::default(),
            SmallRng::seed_from_u64(5),
        );
        App::with_parts(
            session,
            Config::default(),
            Glossary::default(),
            Some(store),
            Theme::default(),
        )
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for ch in s.chars() {
            app.type_char(ch, now);
        }
    }

    #[test]
    fn test_typing_and_backspace_edit_input() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let t0 = Instant::now();
        app.start_session(t0);
        let first: String = app.session.drill().unwrap().reference().chars().take(1).collect();
        type_str(&mut app, &first, t0);
        type_str(&mut app, "##", t0);
        assert_eq!(app.session.error_count(), 2);
        app.backspace(t0);
        app.backspace(t0);
        assert_eq!(app.session.input(), first);
        assert_eq!(app.session.error_count(), 0);
    }

    #[test]
    fn test_progress_recorded_once_per_session() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let t0 = Instant::now();
        app.start_session(t0);
        assert_eq!(app.session.mode(), Mode::Typing);

        let mut now = t0;
        for _ in 0..2 {
            let target = app.session.drill().unwrap().reference().to_string();
            type_str(&mut app, &target, now);
            now += Duration::from_secs(2);
            app.tick(now);
        }
        assert_eq!(app.session.phase(), Phase::Result);
        assert_eq!(app.progress.total_games_played, 1);
        assert_eq!(app.progress.high_score, 150);

        // Further ticks on the result screen do not record again.
        app.tick(now + Duration::from_secs(5));
        assert_eq!(app.progress.total_games_played, 1);

        let reloaded = JsonStore::with_base_dir(dir.path().to_path_buf())
            .unwrap()
            .load_progress();
        assert_eq!(reloaded.total_games_played, 1);
        assert_eq!(reloaded.streak_days, 1);

        app.practice_again(now);
        app.skip(now);
        app.skip(now);
        assert_eq!(app.progress.total_games_played, 2);
    }

    #[test]
    fn test_missing_store_keeps_playing() {
        let session = Session::with_rng(
            catalog(),
            SessionSettings::default(),
            SmallRng::seed_from_u64(1),
        );
        let mut app = App::with_parts(
            session,
            Config::default(),
            Glossary::default(),
            None,
            Theme::default(),
        );
        let t0 = Instant::now();
        app.start_session(t0);
        app.skip(t0);
        app.skip(t0);
        assert_eq!(app.session.phase(), Phase::Result);
        assert_eq!(app.progress.total_games_played, 1);
    }
}
