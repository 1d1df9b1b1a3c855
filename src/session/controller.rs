//! The practice session state machine: `menu → active → result`.
//!
//! Every operation takes the event timestamp; nothing here reads the clock.
//! Delayed work (auto-advance after a solve, clearing the hint shake pulse)
//! goes through a [`TimerQueue`] and is driven by [`Session::tick`]. Each
//! pending callback is held by ticket, and every manual transition cancels
//! the outstanding auto-advance before it moves on, so a late timer can never
//! advance twice.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::config::{Config, HintConfig};
use crate::content::{Catalog, Challenge, Difficulty, Mode};
use crate::engine::hint::{self, HintPolicy, HintTracker, HintUpdate};
use crate::engine::metrics::{self, Stats};
use crate::engine::scoring::{self, SuggestionRule};
use crate::engine::shuffle::shuffle;
use crate::session::clock::ActiveClock;
use crate::session::drill::DrillState;
use crate::session::input::{self, InputOutcome};
use crate::session::result::SessionSummary;
use crate::session::timer::{Ticket, TimerKind, TimerQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Active,
    Result,
}

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub typing_advance: Duration,
    pub builder_advance: Duration,
    pub shake: Duration,
    pub idle_gap: Duration,
    pub skip_penalty: u32,
    pub typing_hints: HintConfig,
    pub builder_hints: HintConfig,
    pub suggestion: SuggestionRule,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            typing_advance: Duration::from_millis(config.typing_advance_ms),
            builder_advance: Duration::from_millis(config.builder_advance_ms),
            shake: Duration::from_millis(config.shake_ms),
            idle_gap: Duration::from_millis(config.idle_gap_ms),
            skip_penalty: config.skip_penalty,
            typing_hints: config.typing_hints,
            builder_hints: config.builder_hints,
            suggestion: SuggestionRule {
                min_completed: config.suggest_min_completed,
                min_accuracy: config.suggest_min_accuracy,
                min_wpm: config.suggest_min_wpm,
            },
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct Session {
    settings: SessionSettings,
    catalog: Catalog,
    rng: SmallRng,
    phase: Phase,
    difficulty: Difficulty,
    mode: Mode,
    ordered: Vec<Challenge>,
    index: usize,
    drill: Option<DrillState>,
    hints: HintTracker,
    timers: TimerQueue,
    auto_advance: Option<Ticket>,
    shake_timer: Option<Ticket>,
    clock: ActiveClock,
    drill_active_offset: Duration,
    completed: usize,
    skipped: usize,
    score: u32,
    failed_submits: u32,
    typed_chars: usize,
    typed_words: usize,
    errors_total: usize,
    summary: Option<SessionSummary>,
}

impl Session {
    pub fn new(catalog: Catalog, settings: SessionSettings) -> Self {
        Self::with_rng(catalog, settings, SmallRng::from_entropy())
    }

    pub fn with_rng(catalog: Catalog, settings: SessionSettings, rng: SmallRng) -> Self {
        let hints = HintTracker::new(settings.typing_hints.policy, 1);
        let clock = ActiveClock::new(settings.idle_gap);
        Self {
            settings,
            catalog,
            rng,
            phase: Phase::Menu,
            difficulty: Difficulty::Beginner,
            mode: Mode::Typing,
            ordered: Vec::new(),
            index: 0,
            drill: None,
            hints,
            timers: TimerQueue::new(),
            auto_advance: None,
            shake_timer: None,
            clock,
            drill_active_offset: Duration::ZERO,
            completed: 0,
            skipped: 0,
            score: 0,
            failed_submits: 0,
            typed_chars: 0,
            typed_words: 0,
            errors_total: 0,
            summary: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn ordered(&self) -> &[Challenge] {
        &self.ordered
    }

    pub fn current_challenge(&self) -> Option<&Challenge> {
        match self.phase {
            Phase::Active => self.ordered.get(self.index),
            _ => None,
        }
    }

    pub fn drill(&self) -> Option<&DrillState> {
        self.drill.as_ref()
    }

    pub fn input(&self) -> &str {
        self.drill.as_ref().map(|d| d.input.as_str()).unwrap_or("")
    }

    pub fn error_count(&self) -> usize {
        self.drill.as_ref().map(|d| d.error_count).unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.drill.as_ref().is_some_and(|d| d.finished)
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hints(&self) -> &HintTracker {
        &self.hints
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn has_pending_advance(&self) -> bool {
        self.auto_advance.is_some_and(|ticket| self.timers.is_pending(ticket))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    /// Active typing time across the whole session.
    pub fn active_time(&self) -> Duration {
        self.clock.active()
    }

    /// WPM and accuracy for the current challenge's input.
    pub fn live_stats(&self) -> Stats {
        let active = self.clock.active().saturating_sub(self.drill_active_offset);
        metrics::compute_stats(self.input(), active, self.error_count())
    }

    fn hint_config(&self) -> HintConfig {
        match self.mode {
            Mode::Typing => self.settings.typing_hints,
            Mode::Builder => self.settings.builder_hints,
        }
    }

    fn advance_delay(&self) -> Duration {
        match self.mode {
            Mode::Typing => self.settings.typing_advance,
            Mode::Builder => self.settings.builder_advance,
        }
    }

    /// Correct tokens for every revealed position, taken from the current
    /// reference (best match in builder mode).
    pub fn revealed_tokens(&self) -> Vec<(usize, String)> {
        let Some(drill) = self.drill.as_ref() else {
            return Vec::new();
        };
        let reference = drill.reference();
        let word_level = self.hints.policy() == HintPolicy::WordLevel;
        self.hints
            .revealed()
            .filter_map(|pos| {
                let token = if word_level {
                    reference.split(' ').nth(pos).map(str::to_string)
                } else {
                    reference.chars().nth(pos).map(String::from)
                };
                token.map(|t| (pos, t))
            })
            .collect()
    }

    pub fn is_shaking(&self, pos: usize) -> bool {
        self.hints.shaking() == Some(pos)
    }

    /// `menu → active` (also used by practice-again and reshuffle).
    pub fn start(&mut self, difficulty: Difficulty, mode: Mode, now: Instant) {
        self.timers.clear();
        self.auto_advance = None;
        self.shake_timer = None;
        self.difficulty = difficulty;
        self.mode = mode;
        self.ordered = shuffle(&self.catalog.challenges(difficulty, mode), &mut self.rng);
        self.index = 0;
        self.completed = 0;
        self.skipped = 0;
        self.score = 0;
        self.failed_submits = 0;
        self.typed_chars = 0;
        self.typed_words = 0;
        self.errors_total = 0;
        self.clock.reset();
        self.summary = None;
        self.phase = Phase::Active;
        info!(%difficulty, %mode, challenges = self.ordered.len(), "session started");

        if self.ordered.is_empty() {
            self.finish(now);
        } else {
            self.load_current();
        }
    }

    /// `result → active` with a fresh shuffle of the same tier and mode.
    pub fn practice_again(&mut self, now: Instant) {
        if self.phase == Phase::Result {
            self.start(self.difficulty, self.mode, now);
        }
    }

    /// Restart the running session in a new order.
    pub fn reshuffle(&mut self, now: Instant) {
        if self.phase == Phase::Active {
            self.start(self.difficulty, self.mode, now);
        }
    }

    /// Back to idle from anywhere. Pending callbacks are dropped.
    pub fn back_to_menu(&mut self) {
        self.timers.clear();
        self.auto_advance = None;
        self.shake_timer = None;
        self.ordered.clear();
        self.index = 0;
        self.drill = None;
        self.hints.reset(1);
        self.clock.reset();
        self.summary = None;
        self.phase = Phase::Menu;
        debug!("returned to menu");
    }

    /// New raw input for the active challenge. Ignored outside the active
    /// phase and while a solved challenge waits for its auto-advance.
    pub fn input_changed(&mut self, value: &str, now: Instant) -> Option<InputOutcome> {
        if self.phase != Phase::Active {
            return None;
        }
        let hint_config = self.hint_config();
        let drill = self.drill.as_mut()?;
        if drill.finished {
            return None;
        }
        self.clock.record_activity(now);

        let was_solved = drill.solved;
        let outcome = input::process_input(drill, value);

        let fold_case = drill.is_builder();
        let reference = drill.reference().to_string();
        let updates = match hint_config.policy {
            HintPolicy::WordLevel => {
                hint::observe_words(&mut self.hints, &drill.input, &reference, fold_case)
            }
            _ => hint::observe_chars(&mut self.hints, &drill.input, &reference, fold_case),
        };
        if updates.contains(&HintUpdate::Shake) {
            self.start_shake(now);
        }
        if updates.contains(&HintUpdate::Revealed) {
            debug!(index = self.index, "hint revealed");
        }

        if outcome.completed {
            self.on_solved(was_solved, now);
        }
        Some(outcome)
    }

    /// Explicit answer check in builder mode. `None` when there is nothing
    /// to check.
    pub fn submit(&mut self, now: Instant) -> Option<bool> {
        if self.phase != Phase::Active {
            return None;
        }
        let drill = self.drill.as_mut()?;
        if !drill.is_builder() || drill.finished {
            return None;
        }
        let was_solved = drill.solved;
        let correct = input::process_submit(drill);
        if correct {
            self.on_solved(was_solved, now);
        } else {
            debug!(index = self.index, "submitted answer did not match");
        }
        Some(correct)
    }

    /// Clears the current input without advancing. Cancels a pending
    /// auto-advance; hint state for the challenge is kept.
    pub fn reset_current(&mut self, _now: Instant) {
        if self.phase != Phase::Active {
            return;
        }
        self.cancel_auto_advance();
        if let Some(drill) = self.drill.as_mut() {
            drill.clear_input();
        }
        self.clock.pause();
    }

    /// Builder "try again" after a failed submit.
    pub fn retry(&mut self, now: Instant) {
        self.reset_current(now);
    }

    /// Moves on without waiting. Skipping an unsolved challenge costs the
    /// configured penalty.
    pub fn skip(&mut self, now: Instant) {
        if self.phase != Phase::Active {
            return;
        }
        self.cancel_auto_advance();
        let solved = self.drill.as_ref().is_some_and(|d| d.solved);
        if !solved {
            self.skipped += 1;
            self.score = scoring::apply_skip_penalty(self.score, self.settings.skip_penalty);
            debug!(index = self.index, "challenge skipped");
        }
        self.advance(now);
    }

    /// Fires every callback due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for (ticket, kind) in self.timers.pop_due(now) {
            match kind {
                TimerKind::AutoAdvance => {
                    if self.auto_advance == Some(ticket) {
                        self.auto_advance = None;
                        self.advance(now);
                    }
                }
                TimerKind::ClearShake => {
                    if self.shake_timer == Some(ticket) {
                        self.shake_timer = None;
                        self.hints.clear_shake();
                    }
                }
            }
        }
    }

    fn on_solved(&mut self, was_solved: bool, now: Instant) {
        if !was_solved {
            self.completed += 1;
            self.score += scoring::points_for_solve(self.difficulty);
        }
        self.clock.pause();
        self.cancel_auto_advance();
        let delay = self.advance_delay();
        self.auto_advance = Some(self.timers.schedule(TimerKind::AutoAdvance, now, delay));
        debug!(index = self.index, completed = self.completed, "challenge solved");
    }

    fn start_shake(&mut self, now: Instant) {
        if let Some(old) = self.shake_timer.take() {
            self.timers.cancel(old);
        }
        let ticket = self.timers.schedule(TimerKind::ClearShake, now, self.settings.shake);
        self.shake_timer = Some(ticket);
    }

    fn cancel_auto_advance(&mut self) {
        if let Some(ticket) = self.auto_advance.take() {
            self.timers.cancel(ticket);
        }
    }

    fn load_current(&mut self) {
        let Some(challenge) = self.ordered.get(self.index) else {
            return;
        };
        self.drill = Some(DrillState::for_challenge(challenge));
        let hint_config = self.hint_config();
        let threshold = hint_config.threshold.roll(&mut self.rng);
        self.hints = HintTracker::new(hint_config.policy, threshold);
        self.drill_active_offset = self.clock.active();
    }

    fn advance(&mut self, now: Instant) {
        self.cancel_auto_advance();
        if let Some(ticket) = self.shake_timer.take() {
            self.timers.cancel(ticket);
        }
        if let Some(drill) = self.drill.take() {
            self.typed_chars += drill.input.chars().count();
            self.typed_words += metrics::word_count(&drill.input);
            self.errors_total += drill.error_count;
            self.failed_submits += drill.failed_submits;
        }
        self.clock.pause();

        if self.index + 1 < self.ordered.len() {
            self.index += 1;
            self.load_current();
            debug!(index = self.index, "advanced to next challenge");
        } else {
            self.finish(now);
        }
    }

    fn finish(&mut self, _now: Instant) {
        self.timers.clear();
        self.auto_advance = None;
        self.shake_timer = None;
        self.drill = None;
        self.hints.reset(1);

        let stats = metrics::stats_from_counts(
            self.typed_words,
            self.typed_chars,
            self.clock.active(),
            self.errors_total,
        );
        let suggested = scoring::suggest_difficulty(
            self.difficulty,
            self.completed,
            stats,
            &self.settings.suggestion,
        );
        self.summary = Some(SessionSummary {
            difficulty: self.difficulty,
            mode: self.mode,
            stats,
            completed: self.completed,
            skipped: self.skipped,
            total: self.ordered.len(),
            score: self.score,
            failed_submits: self.failed_submits,
            active_secs: self.clock.active().as_secs(),
            suggested,
        });
        self.phase = Phase::Result;
        info!(
            completed = self.completed,
            total = self.ordered.len(),
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            "session finished"
        );
    }
}
