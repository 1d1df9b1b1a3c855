use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tippwerk::content::{Catalog, Difficulty, Mode};
use tippwerk::store::ProgressData;

use crate::ui::theme::Theme;

/// Tier and mode selection for the next session.
pub struct MenuState {
    pub difficulty: Difficulty,
    pub mode: Mode,
}

impl MenuState {
    pub fn new(difficulty: Difficulty, mode: Mode) -> Self {
        Self { difficulty, mode }
    }

    pub fn next(&mut self) {
        let idx = self.position();
        self.difficulty = Difficulty::ALL[(idx + 1) % Difficulty::ALL.len()];
    }

    pub fn prev(&mut self) {
        let idx = self.position();
        self.difficulty = if idx > 0 {
            Difficulty::ALL[idx - 1]
        } else {
            Difficulty::ALL[Difficulty::ALL.len() - 1]
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Typing => Mode::Builder,
            Mode::Builder => Mode::Typing,
        };
    }

    fn position(&self) -> usize {
        Difficulty::ALL
            .iter()
            .position(|d| *d == self.difficulty)
            .unwrap_or(0)
    }
}

pub struct Menu<'a> {
    state: &'a MenuState,
    catalog: &'a Catalog,
    progress: &'a ProgressData,
    theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(
        state: &'a MenuState,
        catalog: &'a Catalog,
        progress: &'a ProgressData,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            catalog,
            progress,
            theme,
        }
    }
}

impl Widget for Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "tippwerk",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Deutsch tippen und Sätze bauen",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let mode_spans: Vec<Span> = [Mode::Typing, Mode::Builder]
            .into_iter()
            .map(|mode| {
                let selected = mode == self.state.mode;
                let style = if selected {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.text_pending())
                };
                Span::styled(format!(" {} ", mode.label()), style)
            })
            .flat_map(|span| [span, Span::raw("  ")])
            .collect();
        Paragraph::new(vec![
            Line::from(Span::styled(" Mode [t/b]", Style::default().fg(colors.fg()))),
            Line::from(mode_spans),
        ])
        .render(layout[1], buf);

        let tier_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3); 3])
            .split(layout[2]);

        for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
            let is_selected = *difficulty == self.state.difficulty;
            let indicator = if is_selected { ">" } else { " " };
            let count = match self.state.mode {
                Mode::Typing => self.catalog.typing(*difficulty).len(),
                Mode::Builder => self.catalog.builder(*difficulty).len(),
            };

            let label_text = format!(" {indicator} [{}] {}", i + 1, difficulty.label());
            let desc_text = format!("     {count} challenges");

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    desc_text,
                    Style::default().fg(colors.text_pending()),
                )),
            ];
            if i < tier_layout.len() {
                Paragraph::new(lines).render(tier_layout[i], buf);
            }
        }

        let progress = self.progress;
        let mut progress_lines = vec![Line::from("")];
        if progress.total_games_played > 0 {
            progress_lines.push(Line::from(Span::styled(
                format!(
                    " Best {}  |  Avg {:.0}  |  {} sessions  |  {} day streak",
                    progress.high_score,
                    progress.average_score,
                    progress.total_games_played,
                    progress.streak_days,
                ),
                Style::default().fg(colors.text_pending()),
            )));
        }
        Paragraph::new(progress_lines)
            .alignment(Alignment::Center)
            .render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_wraps_around() {
        let mut state = MenuState::new(Difficulty::Advanced, Mode::Typing);
        state.next();
        assert_eq!(state.difficulty, Difficulty::Beginner);
        state.prev();
        assert_eq!(state.difficulty, Difficulty::Advanced);
        state.prev();
        assert_eq!(state.difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn test_toggle_mode() {
        let mut state = MenuState::new(Difficulty::Beginner, Mode::Typing);
        state.toggle_mode();
        assert_eq!(state.mode, Mode::Builder);
        state.toggle_mode();
        assert_eq!(state.mode, Mode::Typing);
    }
}
