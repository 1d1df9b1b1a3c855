use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use tippwerk::engine::matcher::WordStatus;
use tippwerk::session::Session;

use crate::ui::theme::{Theme, ThemeColors};

/// Typing-copy drill: target sentence with per-word highlighting above the
/// learner's input line.
pub struct TypingArea<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// Style for one target word given its status and hint state.
fn word_style(colors: &ThemeColors, status: WordStatus, revealed: bool, shaking: bool) -> Style {
    if shaking {
        return Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::BOLD);
    }
    if revealed && status != WordStatus::Correct {
        return Style::default()
            .fg(colors.revealed())
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    match status {
        WordStatus::Pending => Style::default().fg(colors.text_pending()),
        WordStatus::Current => Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg()),
        WordStatus::Correct => Style::default().fg(colors.text_correct()),
        WordStatus::Incorrect => Style::default()
            .fg(colors.text_incorrect())
            .add_modifier(Modifier::UNDERLINED),
    }
}

/// Typed characters, each colored by whether it matches the target at the
/// same position.
pub fn input_spans<'s>(colors: &ThemeColors, input: &str, feedback: &[bool]) -> Vec<Span<'s>> {
    let mut spans = vec![Span::styled("> ", Style::default().fg(colors.accent()))];
    for (ch, ok) in input.chars().zip(feedback.iter().copied()) {
        let style = if ok {
            Style::default().fg(colors.fg())
        } else {
            Style::default()
                .fg(colors.text_incorrect())
                .bg(colors.text_incorrect_bg())
        };
        spans.push(Span::styled(ch.to_string(), style));
    }
    spans.push(Span::styled(
        " ",
        Style::default().bg(colors.text_cursor_bg()),
    ));
    spans
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(drill) = self.session.drill() else {
            return;
        };
        let hints = self.session.hints();
        let target = drill.reference();
        let statuses = drill.word_statuses();

        let mut target_spans = Vec::new();
        for (i, (word, status)) in target.split(' ').zip(statuses).enumerate() {
            if i > 0 {
                target_spans.push(Span::raw(" "));
            }
            let style = word_style(
                colors,
                status,
                hints.is_revealed(i),
                self.session.is_shaking(i),
            );
            target_spans.push(Span::styled(word.to_string(), style));
        }

        // Positional, case-sensitive: what the error count uses.
        let mut target_chars = target.chars();
        let feedback: Vec<bool> = drill
            .input
            .chars()
            .map(|ch| target_chars.next() == Some(ch))
            .collect();

        let mut lines = vec![
            Line::from(target_spans),
            Line::from(""),
            Line::from(input_spans(colors, &drill.input, &feedback)),
            Line::from(""),
        ];

        if drill.finished {
            lines.push(Line::from(Span::styled(
                "Richtig! Perfect typing. Next sentence coming up...",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
        } else if drill.error_count > 0 {
            lines.push(Line::from(Span::styled(
                format!("{} error(s)", drill.error_count),
                Style::default().fg(colors.error()),
            )));
        }

        let block = Block::bordered()
            .title(" Abtippen ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
