use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use tippwerk::content::{Challenge, Glossary};

use crate::ui::theme::Theme;

/// Meaning and grammar notes for the current challenge (Ctrl+T).
pub struct InfoPanel<'a> {
    challenge: &'a Challenge,
    glossary: &'a Glossary,
    theme: &'a Theme,
}

impl<'a> InfoPanel<'a> {
    pub fn new(challenge: &'a Challenge, glossary: &'a Glossary, theme: &'a Theme) -> Self {
        Self {
            challenge,
            glossary,
            theme,
        }
    }
}

impl Widget for InfoPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let heading = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let body = Style::default().fg(colors.fg());
        let muted = Style::default().fg(colors.text_pending());

        let mut lines = Vec::new();
        match self.challenge {
            Challenge::Typing(text) => {
                lines.push(Line::from(Span::styled("Bedeutung", heading)));
                lines.push(Line::from(Span::styled(text.translation.clone(), body)));
                lines.push(Line::from(""));
            }
            Challenge::Builder(builder) => {
                lines.push(Line::from(Span::styled("Wörter", heading)));
                for word in &builder.key_words {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{word}: "), body),
                        Span::styled(self.glossary.gloss(word).to_string(), muted),
                    ]));
                }
                lines.push(Line::from(""));
                if !builder.hints.is_empty() {
                    lines.push(Line::from(Span::styled("Tipps", heading)));
                    for hint in &builder.hints {
                        lines.push(Line::from(Span::styled(format!("• {hint}"), body)));
                    }
                    lines.push(Line::from(""));
                }
            }
        }

        if !self.challenge.pattern().is_empty() {
            lines.push(Line::from(Span::styled(
                self.challenge.pattern().to_string(),
                heading,
            )));
        }
        if !self.challenge.explanation().is_empty() {
            lines.push(Line::from(Span::styled(
                self.challenge.explanation().to_string(),
                muted,
            )));
        }

        let block = Block::bordered()
            .title(" Info ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
