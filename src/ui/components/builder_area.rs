use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use tippwerk::content::Challenge;
use tippwerk::session::Session;

use crate::ui::components::typing_area::input_spans;
use crate::ui::theme::Theme;

/// Sentence-builder drill: key words to use, a reveal line for hinted
/// characters, and the learner's free-form answer.
pub struct BuilderArea<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> BuilderArea<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// Reference characters with only the revealed ones shown. Spaces are kept so
/// word boundaries stay visible.
pub fn reveal_mask(reference: &str, revealed: &[(usize, String)]) -> String {
    reference
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            if ch == ' ' {
                ' '
            } else if revealed.iter().any(|(pos, _)| *pos == i) {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

impl Widget for BuilderArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (Some(drill), Some(Challenge::Builder(challenge))) =
            (self.session.drill(), self.session.current_challenge())
        else {
            return;
        };

        let mut lines = Vec::new();

        let mut key_spans = vec![Span::styled(
            "Schlüsselwörter: ",
            Style::default().fg(colors.text_pending()),
        )];
        for (i, word) in challenge.key_words.iter().enumerate() {
            if i > 0 {
                key_spans.push(Span::raw("  "));
            }
            key_spans.push(Span::styled(
                word.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(key_spans));
        lines.push(Line::from(""));

        if challenge.answers.is_empty() {
            lines.push(Line::from(Span::styled(
                "This challenge has no accepted answers. Press Tab to skip.",
                Style::default().fg(colors.warning()),
            )));
        }

        let revealed = self.session.revealed_tokens();
        if !revealed.is_empty() {
            let shaking = self.session.hints().shaking().is_some();
            let style = if shaking {
                Style::default()
                    .fg(colors.text_incorrect())
                    .bg(colors.text_incorrect_bg())
            } else {
                Style::default().fg(colors.revealed())
            };
            lines.push(Line::from(vec![
                Span::styled("Hinweis: ", Style::default().fg(colors.text_pending())),
                Span::styled(reveal_mask(drill.reference(), &revealed), style),
            ]));
        }

        let feedback = drill.char_feedback();
        lines.push(Line::from(input_spans(colors, &drill.input, &feedback)));
        lines.push(Line::from(""));

        if drill.finished {
            let gloss = drill
                .best_answer()
                .map(|a| a.gloss.as_str())
                .filter(|g| !g.is_empty());
            lines.push(Line::from(Span::styled(
                "Richtig! Well built.",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(gloss) = gloss {
                lines.push(Line::from(Span::styled(
                    format!("\"{gloss}\""),
                    Style::default().fg(colors.fg()),
                )));
            }
        } else if drill.verdict == Some(false) {
            lines.push(Line::from(Span::styled(
                "Nicht ganz. Press Enter to try again.",
                Style::default().fg(colors.error()),
            )));
        }

        let block = Block::bordered()
            .title(" Satzbau ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
