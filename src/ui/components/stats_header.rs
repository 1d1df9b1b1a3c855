use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tippwerk::session::Session;

use crate::ui::theme::Theme;

/// One-line live stats above the drill: position, WPM, accuracy, score.
pub struct StatsHeader<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> StatsHeader<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for StatsHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.session.live_stats();

        let title = format!(
            " {} · {} ",
            self.session.mode().label(),
            self.session.difficulty().as_str()
        );
        let position = format!(
            " {}/{} ",
            (self.session.index() + 1).min(self.session.len()),
            self.session.len()
        );
        let numbers = format!(
            " WPM {}  |  Acc {}%  |  Errors {}  |  Score {} ",
            stats.wpm,
            stats.accuracy,
            self.session.error_count(),
            self.session.score()
        );

        let acc_color = if stats.accuracy >= 95 {
            colors.success()
        } else if stats.accuracy >= 85 {
            colors.warning()
        } else {
            colors.error()
        };

        let line = Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(position, Style::default().fg(colors.accent())),
            Span::styled(numbers, Style::default().fg(acc_color)),
        ]);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(line).block(block).render(area, buf);
    }
}
