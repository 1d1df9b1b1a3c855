use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tippwerk::session::SessionSummary;
use tippwerk::store::ProgressData;

use crate::ui::theme::Theme;

pub struct ResultScreen<'a> {
    summary: &'a SessionSummary,
    progress: &'a ProgressData,
    theme: &'a Theme,
}

impl<'a> ResultScreen<'a> {
    pub fn new(summary: &'a SessionSummary, progress: &'a ProgressData, theme: &'a Theme) -> Self {
        Self {
            summary,
            progress,
            theme,
        }
    }
}

impl Widget for ResultScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(" Ergebnis ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let acc_color = if summary.stats.accuracy >= 95 {
            colors.success()
        } else if summary.stats.accuracy >= 85 {
            colors.warning()
        } else {
            colors.error()
        };

        Paragraph::new(Line::from(Span::styled(
            summary.verdict(),
            Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let row = |name: &'static str, text: String, style: Style| {
            Line::from(vec![Span::styled(name, label), Span::styled(text, style)])
        };
        let high_score = if summary.score >= self.progress.high_score && summary.score > 0 {
            "  new best!"
        } else {
            ""
        };
        Paragraph::new(vec![
            row("  Speed:     ", format!("{} WPM", summary.stats.wpm), value),
            row(
                "  Accuracy:  ",
                format!("{}%", summary.stats.accuracy),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            row(
                "  Completed: ",
                format!("{}/{}", summary.completed, summary.total),
                value,
            ),
            row("  Skipped:   ", summary.skipped.to_string(), label),
            row("  Score:     ", format!("{}{high_score}", summary.score), value),
            row("  Time:      ", format!("{}s", summary.active_secs), label),
        ])
        .render(layout[1], buf);

        if let Some(next) = summary.suggested {
            let text = if next == summary.difficulty {
                "  Excellent! You've mastered the hardest level.".to_string()
            } else {
                format!("  Ready for more? Try {} next.", next.label())
            };
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(colors.success()),
            )))
            .render(layout[2], buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Practice again  ", Style::default().fg(colors.accent())),
            Span::styled("[m] Menu  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]))
        .render(layout[4], buf);
    }
}
