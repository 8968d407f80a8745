use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use super::block;
use crate::draw::centered_rect;
use crate::theme::style;
use crate::THEME;

pub struct LandingWidget {}

impl Widget for LandingWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered_rect(44, 9, area);

        block::new(" Finance App ").render(rect, buf);

        let lines = vec![
            Line::default(),
            Line::from(Span::styled(
                "Hello",
                style().add_modifier(Modifier::BOLD).fg(THEME.text_primary()),
            )),
            Line::from(Span::styled(
                "Welcome to Finance App",
                style().fg(THEME.text_normal()),
            )),
            Line::default(),
            Line::from(Span::styled(
                "l: sign in    r: create an account",
                style().fg(THEME.text_secondary()),
            )),
            Line::from(Span::styled("q: quit", style().fg(THEME.gray()))),
        ];

        Paragraph::new(lines)
            .style(style())
            .alignment(Alignment::Center)
            .render(rect, buf);
    }
}
