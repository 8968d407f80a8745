use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Paragraph, Widget};

use super::block;
use crate::theme::style;
use crate::THEME;

const TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Transient, dismissible message pinned to the bottom of the screen.
/// Disappears on its own after a few seconds.
#[derive(Debug)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    created: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Notice {
        Notice {
            message: message.into(),
            severity: Severity::Success,
            created: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Notice {
        Notice {
            message: message.into(),
            severity: Severity::Error,
            created: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.created.elapsed() >= TIMEOUT
    }
}

pub struct NoticeWidget<'a>(pub &'a Notice);

impl<'a> Widget for NoticeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = match self.0.severity {
            Severity::Success => THEME.profit(),
            Severity::Error => THEME.loss(),
        };

        block::new(" Notice - <Esc> to dismiss ").render(area, buf);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        Paragraph::new(Span::styled(
            self.0.message.clone(),
            style().add_modifier(Modifier::BOLD).fg(color),
        ))
        .render(inner, buf);
    }
}
