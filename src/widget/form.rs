use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme::style;
use crate::THEME;

/// One text input in a form. Masked fields render bullets instead of
/// their value.
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    mask: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> TextField {
        TextField {
            label,
            value: String::new(),
            mask: false,
        }
    }

    pub fn masked(label: &'static str) -> TextField {
        TextField {
            label,
            value: String::new(),
            mask: true,
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn display(&self) -> String {
        if self.mask {
            "\u{2022}".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Renders form fields the way the add-ticker prompt does: a `>` marker
/// and highlight on the focused field.
pub fn lines(fields: &[TextField], focus: usize) -> Vec<Line<'static>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let focused = idx == focus;

            let value_style = if focused {
                style()
                    .add_modifier(Modifier::BOLD)
                    .fg(THEME.highlight_focused())
            } else {
                style().fg(THEME.highlight_unfocused())
            };

            let mut spans = vec![
                Span::styled(
                    format!("{}{}: ", if focused { "> " } else { "  " }, field.label),
                    style().fg(THEME.text_normal()),
                ),
                Span::styled(field.display(), value_style),
            ];

            if focused {
                spans.push(Span::styled("\u{258f}", value_style));
            }

            Line::from(spans)
        })
        .collect()
}
