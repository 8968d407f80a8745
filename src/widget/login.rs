use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, StatefulWidget, Widget};

use super::{block, form, form::TextField};
use crate::draw::{add_padding, centered_rect, PaddingDirection};
use crate::theme::style;
use crate::THEME;

pub struct LoginState {
    pub fields: [TextField; 2],
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginState {
    pub fn new() -> LoginState {
        LoginState {
            fields: [TextField::new("Username"), TextField::masked("Password")],
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn username(&self) -> &str {
        &self.fields[0].value
    }

    pub fn password(&self) -> &str {
        &self.fields[1].value
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn add_char(&mut self, c: char) {
        self.fields[self.focus].value.push(c);
    }

    pub fn del_char(&mut self) {
        self.fields[self.focus].value.pop();
    }
}

pub struct LoginWidget {}

impl StatefulWidget for LoginWidget {
    type State = LoginState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let rect = centered_rect(50, 11, area);

        block::new(" Sign in ").render(rect, buf);

        let mut inner = add_padding(rect, 1, PaddingDirection::Top);
        inner = add_padding(inner, 2, PaddingDirection::Left);
        inner = add_padding(inner, 2, PaddingDirection::Right);

        let mut lines = form::lines(&state.fields, state.focus);
        lines.push(Line::default());

        if let Some(error) = &state.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                style().fg(THEME.loss()),
            )));
        } else if state.submitting {
            lines.push(Line::from(Span::styled(
                "Signing in...",
                style().fg(THEME.text_secondary()),
            )));
        } else {
            lines.push(Line::default());
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "<Enter> sign in · <Tab> next field · <Esc> back",
            style().fg(THEME.gray()),
        )));
        lines.push(Line::from(Span::styled(
            "No account yet? <Esc> then r to register",
            style().fg(THEME.gray()),
        )));

        Paragraph::new(lines)
            .style(style())
            .alignment(Alignment::Left)
            .render(inner, buf);
    }
}
