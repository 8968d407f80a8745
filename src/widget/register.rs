use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, StatefulWidget, Widget};

use api::model::Registration;

use super::{block, form, form::TextField};
use crate::draw::{add_padding, centered_rect, PaddingDirection};
use crate::theme::style;
use crate::THEME;

pub struct RegisterState {
    pub fields: [TextField; 5],
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl RegisterState {
    pub fn new() -> RegisterState {
        RegisterState {
            fields: [
                TextField::new("First Name"),
                TextField::new("Last Name"),
                TextField::new("Email"),
                TextField::new("Username"),
                TextField::masked("Password"),
            ],
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    /// All fields are required; anything beyond presence is the backend's
    /// job to validate.
    pub fn registration(&self) -> Option<Registration> {
        if self.fields.iter().any(|field| field.value.trim().is_empty()) {
            return None;
        }

        Some(Registration {
            first_name: self.fields[0].value.trim().to_string(),
            last_name: self.fields[1].value.trim().to_string(),
            email: self.fields[2].value.trim().to_string(),
            username: self.fields[3].value.trim().to_string(),
            password: self.fields[4].value.clone(),
        })
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

pub struct RegisterWidget {}

impl StatefulWidget for RegisterWidget {
    type State = RegisterState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let rect = centered_rect(52, 13, area);

        block::new(" Register ").render(rect, buf);

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
                "Registering...",
                style().fg(THEME.text_secondary()),
            )));
        } else {
            lines.push(Line::default());
        }

        lines.push(Line::from(Span::styled(
            "<Enter> register · <Tab> next field · <Esc> back to login",
            style().fg(THEME.gray()),
        )));

        Paragraph::new(lines)
            .style(style())
            .alignment(Alignment::Left)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_every_field() {
        let mut state = RegisterState::new();
        assert!(state.registration().is_none());

        let values = ["John", "Doe", "john@doe.dev", "john_doe", "secret"];
        for (field, value) in state.fields.iter_mut().zip(values.iter()) {
            field.value.push_str(value);
        }

        let registration = state.registration().unwrap();
        assert_eq!(registration.first_name, "John");
        assert_eq!(registration.username, "john_doe");

        state.fields[2].value.clear();
        assert!(state.registration().is_none());
    }
}
