use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, StatefulWidget, Widget};

use api::model::Portfolio;

use super::block;
use crate::common::format_usd;
use crate::draw::{add_padding, centered_rect, PaddingDirection};
use crate::theme::style;
use crate::THEME;

const CARD_HEIGHT: u16 = 4;

pub struct DashboardState {
    pub username: Option<String>,
    pub portfolios: Vec<Portfolio>,
    pub selected: usize,
    pub loading: bool,
    pub create_open: bool,
    pub creating: bool,
}

impl DashboardState {
    pub fn new() -> DashboardState {
        DashboardState {
            username: None,
            portfolios: Vec::new(),
            selected: 0,
            loading: true,
            create_open: false,
            creating: false,
        }
    }

    pub fn select_next(&mut self) {
        if !self.portfolios.is_empty() {
            self.selected = (self.selected + 1) % self.portfolios.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.portfolios.is_empty() {
            self.selected = (self.selected + self.portfolios.len() - 1) % self.portfolios.len();
        }
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.portfolios.get(self.selected).map(|p| p.id)
    }
}

pub struct DashboardWidget {
    pub tick: usize,
}

impl StatefulWidget for DashboardWidget {
    type State = DashboardState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let title = match &state.username {
            Some(name) => format!(" Your Portfolios · Welcome, {} ", name),
            None => String::from(" Your Portfolios "),
        };

        block::new(&title).render(area, buf);

        let mut inner = add_padding(area, 1, PaddingDirection::Top);
        inner = add_padding(inner, 2, PaddingDirection::Left);
        inner = add_padding(inner, 2, PaddingDirection::Right);
        inner = add_padding(inner, 2, PaddingDirection::Bottom);

        if state.loading {
            Paragraph::new(format!("Loading{}", ".".repeat(self.tick + 1)))
                .style(style().fg(THEME.text_secondary()))
                .render(inner, buf);
        } else if state.portfolios.is_empty() {
            Paragraph::new("No portfolios yet. Press c to create one.")
                .style(style().fg(THEME.text_normal()))
                .render(inner, buf);
        } else {
            for (idx, portfolio) in state.portfolios.iter().enumerate() {
                let y = inner.y + idx as u16 * CARD_HEIGHT;

                if y + CARD_HEIGHT > inner.bottom() {
                    break;
                }

                let card = Rect {
                    x: inner.x,
                    y,
                    width: inner.width,
                    height: CARD_HEIGHT,
                };

                render_card(portfolio, idx == state.selected, card, buf);
            }
        }

        // Footer hints
        let footer = Rect {
            x: inner.x,
            y: area.bottom().saturating_sub(2),
            width: inner.width,
            height: 1,
        };
        Paragraph::new(Span::styled(
            " <Enter> open · <Up/Down> select · c create · g refresh · l log out ",
            style().fg(THEME.gray()),
        ))
        .render(footer, buf);

        if state.create_open {
            render_create_dialog(state.creating, area, buf);
        }
    }
}

fn render_card(portfolio: &Portfolio, selected: bool, area: Rect, buf: &mut Buffer) {
    let title_style = if selected {
        style()
            .add_modifier(Modifier::BOLD)
            .fg(THEME.highlight_focused())
    } else {
        style().fg(THEME.text_primary())
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(
                "{} Portfolio #{}",
                if selected { ">" } else { " " },
                portfolio.id
            ),
            title_style,
        )),
        Line::from(Span::styled(
            format!("  Cash Balance: {}", format_usd(portfolio.cash_balance)),
            style().fg(THEME.text_normal()),
        )),
        Line::from(Span::styled(
            format!("  Stocks: {}", portfolio.stocks.len()),
            style().fg(THEME.text_normal()),
        )),
    ];

    Paragraph::new(lines).style(style()).render(area, buf);
}

fn render_create_dialog(creating: bool, area: Rect, buf: &mut Buffer) {
    let rect = centered_rect(56, 8, area);

    Clear.render(rect, buf);
    block::new(" Create New Portfolio ").render(rect, buf);

    let mut inner = add_padding(rect, 1, PaddingDirection::Top);
    inner = add_padding(inner, 2, PaddingDirection::Left);
    inner = add_padding(inner, 2, PaddingDirection::Right);

    let status = if creating {
        Span::styled("Creating...", style().fg(THEME.text_secondary()))
    } else {
        Span::styled("<Enter> create · <Esc> cancel", style().fg(THEME.gray()))
    };

    let lines = vec![
        Line::from(Span::styled(
            "This will create a new portfolio for your account.",
            style().fg(THEME.text_normal()),
        )),
        Line::from(Span::styled(
            "You can add stocks and manage your investments after",
            style().fg(THEME.text_normal()),
        )),
        Line::from(Span::styled(
            "creation.",
            style().fg(THEME.text_normal()),
        )),
        Line::default(),
        Line::from(status),
    ];

    Paragraph::new(lines)
        .style(style())
        .alignment(Alignment::Left)
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();

        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn renders_portfolio_card() {
        let mut state = DashboardState::new();
        state.loading = false;
        state.portfolios = vec![Portfolio {
            id: 1,
            cash_balance: 1000.0,
            stocks: vec![],
        }];

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                frame.render_stateful_widget(DashboardWidget { tick: 0 }, frame.size(), &mut state)
            })
            .unwrap();

        let rows = rows(&terminal);
        assert!(rows.iter().any(|row| row.contains("Portfolio #1")));
        assert!(rows.iter().any(|row| row.contains("Cash Balance: $1,000.00")));
        assert!(rows.iter().any(|row| row.contains("Stocks: 0")));
    }

    #[test]
    fn selection_wraps_around() {
        let mut state = DashboardState::new();
        state.portfolios = vec![
            Portfolio {
                id: 1,
                cash_balance: 0.0,
                stocks: vec![],
            },
            Portfolio {
                id: 2,
                cash_balance: 0.0,
                stocks: vec![],
            },
        ];

        assert_eq!(state.selected_id(), Some(1));

        state.select_next();
        assert_eq!(state.selected_id(), Some(2));

        state.select_next();
        assert_eq!(state.selected_id(), Some(1));

        state.select_prev();
        assert_eq!(state.selected_id(), Some(2));
    }
}
