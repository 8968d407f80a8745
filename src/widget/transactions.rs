use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, StatefulWidget, Table, Widget};

use api::model::Transaction;

use super::block;
use crate::common::format_usd;
use crate::draw::{add_padding, PaddingDirection};
use crate::theme::style;
use crate::THEME;

pub struct TransactionsState {
    pub portfolio_id: i64,
    pub items: Vec<Transaction>,
    pub loading: bool,
}

impl TransactionsState {
    pub fn new(portfolio_id: i64) -> TransactionsState {
        TransactionsState {
            portfolio_id,
            items: Vec::new(),
            loading: true,
        }
    }
}

pub struct TransactionsWidget {
    pub tick: usize,
}

impl StatefulWidget for TransactionsWidget {
    type State = TransactionsState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        block::new(" Transaction History ").render(area, buf);

        let mut inner = add_padding(area, 1, PaddingDirection::Top);
        inner = add_padding(inner, 2, PaddingDirection::Left);
        inner = add_padding(inner, 2, PaddingDirection::Right);
        inner = add_padding(inner, 2, PaddingDirection::Bottom);

        if state.loading {
            Paragraph::new(format!("Loading{}", ".".repeat(self.tick + 1)))
                .style(style().fg(THEME.text_secondary()))
                .render(inner, buf);
        } else if state.items.is_empty() {
            Paragraph::new("No transactions found")
                .style(style().fg(THEME.gray()))
                .render(inner, buf);
        } else {
            let header = Row::new(vec!["Date & Time", "Description", "Amount", "Status"])
                .style(style().add_modifier(Modifier::BOLD).fg(THEME.text_normal()));

            let portfolio_id = state.portfolio_id;

            let rows: Vec<Row> = state
                .items
                .iter()
                .map(|transaction| {
                    let incoming = transaction.is_incoming(portfolio_id);
                    let color = if incoming { THEME.profit() } else { THEME.loss() };

                    Row::new(vec![
                        Cell::from(
                            transaction
                                .created_at
                                .with_timezone(&Local)
                                .format("%Y-%m-%d %H:%M:%S")
                                .to_string(),
                        ),
                        Cell::from(transaction.description.clone()),
                        Cell::from(format!(
                            "{}{}",
                            if incoming { "+" } else { "-" },
                            format_usd(transaction.amount)
                        ))
                        .style(style().fg(color)),
                        Cell::from(transaction.status.clone()),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(14),
                Constraint::Length(12),
            ];

            Widget::render(
                Table::new(rows, widths).header(header).style(style()),
                inner,
                buf,
            );
        }

        let footer = Rect {
            x: inner.x,
            y: area.bottom().saturating_sub(2),
            width: inner.width,
            height: 1,
        };
        Paragraph::new(Span::styled(
            " g refresh · <Esc> back to portfolio ",
            style().fg(THEME.gray()),
        ))
        .render(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn transaction(receiver_id: i64) -> Transaction {
        Transaction {
            id: 1,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            description: String::from("Deposit"),
            amount: 1000.0,
            status: String::from("COMPLETED"),
            receiver_id,
        }
    }

    fn render(state: &mut TransactionsState) -> Vec<String> {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                frame.render_stateful_widget(TransactionsWidget { tick: 0 }, frame.size(), state)
            })
            .unwrap();

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
    fn incoming_amounts_get_a_plus_prefix() {
        let mut state = TransactionsState::new(1);
        state.loading = false;
        state.items = vec![transaction(1)];

        let rows = render(&mut state);
        assert!(rows.iter().any(|row| row.contains("+$1,000.00")));
    }

    #[test]
    fn outgoing_amounts_get_a_minus_prefix() {
        let mut state = TransactionsState::new(2);
        state.loading = false;
        state.items = vec![transaction(1)];

        let rows = render(&mut state);
        assert!(rows.iter().any(|row| row.contains("-$1,000.00")));
    }

    #[test]
    fn empty_history_says_so() {
        let mut state = TransactionsState::new(1);
        state.loading = false;

        let rows = render(&mut state);
        assert!(rows.iter().any(|row| row.contains("No transactions found")));
    }
}
