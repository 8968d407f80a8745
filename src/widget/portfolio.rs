use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Clear, Paragraph, Row, StatefulWidget, Table, Widget};

use api::model::Portfolio;

use super::{block, form, form::TextField};
use crate::common::format_usd;
use crate::draw::{add_padding, centered_rect, PaddingDirection};
use crate::theme::style;
use crate::THEME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Deposit,
    Withdraw,
    AddStock,
}

pub struct PortfolioState {
    pub id: i64,
    pub portfolio: Option<Portfolio>,
    pub loading: bool,
    pub error: Option<String>,
    pub updating: bool,
    pub dialog: Option<Dialog>,
    pub amount: TextField,
    pub stock_fields: [TextField; 3],
    pub stock_focus: usize,
}

impl PortfolioState {
    pub fn new(id: i64) -> PortfolioState {
        PortfolioState {
            id,
            portfolio: None,
            loading: true,
            error: None,
            updating: false,
            dialog: None,
            amount: TextField::new("Amount"),
            stock_fields: [
                TextField::new("Stock Symbol"),
                TextField::new("Quantity"),
                TextField::new("Purchase Price"),
            ],
            stock_focus: 0,
        }
    }

    pub fn open_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.amount.clear();
        for field in self.stock_fields.iter_mut() {
            field.clear();
        }
        self.stock_focus = 0;
    }

    pub fn stock_focus_next(&mut self) {
        self.stock_focus = (self.stock_focus + 1) % self.stock_fields.len();
    }

    pub fn stock_focus_prev(&mut self) {
        self.stock_focus = (self.stock_focus + self.stock_fields.len() - 1) % self.stock_fields.len();
    }

    /// Validated add-stock submission. Tickers go out uppercased, the way
    /// the backend expects them.
    pub fn stock_submission(&self) -> Option<(String, u32, f64)> {
        let symbol = self.stock_fields[0].value.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }

        let quantity = self.stock_fields[1].value.trim().parse().ok()?;
        let price = self.stock_fields[2].value.trim().parse().ok()?;

        Some((symbol, quantity, price))
    }

    pub fn amount_submission(&self) -> Option<f64> {
        self.amount.value.trim().parse().ok()
    }
}

pub struct PortfolioWidget {
    pub tick: usize,
}

impl StatefulWidget for PortfolioWidget {
    type State = PortfolioState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let title = if state.updating {
            format!(" Portfolio #{} · Updating prices{} ", state.id, ".".repeat(self.tick + 1))
        } else {
            format!(" Portfolio #{} ", state.id)
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
            return;
        }

        if let Some(error) = &state.error {
            Paragraph::new(error.clone())
                .style(style().fg(THEME.loss()))
                .render(inner, buf);
            return;
        }

        let portfolio = match &state.portfolio {
            Some(portfolio) => portfolio,
            None => return,
        };

        // Summary
        let summary = vec![
            Line::from(vec![
                Span::styled("Cash Balance: ", style().fg(THEME.text_normal())),
                Span::styled(
                    format_usd(portfolio.cash_balance),
                    style().fg(THEME.text_secondary()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Total Stock Value: ", style().fg(THEME.text_normal())),
                Span::styled(
                    format_usd(portfolio.stock_value()),
                    style().fg(THEME.text_secondary()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Total Portfolio Value: ", style().fg(THEME.text_normal())),
                Span::styled(
                    format_usd(portfolio.total_value()),
                    style().add_modifier(Modifier::BOLD).fg(THEME.text_primary()),
                ),
            ]),
        ];

        let summary_area = Rect { height: 4.min(inner.height), ..inner };
        Paragraph::new(summary).style(style()).render(summary_area, buf);

        // Holdings table
        if inner.height > 4 {
            let table_area = Rect {
                y: inner.y + 4,
                height: inner.height - 4,
                ..inner
            };

            render_holdings(portfolio, table_area, buf);
        }

        // Footer hints
        let footer = Rect {
            x: inner.x,
            y: area.bottom().saturating_sub(2),
            width: inner.width,
            height: 1,
        };
        Paragraph::new(Span::styled(
            " d deposit · w withdraw · a add stock · u update prices · t transactions · <Esc> back ",
            style().fg(THEME.gray()),
        ))
        .render(footer, buf);

        match state.dialog {
            Some(Dialog::Deposit) => render_amount_dialog(" Deposit Funds ", state, area, buf),
            Some(Dialog::Withdraw) => render_amount_dialog(" Withdraw Funds ", state, area, buf),
            Some(Dialog::AddStock) => render_stock_dialog(state, area, buf),
            None => {}
        }
    }
}

fn render_holdings(portfolio: &Portfolio, area: Rect, buf: &mut Buffer) {
    if portfolio.stocks.is_empty() {
        Paragraph::new("No stocks yet. Press a to add one.")
            .style(style().fg(THEME.gray()))
            .render(area, buf);
        return;
    }

    let header = Row::new(vec![
        "Stock",
        "Symbol",
        "Qty",
        "Purchase",
        "Current",
        "Value",
        "Profit/Loss",
    ])
    .style(style().add_modifier(Modifier::BOLD).fg(THEME.text_normal()));

    let rows: Vec<Row> = portfolio
        .stocks
        .iter()
        .map(|holding| {
            let profit = holding.profit_loss();
            let color = if profit >= 0.0 { THEME.profit() } else { THEME.loss() };

            Row::new(vec![
                Cell::from(holding.name.clone()),
                Cell::from(holding.symbol.clone()),
                Cell::from(holding.quantity.to_string()),
                Cell::from(format_usd(holding.purchase_price)),
                Cell::from(format_usd(holding.current_price)),
                Cell::from(format_usd(holding.total_value())),
                Cell::from(format!(
                    "{} ({:.2}%)",
                    format_usd(profit),
                    holding.profit_loss_percent()
                ))
                .style(style().fg(color)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(22),
    ];

    Widget::render(
        Table::new(rows, widths).header(header).style(style()),
        area,
        buf,
    );
}

fn render_amount_dialog(title: &str, state: &PortfolioState, area: Rect, buf: &mut Buffer) {
    let rect = centered_rect(40, 7, area);

    Clear.render(rect, buf);
    block::new(title).render(rect, buf);

    let mut inner = add_padding(rect, 1, PaddingDirection::Top);
    inner = add_padding(inner, 2, PaddingDirection::Left);
    inner = add_padding(inner, 2, PaddingDirection::Right);

    let lines = vec![
        Line::from(vec![
            Span::styled("Amount: $", style().fg(THEME.text_normal())),
            Span::styled(
                state.amount.display(),
                style()
                    .add_modifier(Modifier::BOLD)
                    .fg(THEME.highlight_focused()),
            ),
            Span::styled("\u{258f}", style().fg(THEME.highlight_focused())),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "<Enter> confirm · <Esc> cancel",
            style().fg(THEME.gray()),
        )),
    ];

    Paragraph::new(lines).style(style()).render(inner, buf);
}

fn render_stock_dialog(state: &PortfolioState, area: Rect, buf: &mut Buffer) {
    let rect = centered_rect(46, 9, area);

    Clear.render(rect, buf);
    block::new(" Add Stock ").render(rect, buf);

    let mut inner = add_padding(rect, 1, PaddingDirection::Top);
    inner = add_padding(inner, 2, PaddingDirection::Left);
    inner = add_padding(inner, 2, PaddingDirection::Right);

    let mut lines = form::lines(&state.stock_fields, state.stock_focus);
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "<Enter> add · <Tab> next field · <Esc> cancel",
        style().fg(THEME.gray()),
    )));

    Paragraph::new(lines).style(style()).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use api::model::Holding;

    use super::*;

    #[test]
    fn stock_submission_uppercases_ticker() {
        let mut state = PortfolioState::new(1);
        state.stock_fields[0].value.push_str("aapl");
        state.stock_fields[1].value.push_str("5");
        state.stock_fields[2].value.push_str("100");

        assert_eq!(
            state.stock_submission(),
            Some((String::from("AAPL"), 5, 100.0))
        );
    }

    #[test]
    fn stock_submission_requires_every_field() {
        let mut state = PortfolioState::new(1);
        assert_eq!(state.stock_submission(), None);

        state.stock_fields[0].value.push_str("AAPL");
        assert_eq!(state.stock_submission(), None);

        state.stock_fields[1].value.push_str("five");
        state.stock_fields[2].value.push_str("100");
        assert_eq!(state.stock_submission(), None);
    }

    #[test]
    fn closing_a_dialog_resets_its_inputs() {
        let mut state = PortfolioState::new(1);
        state.open_dialog(Dialog::Deposit);
        state.amount.value.push_str("250");

        state.close_dialog();

        assert_eq!(state.dialog, None);
        assert!(state.amount.value.is_empty());
    }

    #[test]
    fn renders_summary_and_profit_loss() {
        let mut state = PortfolioState::new(1);
        state.loading = false;
        state.portfolio = Some(Portfolio {
            id: 1,
            cash_balance: 1000.0,
            stocks: vec![Holding {
                id: 1,
                symbol: String::from("AAPL"),
                name: String::from("Apple Inc."),
                quantity: 5,
                purchase_price: 100.0,
                current_price: 120.0,
            }],
        });

        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                frame.render_stateful_widget(PortfolioWidget { tick: 0 }, frame.size(), &mut state)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect()
            })
            .collect();

        // 1000 cash + 5 * 120
        assert!(rows.iter().any(|row| row.contains("Total Portfolio Value: $1,600.00")));
        // (120 - 100) * 5 at +20%
        assert!(rows.iter().any(|row| row.contains("$100.00 (20.00%)")));
    }
}
