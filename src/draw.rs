use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Clear, Paragraph};
use ratatui::{Frame, Terminal};

use crate::app::App;
use crate::route::Route;
use crate::theme::style;
use crate::widget::{
    DashboardWidget, LandingWidget, LoginWidget, NoticeWidget, PortfolioWidget, RegisterWidget,
    TransactionsWidget, HELP_HEIGHT, HELP_WIDTH,
};
use crate::THEME;

pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) {
    terminal
        .draw(|frame| {
            // chunks[0] - Header
            // chunks[1] - Current view
            let chunks = Layout::default()
                .constraints([Constraint::Length(1), Constraint::Min(0)].as_ref())
                .split(frame.size());

            draw_header(frame, app, chunks[0]);

            match app.route {
                Route::Landing => frame.render_widget(LandingWidget {}, chunks[1]),
                Route::Login => {
                    frame.render_stateful_widget(LoginWidget {}, chunks[1], &mut app.login)
                }
                Route::Register => {
                    frame.render_stateful_widget(RegisterWidget {}, chunks[1], &mut app.register)
                }
                Route::Dashboard => frame.render_stateful_widget(
                    DashboardWidget {
                        tick: app.loading_tick,
                    },
                    chunks[1],
                    &mut app.dashboard,
                ),
                Route::Portfolio(_) => frame.render_stateful_widget(
                    PortfolioWidget {
                        tick: app.loading_tick,
                    },
                    chunks[1],
                    &mut app.portfolio,
                ),
                Route::Transactions(_) => frame.render_stateful_widget(
                    TransactionsWidget {
                        tick: app.loading_tick,
                    },
                    chunks[1],
                    &mut app.transactions,
                ),
            }

            if let Some(notice) = app.notice.as_ref() {
                let area = frame.size();
                let rect = Rect {
                    x: area.x,
                    y: area.bottom().saturating_sub(3),
                    width: area.width,
                    height: 3.min(area.height),
                };

                frame.render_widget(Clear, rect);
                frame.render_widget(NoticeWidget(notice), rect);
            }

            if app.show_help {
                let area = frame.size();

                if area.width >= HELP_WIDTH && area.height >= HELP_HEIGHT {
                    let rect = app.help.get_rect(area);

                    frame.render_widget(Clear, rect);
                    frame.render_widget(app.help, rect);
                } else {
                    frame.render_widget(
                        Paragraph::new("Increase screen size to display help"),
                        area,
                    );
                }
            }
        })
        .unwrap();
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    // header[0] - Title and current path
    // header[1] - (Optional) help hint
    let header = if app.hide_help {
        vec![area]
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(10)].as_ref())
            .split(area)
            .to_vec()
    };

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" Finance Portfolio · {}", app.route.path()),
            style().fg(THEME.text_secondary()),
        )),
        header[0],
    );

    if !app.hide_help {
        frame.render_widget(
            Paragraph::new(Span::styled("Help '?'", style().fg(THEME.gray())))
                .alignment(Alignment::Center),
            header[1],
        );
    }
}

pub fn add_padding(mut rect: Rect, n: u16, direction: PaddingDirection) -> Rect {
    match direction {
        PaddingDirection::Top => {
            rect.y += n;
            rect.height -= n;
            rect
        }
        PaddingDirection::Bottom => {
            rect.height -= n;
            rect
        }
        PaddingDirection::Left => {
            rect.x += n;
            rect.width -= n;
            rect
        }
        PaddingDirection::Right => {
            rect.width -= n;
            rect
        }
    }
}

#[allow(dead_code)]
pub enum PaddingDirection {
    Top,
    Bottom,
    Left,
    Right,
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
