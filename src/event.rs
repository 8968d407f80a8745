use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::cleanup_terminal;
use crate::route::Route;
use crate::widget::Dialog;

fn quit() -> ! {
    cleanup_terminal();
    std::process::exit(0);
}

fn handle_keys_landing(keycode: KeyCode, app: &mut App) {
    match keycode {
        KeyCode::Char('l') => app.navigate(Route::Login),
        KeyCode::Char('r') => app.navigate(Route::Register),
        KeyCode::Char('q') => quit(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.notice = None,
        _ => {}
    }
}

fn handle_keys_login(keycode: KeyCode, app: &mut App) {
    match keycode {
        KeyCode::Enter => app.submit_login(),
        KeyCode::Esc => app.navigate(Route::Landing),
        KeyCode::Tab | KeyCode::Down => app.login.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.login.focus_prev(),
        KeyCode::Backspace => app.login.del_char(),
        KeyCode::Char(c) => app.login.add_char(c),
        _ => {}
    }
}

fn handle_keys_register(keycode: KeyCode, app: &mut App) {
    match keycode {
        KeyCode::Enter => app.submit_register(),
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Tab | KeyCode::Down => app.register.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.register.focus_prev(),
        KeyCode::Backspace => app.register.del_char(),
        KeyCode::Char(c) => app.register.add_char(c),
        _ => {}
    }
}

fn handle_keys_dashboard(keycode: KeyCode, app: &mut App) {
    if app.dashboard.create_open {
        match keycode {
            KeyCode::Enter => {
                if !app.dashboard.creating {
                    app.create_portfolio();
                }
            }
            KeyCode::Esc => app.dashboard.create_open = false,
            _ => {}
        }
        return;
    }

    match keycode {
        KeyCode::Up | KeyCode::Char('k') => app.dashboard.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.dashboard.select_next(),
        KeyCode::Enter => {
            if let Some(id) = app.dashboard.selected_id() {
                app.navigate(Route::Portfolio(id));
            }
        }
        KeyCode::Char('c') => app.dashboard.create_open = true,
        KeyCode::Char('g') => app.fetch_portfolios(true),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('q') => quit(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.notice = None,
        _ => {}
    }
}

fn handle_keys_portfolio_dialog(keycode: KeyCode, dialog: Dialog, app: &mut App) {
    match keycode {
        KeyCode::Enter => app.submit_dialog(),
        KeyCode::Esc => app.portfolio.close_dialog(),
        KeyCode::Tab | KeyCode::Down => {
            if dialog == Dialog::AddStock {
                app.portfolio.stock_focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if dialog == Dialog::AddStock {
                app.portfolio.stock_focus_prev();
            }
        }
        KeyCode::Backspace => match dialog {
            Dialog::AddStock => {
                let focus = app.portfolio.stock_focus;
                app.portfolio.stock_fields[focus].value.pop();
            }
            _ => {
                app.portfolio.amount.value.pop();
            }
        },
        KeyCode::Char(c) => match dialog {
            // The symbol field takes anything; the numeric fields only
            // digits and a decimal point.
            Dialog::AddStock => {
                let focus = app.portfolio.stock_focus;
                if focus == 0 || c.is_numeric() || c == '.' {
                    app.portfolio.stock_fields[focus].value.push(c);
                }
            }
            _ => {
                if c.is_numeric() || c == '.' {
                    app.portfolio.amount.value.push(c);
                }
            }
        },
        _ => {}
    }
}

fn handle_keys_portfolio(keycode: KeyCode, id: i64, app: &mut App) {
    if let Some(dialog) = app.portfolio.dialog {
        handle_keys_portfolio_dialog(keycode, dialog, app);
        return;
    }

    match keycode {
        KeyCode::Char('d') => app.portfolio.open_dialog(Dialog::Deposit),
        KeyCode::Char('w') => app.portfolio.open_dialog(Dialog::Withdraw),
        KeyCode::Char('a') => app.portfolio.open_dialog(Dialog::AddStock),
        KeyCode::Char('u') => app.update_prices(),
        KeyCode::Char('t') => app.navigate(Route::Transactions(id)),
        KeyCode::Char('g') => app.fetch_portfolios(true),
        KeyCode::Char('q') => quit(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => {
            if app.notice.is_some() {
                app.notice = None;
            } else {
                app.navigate(Route::Dashboard);
            }
        }
        _ => {}
    }
}

fn handle_keys_transactions(keycode: KeyCode, id: i64, app: &mut App) {
    match keycode {
        KeyCode::Char('g') => app.fetch_transactions(id, true),
        KeyCode::Char('q') => quit(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => {
            if app.notice.is_some() {
                app.notice = None;
            } else {
                app.navigate(Route::Portfolio(id));
            }
        }
        _ => {}
    }
}

pub fn handle_key_bindings(key_event: KeyEvent, app: &mut App) {
    if key_event.kind == KeyEventKind::Release {
        return;
    }

    let KeyEvent {
        code, modifiers, ..
    } = key_event;

    if modifiers == KeyModifiers::CONTROL {
        if let KeyCode::Char('c') = code {
            quit();
        }
        return;
    }

    if !modifiers.is_empty() && modifiers != KeyModifiers::SHIFT {
        return;
    }

    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match app.route {
        Route::Landing => handle_keys_landing(code, app),
        Route::Login => handle_keys_login(code, app),
        Route::Register => handle_keys_register(code, app),
        Route::Dashboard => handle_keys_dashboard(code, app),
        Route::Portfolio(id) => handle_keys_portfolio(code, id, app),
        Route::Transactions(id) => handle_keys_transactions(code, id, app),
    }
}
