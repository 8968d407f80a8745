use std::io;
use std::panic;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, unbounded, Receiver};

use crossterm::cursor;
use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal;

use lazy_static::lazy_static;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::App;
use crate::opts::Opts;
use crate::route::Route;
use crate::session::SessionStore;
use crate::theme::Theme;

mod app;
mod common;
mod draw;
mod event;
mod opts;
mod request;
mod route;
mod session;
mod theme;
mod widget;

lazy_static! {
    // Themes only come from the config file, so the views can read this
    // without going through CLI parsing.
    pub static ref THEME: Theme = opts::get_config_opts()
        .map(|opts| opts.theme)
        .unwrap_or_default();
}

const TICK_RATE: Duration = Duration::from_millis(250);

fn main() {
    better_panic::install();
    env_logger::init();

    let opts: &Opts = &opts::resolve_opts();

    let session = match SessionStore::open() {
        Ok(session) => Arc::new(session),
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    // Background requests nudge this channel to wake the event loop.
    let (wakeup_tx, wakeup_rx) = bounded(1);

    let mut app = App::new(opts, session, wakeup_tx);

    let starting_route = opts
        .route
        .as_deref()
        .map(Route::parse)
        .unwrap_or(Route::Landing);
    app.navigate(starting_route);

    setup_panic_hook();
    setup_terminal();

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).unwrap();

    let ticker = tick(TICK_RATE);
    let ui_events = setup_ui_events();
    let ctrl_c_events = setup_ctrl_c();

    draw::draw(&mut terminal, &mut app);

    loop {
        select! {
            recv(ctrl_c_events) -> _ => {
                break;
            }
            recv(ticker) -> _ => {
                app.on_tick();
                draw::draw(&mut terminal, &mut app);
            }
            recv(wakeup_rx) -> _ => {
                app.handle_outcomes();
                draw::draw(&mut terminal, &mut app);
            }
            recv(ui_events) -> message => {
                if let Ok(Event::Key(key_event)) = message {
                    event::handle_key_bindings(key_event, &mut app);
                }

                draw::draw(&mut terminal, &mut app);
            }
        }
    }

    cleanup_terminal();
}

fn setup_terminal() {
    let mut stdout = io::stdout();

    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, cursor::Hide).unwrap();

    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();

    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();

    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();

    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();

    terminal::disable_raw_mode().unwrap();
}

fn setup_ui_events() -> Receiver<Event> {
    let (sender, receiver) = unbounded();
    std::thread::spawn(move || loop {
        sender.send(crossterm::event::read().unwrap()).unwrap();
    });

    receiver
}

fn setup_ctrl_c() -> Receiver<()> {
    let (sender, receiver) = unbounded();
    ctrlc::set_handler(move || {
        sender.send(()).unwrap();
    })
    .unwrap();

    receiver
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
