use std::sync::Arc;

use crossbeam_channel::Sender;

use api::model::Portfolio;
use api::TokenSource;

use crate::common::NUM_LOADING_TICKS;
use crate::opts::Opts;
use crate::request::{Data, Key, Outcome, Requests};
use crate::route::Route;
use crate::session::{Identity, SessionStore};
use crate::widget::{
    DashboardState, Dialog, HelpWidget, LoginState, Notice, PortfolioState, RegisterState,
    TransactionsState,
};

pub struct App {
    pub route: Route,
    pub session: Arc<SessionStore>,
    pub requests: Requests,

    pub login: LoginState,
    pub register: RegisterState,
    pub dashboard: DashboardState,
    pub portfolio: PortfolioState,
    pub transactions: TransactionsState,
    pub notice: Option<Notice>,

    pub help: HelpWidget,
    pub show_help: bool,
    pub hide_help: bool,
    pub loading_tick: usize,
}

impl App {
    pub fn new(opts: &Opts, session: Arc<SessionStore>, wakeup: Sender<()>) -> App {
        let tokens: Arc<dyn TokenSource> = session.clone();

        let requests = Requests::new(
            opts.portfolio_url
                .clone()
                .unwrap_or_else(|| api::PORTFOLIO_BASE.to_string()),
            opts.user_url
                .clone()
                .unwrap_or_else(|| api::USER_BASE.to_string()),
            opts.transaction_url
                .clone()
                .unwrap_or_else(|| api::TRANSACTION_BASE.to_string()),
            tokens,
            wakeup,
        );

        App {
            route: Route::Landing,
            session,
            requests,
            login: LoginState::new(),
            register: RegisterState::new(),
            dashboard: DashboardState::new(),
            portfolio: PortfolioState::new(0),
            transactions: TransactionsState::new(0),
            notice: None,
            help: HelpWidget {},
            show_help: false,
            hide_help: opts.hide_help,
            loading_tick: 0,
        }
    }

    fn identity(&self) -> Option<Identity> {
        self.session.read()
    }

    /// Switches views, redirecting guarded routes to the login view when
    /// no session identity is present. Outstanding requests of the old
    /// view are left to finish and their results discarded.
    pub fn navigate(&mut self, route: Route) {
        let route = route.guard(self.identity().is_some());

        log::debug!("navigating to {}", route.path());

        self.requests.bump_generation();
        self.route = route;
        self.mount();
    }

    /// Fetch-on-mount, seeded from cache when a fresh result exists.
    fn mount(&mut self) {
        match self.route {
            Route::Landing => {}
            Route::Login => self.login = LoginState::new(),
            Route::Register => self.register = RegisterState::new(),
            Route::Dashboard => {
                self.dashboard = DashboardState::new();
                self.fetch_profile();
                self.fetch_portfolios(false);
            }
            Route::Portfolio(id) => {
                self.portfolio = PortfolioState::new(id);
                self.fetch_portfolios(false);
            }
            Route::Transactions(id) => {
                self.transactions = TransactionsState::new(id);
                self.fetch_transactions(id, false);
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.loading_tick = (self.loading_tick + 1) % NUM_LOADING_TICKS;

        if self.notice.as_ref().map_or(false, Notice::expired) {
            self.notice = None;
        }
    }

    pub fn logout(&mut self) {
        self.session.clear();
        self.navigate(Route::Login);
    }

    // Fetches

    fn fetch_profile(&mut self) {
        let identity = match self.identity() {
            Some(identity) => identity,
            None => return,
        };

        let key = Key::Profile(identity.user_id);

        if let Some(Data::Profile(profile)) = self.requests.cached(key) {
            self.dashboard.username =
                Some(profile.first_name.unwrap_or_else(|| String::from("Unknown User")));
            return;
        }

        let users = self.requests.users.clone();
        self.requests.spawn(
            key,
            Box::pin(async move { users.get(identity.user_id).await.map(Data::Profile) }),
        );
    }

    pub fn fetch_portfolios(&mut self, force: bool) {
        let identity = match self.identity() {
            Some(identity) => identity,
            None => return,
        };

        let key = Key::Portfolios(identity.user_id);

        if force {
            self.requests.invalidate(key);
        } else if let Some(Data::Portfolios(portfolios)) = self.requests.cached(key) {
            self.apply_portfolios(portfolios);
            return;
        }

        match self.route {
            Route::Dashboard => self.dashboard.loading = true,
            Route::Portfolio(_) => self.portfolio.loading = self.portfolio.portfolio.is_none(),
            _ => {}
        }

        let portfolios = self.requests.portfolios.clone();
        self.requests.spawn(
            key,
            Box::pin(async move { portfolios.by_user(identity.user_id).await.map(Data::Portfolios) }),
        );
    }

    pub fn fetch_transactions(&mut self, portfolio_id: i64, force: bool) {
        let key = Key::Transactions(portfolio_id);

        if force {
            self.requests.invalidate(key);
        } else if let Some(Data::Transactions(items)) = self.requests.cached(key) {
            self.transactions.items = items;
            self.transactions.loading = false;
            return;
        }

        self.transactions.loading = true;

        let transactions = self.requests.transactions.clone();
        self.requests.spawn(
            key,
            Box::pin(async move {
                transactions
                    .for_portfolio(portfolio_id)
                    .await
                    .map(Data::Transactions)
            }),
        );
    }

    // Actions

    pub fn submit_login(&mut self) {
        let username = self.login.username().trim().to_string();
        let password = self.login.password().to_string();

        if username.is_empty() || password.is_empty() {
            self.login.error = Some(String::from("Username and password are required"));
            return;
        }

        self.login.error = None;
        self.login.submitting = true;

        let users = self.requests.users.clone();
        self.requests.spawn(
            Key::Login,
            Box::pin(async move { users.login(&username, &password).await.map(Data::LoggedIn) }),
        );
    }

    pub fn submit_register(&mut self) {
        let registration = match self.register.registration() {
            Some(registration) => registration,
            None => {
                self.register.error = Some(String::from("All fields are required"));
                return;
            }
        };

        self.register.error = None;
        self.register.submitting = true;

        let users = self.requests.users.clone();
        self.requests.spawn(
            Key::Register,
            Box::pin(async move { users.register(&registration).await.map(|_| Data::Registered) }),
        );
    }

    pub fn create_portfolio(&mut self) {
        let identity = match self.identity() {
            Some(identity) => identity,
            None => return,
        };

        self.dashboard.creating = true;

        let portfolios = self.requests.portfolios.clone();
        self.requests.spawn(
            Key::CreatePortfolio,
            Box::pin(async move {
                portfolios
                    .create(identity.user_id)
                    .await
                    .map(Data::PortfolioCreated)
            }),
        );
    }

    pub fn submit_dialog(&mut self) {
        match self.portfolio.dialog {
            Some(Dialog::Deposit) => self.submit_amount(Dialog::Deposit),
            Some(Dialog::Withdraw) => self.submit_amount(Dialog::Withdraw),
            Some(Dialog::AddStock) => self.submit_add_stock(),
            None => {}
        }
    }

    fn submit_amount(&mut self, dialog: Dialog) {
        let amount = match self.portfolio.amount_submission() {
            Some(amount) => amount,
            None => {
                self.notice = Some(Notice::error("Amount is required"));
                return;
            }
        };

        let id = self.portfolio.id;
        let portfolios = self.requests.portfolios.clone();

        match dialog {
            Dialog::Deposit => {
                self.requests.spawn(
                    Key::Deposit(id),
                    Box::pin(async move {
                        portfolios
                            .deposit(id, amount)
                            .await
                            .map(|_| Data::Deposited { amount })
                    }),
                );
            }
            Dialog::Withdraw => {
                self.requests.spawn(
                    Key::Withdraw(id),
                    Box::pin(async move {
                        portfolios
                            .withdraw(id, amount)
                            .await
                            .map(|_| Data::Withdrew { amount })
                    }),
                );
            }
            Dialog::AddStock => {}
        }
    }

    fn submit_add_stock(&mut self) {
        let (symbol, quantity, price) = match self.portfolio.stock_submission() {
            Some(submission) => submission,
            None => {
                self.notice = Some(Notice::error(
                    "Symbol, quantity and purchase price are required",
                ));
                return;
            }
        };

        let id = self.portfolio.id;
        let portfolios = self.requests.portfolios.clone();

        self.requests.spawn(
            Key::AddStock(id),
            Box::pin(async move {
                portfolios
                    .add_stock(id, &symbol, quantity, price)
                    .await
                    .map(|_| Data::StockAdded { symbol, quantity })
            }),
        );
    }

    pub fn update_prices(&mut self) {
        self.portfolio.updating = true;

        let portfolios = self.requests.portfolios.clone();
        self.requests.spawn(
            Key::UpdatePrices,
            Box::pin(async move {
                portfolios
                    .update_prices()
                    .await
                    .map(|refresh| Data::PricesUpdated {
                        count: refresh.updated_stocks,
                    })
            }),
        );
    }

    // Outcomes

    pub fn handle_outcomes(&mut self) {
        for outcome in self.requests.drain() {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome.result {
            Ok(data) => self.apply_data(data),
            Err(err) => self.apply_error(outcome.key, err),
        }
    }

    fn apply_data(&mut self, data: Data) {
        match data {
            Data::LoggedIn(profile) => {
                self.login.submitting = false;

                let identity = Identity {
                    user_id: profile.id,
                    user_name: profile
                        .first_name
                        .unwrap_or_else(|| String::from("Unknown User")),
                    token: profile.token,
                };

                if let Err(err) = self.session.create(identity) {
                    self.notice = Some(Notice::error(err.to_string()));
                    return;
                }

                self.navigate(Route::Dashboard);
            }
            Data::Registered => {
                self.register.submitting = false;
                self.navigate(Route::Login);
            }
            Data::Profile(profile) => {
                self.dashboard.username = Some(
                    profile
                        .first_name
                        .unwrap_or_else(|| String::from("Unknown User")),
                );
            }
            Data::Portfolios(portfolios) => self.apply_portfolios(portfolios),
            Data::PortfolioCreated(portfolio) => {
                self.dashboard.creating = false;
                self.dashboard.create_open = false;

                if let Some(identity) = self.identity() {
                    self.requests.invalidate(Key::Portfolios(identity.user_id));
                }

                self.navigate(Route::Portfolio(portfolio.id));
            }
            Data::Deposited { amount } => {
                self.notice = Some(Notice::success(format!("Successfully deposited ${}", amount)));
                self.portfolio.close_dialog();
                self.fetch_portfolios(true);
            }
            Data::Withdrew { amount } => {
                self.notice = Some(Notice::success(format!("Successfully withdrew ${}", amount)));
                self.portfolio.close_dialog();
                self.fetch_portfolios(true);
            }
            Data::StockAdded { symbol, quantity } => {
                self.notice = Some(Notice::success(format!(
                    "Successfully added {} shares of {}",
                    quantity, symbol
                )));
                self.portfolio.close_dialog();
                self.fetch_portfolios(true);
            }
            Data::PricesUpdated { count } => {
                self.portfolio.updating = false;
                self.notice = Some(Notice::success(format!(
                    "Updated {} stocks successfully",
                    count
                )));
                self.fetch_portfolios(true);
            }
            Data::Transactions(items) => {
                self.transactions.loading = false;
                self.transactions.items = items;
            }
        }
    }

    fn apply_portfolios(&mut self, portfolios: Vec<Portfolio>) {
        match self.route {
            Route::Dashboard => {
                self.dashboard.loading = false;
                if self.dashboard.selected >= portfolios.len() {
                    self.dashboard.selected = 0;
                }
                self.dashboard.portfolios = portfolios;
            }
            Route::Portfolio(id) => {
                self.portfolio.loading = false;

                match portfolios.into_iter().find(|p| p.id == id) {
                    Some(portfolio) => {
                        self.portfolio.portfolio = Some(portfolio);
                        self.portfolio.error = None;
                    }
                    None => {
                        self.portfolio.error =
                            Some(String::from("Failed to load portfolio details"));
                    }
                }
            }
            _ => {}
        }
    }

    fn apply_error(&mut self, key: Key, err: api::Error) {
        log::debug!("request {:?} failed: {}", key, err);

        match key {
            Key::Login => {
                self.login.submitting = false;
                self.login.error = Some(String::from("Invalid username or password"));
            }
            Key::Register => {
                self.register.submitting = false;
                self.register.error = Some(String::from("Registration failed. Please try again."));
            }
            // Missing profile data degrades to a placeholder name rather
            // than blocking the dashboard.
            Key::Profile(_) => {
                self.dashboard.username = Some(String::from("Unknown User"));
            }
            Key::Portfolios(_) => match self.route {
                Route::Dashboard => {
                    self.dashboard.loading = false;
                    self.notice = Some(Notice::error(err.to_string()));
                }
                Route::Portfolio(_) => {
                    self.portfolio.loading = false;
                    self.portfolio.error = Some(String::from("Failed to load portfolio details"));
                }
                _ => {}
            },
            Key::CreatePortfolio => {
                self.dashboard.creating = false;
                self.notice = Some(Notice::error(err.to_string()));
            }
            // The dialog stays open so the inputs can be corrected.
            Key::Deposit(_) | Key::Withdraw(_) | Key::AddStock(_) => {
                self.notice = Some(Notice::error(err.to_string()));
            }
            Key::UpdatePrices => {
                self.portfolio.updating = false;
                self.notice = Some(Notice::error("Failed to update stock prices"));
            }
            Key::Transactions(_) => {
                self.transactions.loading = false;
                self.notice = Some(Notice::error("Failed to fetch transactions"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use api::model::Profile;
    use api::Error;

    use crate::widget::Severity;

    use super::*;

    fn test_app(name: &str) -> App {
        let path = std::env::temp_dir().join(format!(
            "folio-app-{}-{}.json",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);

        let (wakeup, _) = bounded(1);

        App::new(&Opts::default(), Arc::new(SessionStore::at(path)), wakeup)
    }

    fn profile(id: i64, first_name: Option<&str>) -> Profile {
        Profile {
            id,
            first_name: first_name.map(String::from),
            last_name: None,
            email: None,
            username: None,
            token: None,
        }
    }

    fn logged_in(name: &str) -> App {
        let app = test_app(name);
        app.session
            .create(Identity {
                user_id: 42,
                user_name: String::from("John"),
                token: None,
            })
            .unwrap();
        app
    }

    #[test]
    fn guarded_routes_redirect_to_login_without_a_session() {
        let mut app = test_app("guard");

        app.navigate(Route::Dashboard);
        assert_eq!(app.route, Route::Login);

        app.navigate(Route::Portfolio(1));
        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn guarded_routes_render_with_a_session() {
        let mut app = logged_in("guard-ok");

        app.navigate(Route::Dashboard);
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn login_success_creates_session_and_navigates_to_dashboard() {
        let mut app = test_app("login");
        app.navigate(Route::Login);

        app.apply(Outcome {
            key: Key::Login,
            generation: 0,
            result: Ok(Data::LoggedIn(profile(42, Some("John")))),
        });

        let identity = app.session.read().unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.user_name, "John");
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn login_without_a_name_falls_back_to_placeholder() {
        let mut app = test_app("login-noname");

        app.apply(Outcome {
            key: Key::Login,
            generation: 0,
            result: Ok(Data::LoggedIn(profile(7, None))),
        });

        assert_eq!(app.session.read().unwrap().user_name, "Unknown User");
    }

    #[test]
    fn login_failure_shows_error_and_stays_put() {
        let mut app = test_app("login-fail");
        app.navigate(Route::Login);

        app.apply(Outcome {
            key: Key::Login,
            generation: 0,
            result: Err(Error::Status {
                status: 401,
                message: String::from("bad credentials"),
            }),
        });

        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login.error.as_deref(), Some("Invalid username or password"));
        assert!(app.session.read().is_none());
    }

    #[test]
    fn deposit_success_notifies_and_refetches() {
        let mut app = logged_in("deposit");
        app.navigate(Route::Portfolio(1));
        app.portfolio.open_dialog(Dialog::Deposit);

        app.apply(Outcome {
            key: Key::Deposit(1),
            generation: 0,
            result: Ok(Data::Deposited { amount: 250.0 }),
        });

        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert!(notice.message.contains("$250"));

        assert_eq!(app.portfolio.dialog, None);
        assert!(app.requests.is_pending(Key::Portfolios(42)));
    }

    #[test]
    fn add_stock_rejection_keeps_the_form_open() {
        let mut app = logged_in("add-stock-fail");
        app.navigate(Route::Portfolio(1));
        app.portfolio.open_dialog(Dialog::AddStock);
        app.portfolio.stock_fields[0].value.push_str("aapl");

        app.apply(Outcome {
            key: Key::AddStock(1),
            generation: 0,
            result: Err(Error::Status {
                status: 400,
                message: String::from("Unknown ticker"),
            }),
        });

        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Unknown ticker");

        assert_eq!(app.portfolio.dialog, Some(Dialog::AddStock));
        assert_eq!(app.portfolio.stock_fields[0].value, "aapl");
    }

    #[test]
    fn portfolios_resolve_the_viewed_portfolio() {
        let mut app = logged_in("portfolio-view");
        app.navigate(Route::Portfolio(1));

        app.apply_portfolios(vec![Portfolio {
            id: 1,
            cash_balance: 1000.0,
            stocks: vec![],
        }]);

        assert!(!app.portfolio.loading);
        assert_eq!(app.portfolio.portfolio.as_ref().unwrap().id, 1);

        app.navigate(Route::Portfolio(9));
        app.apply_portfolios(vec![]);
        assert_eq!(
            app.portfolio.error.as_deref(),
            Some("Failed to load portfolio details")
        );
    }

    #[test]
    fn profile_failure_degrades_to_placeholder_name() {
        let mut app = logged_in("profile-fallback");
        app.navigate(Route::Dashboard);

        app.apply(Outcome {
            key: Key::Profile(42),
            generation: 0,
            result: Err(Error::Status {
                status: 404,
                message: String::from("no such user"),
            }),
        });

        assert_eq!(app.dashboard.username.as_deref(), Some("Unknown User"));
    }

    #[test]
    fn logout_clears_the_session() {
        let mut app = logged_in("logout");
        app.navigate(Route::Dashboard);

        app.logout();

        assert!(app.session.read().is_none());
        assert_eq!(app.route, Route::Login);
    }
}
