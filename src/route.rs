/// Navigable locations, mirroring the web client's route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Portfolio(i64),
    Transactions(i64),
}

impl Route {
    /// Guarded routes render only with a session identity present.
    pub fn is_guarded(self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Portfolio(_) | Route::Transactions(_)
        )
    }

    /// Applies the guard: anonymous sessions are redirected to the login
    /// view before any guarded content is rendered.
    pub fn guard(self, authenticated: bool) -> Route {
        if self.is_guarded() && !authenticated {
            Route::Login
        } else {
            self
        }
    }

    /// Resolves a path; unknown paths land on `/`.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Landing,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["portfolio", id] => match id.parse() {
                Ok(id) => Route::Portfolio(id),
                Err(_) => Route::Landing,
            },
            ["portfolio", id, "transactions"] => match id.parse() {
                Ok(id) => Route::Transactions(id),
                Err(_) => Route::Landing,
            },
            _ => Route::Landing,
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Landing => String::from("/"),
            Route::Login => String::from("/login"),
            Route::Register => String::from("/register"),
            Route::Dashboard => String::from("/dashboard"),
            Route::Portfolio(id) => format!("/portfolio/{}", id),
            Route::Transactions(id) => format!("/portfolio/{}/transactions", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/register"), Route::Register);
        assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
        assert_eq!(Route::parse("/portfolio/3"), Route::Portfolio(3));
        assert_eq!(Route::parse("/portfolio/3/transactions"), Route::Transactions(3));
    }

    #[test]
    fn unknown_paths_fall_back_to_landing() {
        assert_eq!(Route::parse("/nope"), Route::Landing);
        assert_eq!(Route::parse("/portfolio"), Route::Landing);
        assert_eq!(Route::parse("/portfolio/abc"), Route::Landing);
        assert_eq!(Route::parse("/portfolio/1/other"), Route::Landing);
    }

    #[test]
    fn path_round_trips() {
        for route in [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::Dashboard,
            Route::Portfolio(7),
            Route::Transactions(7),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn guard_redirects_anonymous_sessions() {
        assert_eq!(Route::Dashboard.guard(false), Route::Login);
        assert_eq!(Route::Portfolio(1).guard(false), Route::Login);
        assert_eq!(Route::Transactions(1).guard(false), Route::Login);

        assert_eq!(Route::Dashboard.guard(true), Route::Dashboard);
        assert_eq!(Route::Portfolio(1).guard(true), Route::Portfolio(1));

        // Public routes render either way
        assert_eq!(Route::Landing.guard(false), Route::Landing);
        assert_eq!(Route::Login.guard(false), Route::Login);
    }
}
