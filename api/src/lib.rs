mod error;
mod http;
pub mod model;
pub mod portfolio;
pub mod transaction;
pub mod user;

pub use error::{Error, Result};
pub use http::{Http, NoToken, TokenSource};

/// Default base addresses of the three backend services.
pub const PORTFOLIO_BASE: &str = "http://localhost:8080/v1/portfolios";
pub const USER_BASE: &str = "http://localhost:8081/v1/users";
pub const TRANSACTION_BASE: &str = "http://localhost:8082/v1/transactions";
