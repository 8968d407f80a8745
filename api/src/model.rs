use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub cash_balance: f64,
    #[serde(default)]
    pub stocks: Vec<Holding>,
}

impl Portfolio {
    /// Market value of the held stocks, excluding cash.
    pub fn stock_value(&self) -> f64 {
        self.stocks.iter().map(Holding::total_value).sum()
    }

    pub fn total_value(&self) -> f64 {
        self.cash_balance + self.stock_value()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub purchase_price: f64,
    pub current_price: f64,
}

impl Holding {
    pub fn total_value(&self) -> f64 {
        self.current_price * f64::from(self.quantity)
    }

    pub fn profit_loss(&self) -> f64 {
        (self.current_price - self.purchase_price) * f64::from(self.quantity)
    }

    pub fn profit_loss_percent(&self) -> f64 {
        (self.current_price - self.purchase_price) / self.purchase_price * 100.0
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    pub status: String,
    pub receiver_id: i64,
}

impl Transaction {
    /// A transaction is incoming to a portfolio when that portfolio is the
    /// receiver; everything else is outgoing.
    pub fn is_incoming(&self, portfolio_id: i64) -> bool {
        self.receiver_id == portfolio_id
    }
}

/// User record as returned by the user service. Login responds with the
/// same shape; `token` is present only when the service issues one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefresh {
    pub updated_stocks: u32,
}
