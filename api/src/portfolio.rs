use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Portfolio, PriceRefresh};
use crate::{Http, Result};

#[derive(Serialize)]
struct Amount {
    amount: f64,
}

/// Requests against the portfolio service.
#[derive(Clone)]
pub struct PortfolioService {
    http: Http,
}

impl PortfolioService {
    pub fn new(http: Http) -> PortfolioService {
        PortfolioService { http }
    }

    pub async fn create(&self, user_id: i64) -> Result<Portfolio> {
        let mut query = HashMap::new();
        query.insert("userId", user_id.to_string());

        self.http.post("/create", Some(query)).await
    }

    pub async fn by_user(&self, user_id: i64) -> Result<Vec<Portfolio>> {
        self.http.get(&format!("/user/{}", user_id)).await
    }

    pub async fn deposit(&self, portfolio_id: i64, amount: f64) -> Result<()> {
        self.http
            .post_json_ok(&format!("/{}/deposit", portfolio_id), &Amount { amount })
            .await
    }

    pub async fn withdraw(&self, portfolio_id: i64, amount: f64) -> Result<()> {
        self.http
            .post_json_ok(&format!("/{}/withdraw", portfolio_id), &Amount { amount })
            .await
    }

    /// The stock endpoint takes its inputs as query parameters, not a body.
    pub async fn add_stock(
        &self,
        portfolio_id: i64,
        ticker: &str,
        quantity: u32,
        purchase_price: f64,
    ) -> Result<()> {
        let mut query = HashMap::new();
        query.insert("ticker", ticker.to_string());
        query.insert("quantity", quantity.to_string());
        query.insert("purchasePrice", purchase_price.to_string());

        self.http
            .post_ok(&format!("/{}/stocks", portfolio_id), Some(query))
            .await
    }

    pub async fn update_prices(&self) -> Result<PriceRefresh> {
        self.http.put("/stocks/update-prices").await
    }
}
