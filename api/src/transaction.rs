use crate::model::Transaction;
use crate::{Http, Result};

/// Requests against the transaction service.
#[derive(Clone)]
pub struct TransactionService {
    http: Http,
}

impl TransactionService {
    pub fn new(http: Http) -> TransactionService {
        TransactionService { http }
    }

    pub async fn for_portfolio(&self, portfolio_id: i64) -> Result<Vec<Transaction>> {
        self.http
            .get(&format!("/portfolio/{}/transactions", portfolio_id))
            .await
    }
}
