use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_std::task;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::future::BoxFuture;

use api::model::{Portfolio, Profile, Transaction};
use api::portfolio::PortfolioService;
use api::transaction::TransactionService;
use api::user::UserService;
use api::{Http, TokenSource};

/// How long a cached fetch result stays fresh. Mutations invalidate the
/// affected keys immediately; this only bounds reuse between view mounts.
const CACHE_TTL: Duration = Duration::from_secs(30);

/// Identifies one logical request. An identical request is never started
/// while the first is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Login,
    Register,
    Profile(i64),
    Portfolios(i64),
    CreatePortfolio,
    Deposit(i64),
    Withdraw(i64),
    AddStock(i64),
    UpdatePrices,
    Transactions(i64),
}

/// Parsed response data handed back to the views.
#[derive(Debug, Clone)]
pub enum Data {
    LoggedIn(Profile),
    Registered,
    Profile(Profile),
    Portfolios(Vec<Portfolio>),
    PortfolioCreated(Portfolio),
    Deposited { amount: f64 },
    Withdrew { amount: f64 },
    StockAdded { symbol: String, quantity: u32 },
    PricesUpdated { count: u32 },
    Transactions(Vec<Transaction>),
}

pub struct Outcome {
    pub key: Key,
    pub generation: u64,
    pub result: Result<Data, api::Error>,
}

/// The three backend services plus the bookkeeping every view shares:
/// in-flight dedup, a response channel into the event loop, a result cache
/// and a generation stamp so responses that arrive after a navigation are
/// discarded instead of mutating the new view.
pub struct Requests {
    pub portfolios: PortfolioService,
    pub users: UserService,
    pub transactions: TransactionService,

    sender: Sender<Outcome>,
    outcomes: Receiver<Outcome>,
    wakeup: Sender<()>,

    generation: u64,
    pending: HashSet<Key>,
    cache: HashMap<Key, (Instant, Data)>,
}

impl Requests {
    pub fn new(
        portfolio_base: String,
        user_base: String,
        transaction_base: String,
        tokens: Arc<dyn TokenSource>,
        wakeup: Sender<()>,
    ) -> Requests {
        let (sender, outcomes) = unbounded();

        Requests {
            portfolios: PortfolioService::new(Http::new(portfolio_base, tokens.clone())),
            users: UserService::new(Http::new(user_base, tokens.clone())),
            transactions: TransactionService::new(Http::new(transaction_base, tokens)),
            sender,
            outcomes,
            wakeup,
            generation: 0,
            pending: HashSet::new(),
            cache: HashMap::new(),
        }
    }

    /// Runs the request in the background, waking the event loop when its
    /// outcome is ready. Returns false if an identical request is already
    /// in flight.
    pub fn spawn(&mut self, key: Key, fut: BoxFuture<'static, Result<Data, api::Error>>) -> bool {
        if self.pending.contains(&key) {
            log::debug!("request {:?} already pending, skipped", key);
            return false;
        }

        self.pending.insert(key);

        let sender = self.sender.clone();
        let wakeup = self.wakeup.clone();
        let generation = self.generation;

        task::spawn(async move {
            let result = fut.await;

            let _ = sender.send(Outcome {
                key,
                generation,
                result,
            });
            let _ = wakeup.try_send(());
        });

        true
    }

    /// Collects finished requests, dropping outcomes that belong to a view
    /// the user already navigated away from.
    pub fn drain(&mut self) -> Vec<Outcome> {
        let mut finished = vec![];

        for outcome in self.outcomes.try_iter() {
            self.pending.remove(&outcome.key);

            if outcome.generation != self.generation {
                log::debug!("request {:?} outlived its view, discarded", outcome.key);
                continue;
            }

            if let Ok(data) = &outcome.result {
                if Self::cachable(outcome.key) {
                    self.cache.insert(outcome.key, (Instant::now(), data.clone()));
                }
            }

            finished.push(outcome);
        }

        finished
    }

    fn cachable(key: Key) -> bool {
        matches!(key, Key::Profile(_) | Key::Portfolios(_) | Key::Transactions(_))
    }

    pub fn cached(&self, key: Key) -> Option<Data> {
        self.cache.get(&key).and_then(|(at, data)| {
            if at.elapsed() < CACHE_TTL {
                Some(data.clone())
            } else {
                None
            }
        })
    }

    pub fn invalidate(&mut self, key: Key) {
        self.cache.remove(&key);
    }

    pub fn is_pending(&self, key: Key) -> bool {
        self.pending.contains(&key)
    }

    /// Called on navigation. Outstanding responses for the previous view
    /// are discarded when they eventually arrive.
    pub fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossbeam_channel::bounded;

    use api::NoToken;

    use super::*;

    fn requests() -> (Requests, Receiver<()>) {
        let (wakeup_tx, wakeup_rx) = bounded(1);

        let requests = Requests::new(
            String::from("http://localhost:1"),
            String::from("http://localhost:1"),
            String::from("http://localhost:1"),
            Arc::new(NoToken),
            wakeup_tx,
        );

        (requests, wakeup_rx)
    }

    #[test]
    fn identical_requests_do_not_stack() {
        let (mut requests, _wakeup) = requests();

        let spawned = requests.spawn(
            Key::UpdatePrices,
            Box::pin(async {
                async_std::task::sleep(Duration::from_secs(5)).await;
                Ok(Data::PricesUpdated { count: 0 })
            }),
        );
        assert!(spawned);
        assert!(requests.is_pending(Key::UpdatePrices));

        let second = requests.spawn(
            Key::UpdatePrices,
            Box::pin(async { Ok(Data::PricesUpdated { count: 0 }) }),
        );
        assert!(!second);
    }

    #[test]
    fn outcomes_arrive_through_the_channel() {
        let (mut requests, wakeup) = requests();

        requests.spawn(
            Key::UpdatePrices,
            Box::pin(async { Ok(Data::PricesUpdated { count: 3 }) }),
        );

        wakeup.recv_timeout(Duration::from_secs(5)).unwrap();

        let outcomes = requests.drain();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].key, Key::UpdatePrices);
        assert!(!requests.is_pending(Key::UpdatePrices));
    }

    #[test]
    fn stale_outcomes_are_discarded_after_navigation() {
        let (mut requests, wakeup) = requests();

        requests.spawn(
            Key::Transactions(1),
            Box::pin(async { Ok(Data::Transactions(vec![])) }),
        );

        requests.bump_generation();

        wakeup.recv_timeout(Duration::from_secs(5)).unwrap();

        assert!(requests.drain().is_empty());
    }

    #[test]
    fn successful_fetches_are_cached_and_invalidatable() {
        let (mut requests, wakeup) = requests();

        requests.spawn(
            Key::Portfolios(42),
            Box::pin(async { Ok(Data::Portfolios(vec![])) }),
        );

        wakeup.recv_timeout(Duration::from_secs(5)).unwrap();
        requests.drain();

        assert!(requests.cached(Key::Portfolios(42)).is_some());

        requests.invalidate(Key::Portfolios(42));
        assert!(requests.cached(Key::Portfolios(42)).is_none());
    }
}
