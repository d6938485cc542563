use crate::api;
use crate::model::{Api, Snapshot};
use std::time::Duration;
use tokio::sync::watch;

/// Default wait between fetch cycles (10 minutes).
pub const DEFAULT_INTERVAL_SECS: u64 = 600;

/// Latest published state of one account's fetch loop.
///
/// `snapshot` stays `None` until the first successful cycle. `fresh` is true
/// only while the snapshot reflects the most recent cycle; a failed cycle
/// keeps the snapshot and clears the flag, so readers can tell "no data yet"
/// from "stale data" without null-checking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotState {
    pub snapshot: Option<Snapshot>,
    pub fresh: bool,
}

/// Periodic login-and-fetch worker for a single account. Accounts do not
/// share fetchers; every registered account gets its own.
#[derive(Debug)]
pub struct Fetcher {
    api: Api,
    slot: watch::Sender<SlotState>,
}

impl Fetcher {
    pub fn new(api: Api) -> Fetcher {
        let (slot, _) = watch::channel(SlotState::default());
        Fetcher { api, slot }
    }

    /// Subscribe to the states published by `run_cycle`.
    pub fn subscribe(&self) -> watch::Receiver<SlotState> {
        self.slot.subscribe()
    }

    /// Latest published state: the prior snapshot, or the empty state before
    /// the first successful cycle.
    pub fn latest(&self) -> SlotState {
        self.slot.borrow().clone()
    }

    async fn fetch(&self) -> Result<Snapshot, api::Error> {
        let logged_in_api = api::login(&self.api).await?;
        let balance = api::balance(&logged_in_api).await?;
        Ok(Snapshot::from(balance))
    }

    /// Run one login-and-fetch cycle. A successful cycle replaces the slot
    /// wholesale; a failed cycle is logged and leaves the previous snapshot
    /// untouched, so readers keep the last known good values.
    pub async fn run_cycle(&self) -> SlotState {
        match self.fetch().await {
            Ok(snapshot) => {
                self.slot.send_replace(SlotState {
                    snapshot: Some(snapshot),
                    fresh: true,
                });
            }
            Err(e) => {
                log::error!("fetch cycle failed for {}: {:?}", self.api.username, e);
                self.slot.send_modify(|state| state.fresh = false);
            }
        }
        self.latest()
    }

    /// Poll forever. The wait starts after the cycle ends, so cycles never
    /// overlap regardless of how long a fetch takes.
    pub async fn run(self, interval: Duration) {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{UNKNOWN_DEVICE, UNKNOWN_ROOM};
    use mockito::{Matcher, Server, ServerGuard};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn test_fetcher(endpoint: String) -> Fetcher {
        Fetcher::new(api::api(
            endpoint,
            String::from("student"),
            String::from("secret"),
        ))
    }

    async fn mock_login_ok(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/login/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("set-cookie", "session=abc123; Path=/")
            .with_body(r#"{"code": 200}"#)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn successful_cycle_publishes_snapshot() {
        let mut server = Server::new_async().await;
        let _login = mock_login_ok(&mut server).await;
        let _balance = server
            .mock("GET", "/electric/balance/")
            .match_query(Matcher::UrlEncoded("detail".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"code": 200, "data": {"remain": 42.5, "balance": 10.0}}"#)
            .create_async()
            .await;

        let fetcher = test_fetcher(server.url());
        let state = fetcher.run_cycle().await;

        assert!(state.fresh);
        let snapshot = state.snapshot.unwrap();
        assert_eq!(Some(42.5), snapshot.remaining_power);
        assert_eq!(Some(10.0), snapshot.balance);
        assert_eq!(UNKNOWN_DEVICE, snapshot.device_name);
        assert_eq!(UNKNOWN_ROOM, snapshot.room_name);
    }

    #[tokio::test]
    async fn first_failed_cycle_yields_empty_state() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("GET", "/login/")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let fetcher = test_fetcher(server.url());
        let state = fetcher.run_cycle().await;

        assert_eq!(SlotState::default(), state);
    }

    #[tokio::test]
    async fn failed_balance_step_keeps_previous_snapshot() {
        let mut server = Server::new_async().await;
        let _login = mock_login_ok(&mut server).await;

        /* First cycle succeeds, every later one fails with a payload error. */
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _balance = server
            .mock("GET", "/electric/balance/")
            .match_query(Matcher::UrlEncoded("detail".into(), "1".into()))
            .with_status(200)
            .with_body_from_request(move |_request| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    r#"{"code": 200, "data": {"remain": 42.5, "balance": 10.0}}"#.as_bytes().to_vec()
                } else {
                    r#"{"code": 500, "msg": "系统繁忙"}"#.as_bytes().to_vec()
                }
            })
            .expect(2)
            .create_async()
            .await;

        let fetcher = test_fetcher(server.url());
        let good = fetcher.run_cycle().await;
        assert!(good.fresh);

        let degraded = fetcher.run_cycle().await;
        assert!(!degraded.fresh);
        assert_eq!(good.snapshot, degraded.snapshot);
        assert_eq!(2, calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failed_login_step_keeps_previous_snapshot() {
        let mut server = Server::new_async().await;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _login = server
            .mock("GET", "/login/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("set-cookie", "session=abc123; Path=/")
            .with_body_from_request(move |_request| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    r#"{"code": 200}"#.as_bytes().to_vec()
                } else {
                    r#"{"code": 500, "msg": "用户名或密码错误"}"#.as_bytes().to_vec()
                }
            })
            .create_async()
            .await;
        let _balance = server
            .mock("GET", "/electric/balance/")
            .match_query(Matcher::UrlEncoded("detail".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"code": 200, "data": {"remain": 42.5}}"#)
            .expect(1)
            .create_async()
            .await;

        let fetcher = test_fetcher(server.url());
        let good = fetcher.run_cycle().await;
        assert!(good.fresh);

        let degraded = fetcher.run_cycle().await;
        assert!(!degraded.fresh);
        assert_eq!(good.snapshot, degraded.snapshot);
    }

    #[tokio::test]
    async fn subscribers_see_published_states() {
        let mut server = Server::new_async().await;
        let _login = mock_login_ok(&mut server).await;
        let _balance = server
            .mock("GET", "/electric/balance/")
            .match_query(Matcher::UrlEncoded("detail".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"code": 200, "data": {"remain": 42.5}}"#)
            .create_async()
            .await;

        let fetcher = test_fetcher(server.url());
        let mut updates = fetcher.subscribe();

        fetcher.run_cycle().await;
        assert!(updates.changed().await.is_ok());
        let state = updates.borrow_and_update().clone();
        assert!(state.fresh);
        assert_eq!(
            Some(42.5),
            state.snapshot.as_ref().and_then(|s| s.remaining_power)
        );
    }
}
