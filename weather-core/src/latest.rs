//! Latest-only lookups.
//!
//! Location updates can arrive faster than lookups complete. [`LatestLookup`]
//! numbers every request and lets only the most recent one deliver a result:
//! issuing a new request cancels the one in flight, and a result that finishes
//! after being superseded is discarded.

use tokio::sync::watch;

use crate::{Coordinate, LookupError, WeatherLookup, WeatherModel};

#[derive(Debug)]
pub struct LatestLookup<L> {
    inner: L,
    latest: watch::Sender<u64>,
}

impl<L: WeatherLookup> LatestLookup<L> {
    pub fn new(inner: L) -> Self {
        let (latest, _) = watch::channel(0);
        Self { inner, latest }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Ticket of the most recently issued request (0 before any request).
    pub fn current_ticket(&self) -> u64 {
        *self.latest.borrow()
    }

    /// Look up `coordinate`, superseding any request already in flight.
    ///
    /// Returns `None` when this request was superseded by a newer one or by
    /// [`cancel`](Self::cancel) before its result could be delivered.
    pub async fn fetch(
        &self,
        coordinate: Coordinate,
        api_key: &str,
    ) -> Option<Result<WeatherModel, LookupError>> {
        let ticket = self.issue();
        self.fetch_issued(ticket, coordinate, api_key).await
    }

    /// Take a ticket, superseding every request issued before it.
    ///
    /// Pair with [`fetch_issued`](Self::fetch_issued) when the ticket must be
    /// taken in arrival order but the lookup runs on another task.
    pub fn issue(&self) -> u64 {
        self.advance()
    }

    /// Run the lookup for a ticket from [`issue`](Self::issue).
    ///
    /// A returned result can still be superseded afterwards; compare `ticket`
    /// with [`current_ticket`](Self::current_ticket) at the point of use.
    pub async fn fetch_issued(
        &self,
        ticket: u64,
        coordinate: Coordinate,
        api_key: &str,
    ) -> Option<Result<WeatherModel, LookupError>> {
        let mut updates = self.latest.subscribe();

        tokio::select! {
            result = self.inner.fetch(coordinate, api_key) => {
                if self.current_ticket() == ticket {
                    Some(result)
                } else {
                    tracing::debug!(ticket, "discarding superseded weather result");
                    None
                }
            }
            _ = updates.wait_for(|latest| *latest != ticket) => {
                tracing::debug!(ticket, "cancelled superseded weather request");
                None
            }
        }
    }

    /// Supersede whatever is in flight without starting a new request.
    pub fn cancel(&self) {
        let ticket = self.advance();
        tracing::debug!(ticket, "cancelled in-flight weather lookups");
    }

    fn advance(&self) -> u64 {
        let mut ticket = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            ticket = *latest;
        });
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::sync::Notify;

    /// Blocks every lookup until released; echoes the latitude as temperature.
    #[derive(Debug, Default)]
    struct GatedLookup {
        gate: Notify,
        started: AtomicUsize,
    }

    #[async_trait]
    impl WeatherLookup for GatedLookup {
        async fn fetch(
            &self,
            coordinate: Coordinate,
            _api_key: &str,
        ) -> Result<WeatherModel, LookupError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(model(coordinate.latitude))
        }
    }

    #[derive(Debug)]
    struct Immediate;

    #[async_trait]
    impl WeatherLookup for Immediate {
        async fn fetch(
            &self,
            coordinate: Coordinate,
            _api_key: &str,
        ) -> Result<WeatherModel, LookupError> {
            Ok(model(coordinate.latitude))
        }
    }

    fn model(temperature_c: f64) -> WeatherModel {
        WeatherModel {
            city: "Waterloo".into(),
            description: "clear sky".into(),
            icon_code: "01d".into(),
            temperature_c,
            humidity_pct: 50,
            wind_speed_mps: 1.0,
        }
    }

    async fn wait_until_started(lookup: &LatestLookup<GatedLookup>, count: usize) {
        while lookup.inner().started.load(Ordering::SeqCst) < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn single_request_delivers_result() {
        let lookup = LatestLookup::new(Immediate);

        let result = lookup.fetch(Coordinate::new(12.0, 0.0), "KEY").await;

        let model = result.expect("not superseded").expect("lookup succeeds");
        assert_eq!(model.temperature_c, 12.0);
        assert_eq!(lookup.current_ticket(), 1);
    }

    #[tokio::test]
    async fn newer_request_supersedes_older_one() {
        let lookup = Arc::new(LatestLookup::new(GatedLookup::default()));

        let first = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.fetch(Coordinate::new(1.0, 0.0), "KEY").await }
        });
        wait_until_started(&lookup, 1).await;

        let second = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.fetch(Coordinate::new(2.0, 0.0), "KEY").await }
        });

        assert!(first.await.expect("task").is_none());

        wait_until_started(&lookup, 2).await;
        lookup.inner().gate.notify_waiters();

        let model = second.await.expect("task").expect("latest").expect("ok");
        assert_eq!(model.temperature_c, 2.0);
    }

    #[tokio::test]
    async fn cancel_discards_in_flight_request() {
        let lookup = Arc::new(LatestLookup::new(GatedLookup::default()));

        let pending = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.fetch(Coordinate::new(1.0, 0.0), "KEY").await }
        });
        wait_until_started(&lookup, 1).await;

        lookup.cancel();

        assert!(pending.await.expect("task").is_none());
        assert_eq!(lookup.current_ticket(), 2);
    }

    #[tokio::test]
    async fn issued_ticket_superseded_before_start_delivers_nothing() {
        let lookup = LatestLookup::new(Immediate);

        let older = lookup.issue();
        let newer = lookup.issue();
        assert!(older < newer);

        assert!(lookup.fetch_issued(older, Coordinate::new(1.0, 0.0), "KEY").await.is_none());

        let model = lookup
            .fetch_issued(newer, Coordinate::new(2.0, 0.0), "KEY")
            .await
            .expect("latest")
            .expect("ok");
        assert_eq!(model.temperature_c, 2.0);
    }

    #[tokio::test]
    async fn sequential_requests_each_deliver() {
        let lookup = LatestLookup::new(Immediate);

        for lat in [1.0, 2.0, 3.0] {
            let model = lookup
                .fetch(Coordinate::new(lat, 0.0), "KEY")
                .await
                .expect("not superseded")
                .expect("ok");
            assert_eq!(model.temperature_c, lat);
        }
    }
}
