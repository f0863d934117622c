//! Location updates → lookups → presenter.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinSet};

use crate::{Coordinate, LatestLookup, LookupError, WeatherLookup, WeatherModel};

/// Source of coordinate updates, e.g. a device location service.
#[async_trait]
pub trait LocationProvider: Send {
    /// Next coordinate, or `None` once the source is exhausted.
    async fn next_coordinate(&mut self) -> Option<Coordinate>;
}

#[async_trait]
impl LocationProvider for mpsc::Receiver<Coordinate> {
    async fn next_coordinate(&mut self) -> Option<Coordinate> {
        self.recv().await
    }
}

/// Consumer of lookup results.
///
/// Calls come from a single render task, never concurrently; implementations
/// marshal onto whatever context they draw on.
pub trait Presenter: Send + Sync {
    fn render(&self, model: &WeatherModel);
    fn render_error(&self, error: &LookupError);
}

type Delivery = (u64, Result<WeatherModel, LookupError>);

/// Look up every coordinate `locations` yields and hand the results to `presenter`.
///
/// Lookups run concurrently, superseded requests are cancelled, and results
/// are rendered in the order their updates arrived: once a result is shown,
/// nothing older replaces it. Returns once `locations` is exhausted and the
/// last lookup has been rendered.
pub async fn run_updates<P, L, R>(
    locations: &mut P,
    lookup: Arc<LatestLookup<L>>,
    api_key: Arc<str>,
    presenter: Arc<R>,
) where
    P: LocationProvider + ?Sized,
    L: WeatherLookup + 'static,
    R: Presenter + 'static,
{
    let (deliveries, delivered) = mpsc::unbounded_channel::<Delivery>();
    let renderer = tokio::spawn(render_in_order(delivered, Arc::clone(&lookup), presenter));
    let mut tasks = JoinSet::new();

    while let Some(coordinate) = locations.next_coordinate().await {
        // Ticket taken here so issue order matches arrival order.
        let ticket = lookup.issue();
        tracing::debug!(%coordinate, ticket, "location update");

        let lookup = Arc::clone(&lookup);
        let api_key = Arc::clone(&api_key);
        let deliveries = deliveries.clone();

        tasks.spawn(async move {
            if let Some(result) = lookup.fetch_issued(ticket, coordinate, &api_key).await {
                // Only fails once the renderer is gone, which means it panicked.
                let _ = deliveries.send((ticket, result));
            }
        });

        // Reap finished lookups so the set doesn't grow with a long-lived source.
        while tasks.try_join_next().is_some() {}
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "weather lookup task failed");
        }
    }

    drop(deliveries);
    if let Err(e) = renderer.await {
        tracing::error!(error = %e, "weather render task failed");
    }
}

/// Render deliveries one at a time, dropping any that are older than the
/// newest issued ticket or than what is already on screen.
async fn render_in_order<L, R>(
    mut delivered: mpsc::UnboundedReceiver<Delivery>,
    lookup: Arc<LatestLookup<L>>,
    presenter: Arc<R>,
) where
    L: WeatherLookup,
    R: Presenter,
{
    let mut last_rendered = 0;

    while let Some((ticket, result)) = delivered.recv().await {
        if ticket <= last_rendered || ticket < lookup.current_ticket() {
            tracing::debug!(ticket, last_rendered, "dropping weather result superseded before render");
            continue;
        }
        last_rendered = ticket;

        match result {
            Ok(model) => presenter.render(&model),
            Err(e) => presenter.render_error(&e),
        }
    }
}
