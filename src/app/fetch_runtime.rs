//! Background fetches so the UI thread stays responsive.
//!
//! Each fetch runs on its own tokio task and reports back with the ticket it
//! was started under; the event loop hands both to
//! [`BuildPipeline::complete`](super::build::BuildPipeline::complete), which
//! drops results from superseded tickets.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::source::{FetchError, Fetcher, SourceLocator};

use super::build::BuildTicket;

pub struct FetchUpdate {
    pub ticket: BuildTicket,
    pub result: Result<String, FetchError>,
}

pub fn spawn_fetch(
    tx: mpsc::UnboundedSender<FetchUpdate>,
    ticket: BuildTicket,
    fetcher: Fetcher,
    locator: SourceLocator,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = fetcher.fetch(&locator).await;
        let _ = tx.send(FetchUpdate { ticket, result });
    })
}
