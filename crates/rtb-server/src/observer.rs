use rtb_store::{DropObserver, Resource};

/// Reports skipped records as warnings in the server log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDropObserver;

impl DropObserver for TracingDropObserver {
    fn records_dropped(&self, resource: Resource, count: usize) {
        tracing::warn!(%resource, dropped = count, "skipped malformed records while loading");
    }
}
