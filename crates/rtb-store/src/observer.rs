use std::fmt;

/// The persisted resources a store manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Entries,
    ReservedCodes,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entries => write!(f, "entries"),
            Self::ReservedCodes => write!(f, "reserved-codes"),
        }
    }
}

/// Receives the number of malformed records a load had to skip.
///
/// The store itself never fails on bad records; whoever embeds it decides
/// whether a non-zero count is worth a log line, a metric, or an alert.
pub trait DropObserver: Send + Sync {
    /// Called once per load that skipped at least one record.
    fn records_dropped(&self, resource: Resource, count: usize);
}

/// Observer that ignores every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpObserver;

impl DropObserver for NoOpObserver {
    fn records_dropped(&self, _resource: Resource, _count: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_display() {
        assert_eq!(Resource::Entries.to_string(), "entries");
        assert_eq!(Resource::ReservedCodes.to_string(), "reserved-codes");
    }

    #[test]
    fn noop_observer_accepts_reports() {
        NoOpObserver.records_dropped(Resource::Entries, 3);
    }
}
