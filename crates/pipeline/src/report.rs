//! Per-cycle outcome

/// What one source contributed to a cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    /// Events returned by the fetch
    pub fetched: usize,
    /// Events successfully rendered
    pub rendered: usize,
    /// Why the fetch produced nothing (error, panic, timeout)
    pub failure: Option<String>,
}

/// Summary returned by `Orchestrator::run_cycle`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// One entry per source, in fetch order
    pub sources: Vec<SourceReport>,
    /// Payloads written to the channel this cycle
    pub delivered: usize,
    /// Payloads left in the pending queue
    pub pending: usize,
    /// Payloads discarded because the pending queue was full
    pub dropped: usize,
}

impl CycleReport {
    /// Total events fetched across sources
    pub fn fetched(&self) -> usize {
        self.sources.iter().map(|s| s.fetched).sum()
    }

    /// Total payloads rendered across sources
    pub fn rendered(&self) -> usize {
        self.sources.iter().map(|s| s.rendered).sum()
    }

    /// Names of sources whose fetch failed
    pub fn failed_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.failure.is_some())
            .map(|s| s.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let report = CycleReport {
            sources: vec![
                SourceReport {
                    name: "a".into(),
                    fetched: 3,
                    rendered: 2,
                    failure: None,
                },
                SourceReport {
                    name: "b".into(),
                    failure: Some("timed out".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        assert_eq!(report.fetched(), 3);
        assert_eq!(report.rendered(), 2);
        assert_eq!(report.failed_sources(), vec!["b"]);
    }
}
