//! Ranking of per-host results
//!
//! Reachable hosts come before failed ones whatever the sentinel value is.
//! Within each group hosts are ordered by average latency, then jitter
//! (`max - min`), then minimum, then maximum. The sort is stable, so hosts
//! with identical keys keep their collection order.

use crate::models::HostStat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Total order used for the report
pub fn compare(a: &HostStat, b: &HostStat) -> Ordering {
    b.reachable.cmp(&a.reachable)
        .then_with(|| a.avg.total_cmp(&b.avg))
        .then_with(|| a.jitter().total_cmp(&b.jitter()))
        .then_with(|| a.min.total_cmp(&b.min))
        .then_with(|| a.max.total_cmp(&b.max))
}

/// Sort hosts from best to worst
pub fn rank(mut stats: Vec<HostStat>) -> Vec<HostStat> {
    stats.sort_by(compare);
    stats
}

/// Aggregate view of a ranked run, shown in verbose mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub hosts: usize,
    pub reachable: usize,
    pub unreachable: usize,
    /// Fastest reachable host
    pub best_host: Option<String>,
    /// Median of the reachable hosts' averages
    pub median_avg_ms: Option<f64>,
}

impl RunSummary {
    /// Summarize stats that are already ranked
    pub fn from_ranked(ranked: &[HostStat]) -> Self {
        let reachable: Vec<&HostStat> = ranked.iter().filter(|s| s.reachable).collect();

        let median_avg_ms = if reachable.is_empty() {
            None
        } else {
            let mut avgs: Vec<f64> = reachable.iter().map(|s| s.avg).collect();
            avgs.sort_by(f64::total_cmp);
            let mid = avgs.len() / 2;
            Some(if avgs.len() % 2 == 0 {
                (avgs[mid - 1] + avgs[mid]) / 2.0
            } else {
                avgs[mid]
            })
        };

        Self {
            hosts: ranked.len(),
            reachable: reachable.len(),
            unreachable: ranked.len() - reachable.len(),
            best_host: reachable.first().map(|s| s.host.clone()),
            median_avg_ms,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.hosts == 0 {
            0.0
        } else {
            self.reachable as f64 / self.hosts as f64 * 100.0
        }
    }
}
