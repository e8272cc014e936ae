//! Per-host latency statistics and probe results

use crate::probe::parser::ParsedStats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round-trip statistics for one host, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostStat {
    /// Host identifier exactly as given in the input
    pub host: String,

    pub min: f64,
    pub avg: f64,
    pub max: f64,

    /// Spread reported by ping itself (mdev/stddev), when the format has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,

    /// False when the values are the unreachable sentinel
    pub reachable: bool,
}

impl HostStat {
    /// Statistics measured from a successfully parsed probe
    pub fn measured(host: impl Into<String>, parsed: ParsedStats) -> Self {
        Self {
            host: host.into(),
            min: parsed.min,
            avg: parsed.avg,
            max: parsed.max,
            deviation: parsed.deviation,
            reachable: true,
        }
    }

    /// Placeholder for a host whose probe failed; sorts after every
    /// measured host as long as `sentinel_ms` exceeds any real latency.
    pub fn sentinel(host: impl Into<String>, sentinel_ms: f64) -> Self {
        Self {
            host: host.into(),
            min: sentinel_ms,
            avg: sentinel_ms,
            max: sentinel_ms,
            deviation: None,
            reachable: false,
        }
    }

    /// Jitter is the latency spread, `max - min`
    pub fn jitter(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for HostStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} min={:.2} avg={:.2} max={:.2} jit={:.2}",
            self.host, self.min, self.avg, self.max, self.jitter()
        )
    }
}

/// Why a probe did not yield statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The process could not be spawned or exited non-zero
    Invocation,
    /// The probe exceeded its wall-clock limit
    Timeout,
    /// The output had no recognizable summary line
    Unparsed,
    /// The worker handling the host stopped before reporting
    Lost,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invocation => "invocation",
            Self::Timeout => "timeout",
            Self::Unparsed => "unparsed",
            Self::Lost => "lost",
        }
    }
}

/// Outcome of probing one host
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Measured(HostStat),
    Failed { kind: FailureKind, reason: String },
}

/// A host paired with its outcome; produced once by a worker and then
/// handed to the collector by value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub host: String,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn measured(stat: HostStat) -> Self {
        Self {
            host: stat.host.clone(),
            outcome: ProbeOutcome::Measured(stat),
        }
    }

    pub fn failed(host: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            outcome: ProbeOutcome::Failed {
                kind,
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Measured(_))
    }

    /// Statistics for the report; failures become sentinel rows
    pub fn to_stat(&self, sentinel_ms: f64) -> HostStat {
        match &self.outcome {
            ProbeOutcome::Measured(stat) => stat.clone(),
            ProbeOutcome::Failed { .. } => HostStat::sentinel(self.host.clone(), sentinel_ms),
        }
    }
}
