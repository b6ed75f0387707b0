//! Analytics detail level — how much raw payload telemetry may capture.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ordered verbosity setting for captured telemetry.
///
/// `Info < Detailed < Full`. Ordering goes through [`rank`](Self::rank)
/// rather than declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsDetailLevel {
    /// Tags and the fixed set of fields only.
    #[default]
    Info,
    /// Adds headers, body and options, truncated.
    Detailed,
    /// Adds headers, body and options, never truncated.
    Full,
}

impl AnalyticsDetailLevel {
    /// Numeric rank backing the total order.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Detailed => 2,
            Self::Full => 3,
        }
    }

    /// True when `self` is `threshold` or any level above it.
    pub const fn at_least(self, threshold: Self) -> bool {
        self.rank() >= threshold.rank()
    }
}

impl PartialOrd for AnalyticsDetailLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AnalyticsDetailLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for AnalyticsDetailLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Detailed => write!(f, "detailed"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for AnalyticsDetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "detailed" => Ok(Self::Detailed),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown analytics detail level '{other}' (expected info, detailed or full)"
            )),
        }
    }
}
