//! Urgency classification and lifecycle status of a timer

use serde::{Deserialize, Serialize};

/// Urgency band derived from the remaining fraction of a timer's own duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// More than two thirds of the duration remains
    Safe,
    /// More than one third remains
    Warning,
    /// One third or less remains
    Critical,
    /// The timer has finished
    Muted,
}

impl Band {
    /// Classify `remaining` against `initial`.
    ///
    /// Thresholds use integer division, so a value sitting exactly on a
    /// cut belongs to the lower band.
    pub fn classify(remaining: u64, initial: u64) -> Self {
        if remaining == 0 {
            return Band::Muted;
        }
        let first_cut = initial.saturating_mul(2) / 3;
        let second_cut = initial / 3;
        if remaining > first_cut {
            Band::Safe
        } else if remaining > second_cut {
            Band::Warning
        } else {
            Band::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Safe => "safe",
            Band::Warning => "warning",
            Band::Critical => "critical",
            Band::Muted => "muted",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Paused,
    Finished,
}
