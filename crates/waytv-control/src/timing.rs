//! Settle delays and key delivery policy

use std::time::Duration;

use serde::{Deserialize, Serialize};
use waytv_core::PositionTable;

/// Scale applied to every settle delay
///
/// Profiles carry delays tuned on real hardware. `1.0` uses them as is,
/// `0.0` skips them (tests and dry runs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Timing {
    scale: f64,
}

impl Timing {
    /// Use the profile delays unchanged
    pub fn realtime() -> Self {
        Self { scale: 1.0 }
    }

    /// Skip every delay
    pub fn instant() -> Self {
        Self { scale: 0.0 }
    }

    /// Scale delays by `scale`; negative or non-finite values become `0.0`
    pub fn scaled(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        };
        Self { scale }
    }

    /// Get the scale factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Effective delay for a base delay in milliseconds
    pub fn settle(&self, base_ms: u64) -> Duration {
        Duration::from_millis(base_ms).mul_f64(self.scale)
    }

    /// Block the calling task for the effective delay
    pub async fn pause(&self, base_ms: u64) {
        let delay = self.settle(base_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::realtime()
    }
}

impl From<f64> for Timing {
    fn from(scale: f64) -> Self {
        Self::scaled(scale)
    }
}

impl From<Timing> for f64 {
    fn from(timing: Timing) -> Self {
        timing.scale
    }
}

/// What a multi-step key sequence does when one delivery fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFailurePolicy {
    /// Log the failure and keep sending the remaining keys
    #[default]
    Continue,
    /// Stop at the first failure and report it
    Abort,
}

/// Settings shared by every driver
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Settle delay scale
    pub timing: Timing,
    /// Behaviour on key delivery failure
    pub key_failure_policy: KeyFailurePolicy,
    /// Channel positions known locally but not built in
    pub positions: PositionTable,
}

impl DriverConfig {
    /// Configuration with delays disabled
    pub fn instant() -> Self {
        Self {
            timing: Timing::instant(),
            ..Default::default()
        }
    }
}
