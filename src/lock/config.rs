//! Serializable lock configuration.
//!
//! Both structs can be embedded in an application's own config file:
//!
//! ```
//! use filth_rust::lock::{BoundedLockConfig, ExclusiveLockConfig};
//!
//! let exclusive: ExclusiveLockConfig = serde_json::from_str(r#"{"timeout_ms": 250}"#).unwrap();
//! assert_eq!(exclusive.timeout(), Some(std::time::Duration::from_millis(250)));
//!
//! let bounded: BoundedLockConfig = serde_json::from_str("{}").unwrap();
//! assert_eq!(bounded.width(), 1);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for an [`ExclusiveLock`](super::ExclusiveLock).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveLockConfig {
    /// Watchdog timeout in milliseconds. Absent or zero disables the watchdog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ExclusiveLockConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        ExclusiveLockConfig {
            timeout_ms: Some(timeout.as_millis().min(u64::MAX as u128) as u64),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Configuration for a [`BoundedLock`](super::BoundedLock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedLockConfig {
    #[serde(default = "default_width")]
    pub width: usize,
}

fn default_width() -> usize {
    1
}

impl BoundedLockConfig {
    pub fn new(width: usize) -> Self {
        BoundedLockConfig { width }
    }

    /// Effective width. Zero is clamped to one.
    pub fn width(&self) -> usize {
        self.width.max(1)
    }
}

impl Default for BoundedLockConfig {
    fn default() -> Self {
        BoundedLockConfig {
            width: default_width(),
        }
    }
}
