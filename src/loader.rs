//! Asset load tracking for the Loading phase
//!
//! The host owns the actual image/audio handles. It reports each asset as
//! settled (loaded or failed) and the tracker decides when play may begin.
//! Failures are not fatal; a timeout forces progress when some asset never
//! reports back.

use serde::{Deserialize, Serialize};

use crate::consts::LOAD_TIMEOUT_SECS;

/// Where loading stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Pending,
    /// Every expected asset settled
    Complete,
    /// Gave up waiting
    TimedOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTracker {
    expected: u32,
    loaded: u32,
    failed: u32,
    elapsed: f32,
    timeout: f32,
    status: LoadStatus,
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new(0, LOAD_TIMEOUT_SECS)
    }
}

impl LoadTracker {
    /// Track `expected` assets. Nothing to load means loading is already done.
    pub fn new(expected: u32, timeout_secs: f32) -> Self {
        let timeout = if timeout_secs.is_finite() && timeout_secs > 0.0 {
            timeout_secs
        } else {
            LOAD_TIMEOUT_SECS
        };
        Self {
            expected,
            loaded: 0,
            failed: 0,
            elapsed: 0.0,
            timeout,
            status: if expected == 0 {
                LoadStatus::Complete
            } else {
                LoadStatus::Pending
            },
        }
    }

    /// One asset finished loading (`ok`) or failed. Reports past the
    /// expected count are ignored.
    pub fn settle(&mut self, ok: bool) -> LoadStatus {
        if self.settled() >= self.expected {
            return self.status;
        }
        if ok {
            self.loaded += 1;
        } else {
            self.failed += 1;
            log::warn!("Asset failed to load ({} failed so far)", self.failed);
        }
        if self.status == LoadStatus::Pending && self.settled() >= self.expected {
            self.status = LoadStatus::Complete;
            log::info!("Assets settled: {} loaded, {} failed", self.loaded, self.failed);
        }
        self.status
    }

    /// Feed wall-clock seconds spent waiting
    pub fn advance(&mut self, elapsed: f32) -> LoadStatus {
        if self.status != LoadStatus::Pending || !(elapsed > 0.0) {
            return self.status;
        }
        self.elapsed += elapsed;
        if self.elapsed >= self.timeout {
            self.status = LoadStatus::TimedOut;
            log::warn!(
                "Asset loading timed out after {:.1}s ({}/{} settled)",
                self.elapsed,
                self.settled(),
                self.expected
            );
        }
        self.status
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status != LoadStatus::Pending
    }

    pub fn settled(&self) -> u32 {
        self.loaded + self.failed
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    /// Fraction settled, for a loading bar
    pub fn progress(&self) -> f32 {
        if self.expected == 0 {
            1.0
        } else {
            self.settled() as f32 / self.expected as f32
        }
    }
}
