// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Edit debouncing policy.
//!
//! The caller owns the clock and passes `now` in; nothing here sleeps or
//! spawns.

use std::time::{Duration, Instant};

use crate::config::EngineConfig;

/// Decides when a pause in editing is long enough to re-resolve
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    last_edit: Option<Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_edit: None,
        }
    }

    /// Debouncer using the configured `debounce_ms`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.debounce())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Remember that the text changed at `now`
    pub fn record_edit(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// `true` when an edit is pending and at least the interval has passed
    pub fn should_run(&self, now: Instant) -> bool {
        self.last_edit
            .is_some_and(|edit| now.saturating_duration_since(edit) >= self.interval)
    }

    /// Like [`Self::should_run`], and clears the pending edit when ready
    pub fn take_ready(&mut self, now: Instant) -> bool {
        let ready = self.should_run(now);
        if ready {
            self.last_edit = None;
        }
        ready
    }
}
