//! Operator control state for runtime session management.
//!
//! This module provides shared atomic state used by the session runner and
//! the observer REST API. The operator can pause/resume the day clock,
//! change its speed, and trigger a clean shutdown, all without stopping
//! the process. It also tracks the advisory action cool-down.
//!
//! # Architecture
//!
//! All mutable control fields use [`std::sync::atomic`] types so the
//! struct can sit in an [`Arc`](std::sync::Arc) shared between the runner
//! task and the Axum handler tasks without locks on the hot path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SessionBoundsConfig;

/// Smallest tick interval the operator may set, in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Reason why a session run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// An operator issued a stop command.
    OperatorStop,
    /// Reached the configured `max_days` limit.
    MaxDaysReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// Every command sender was dropped.
    CommandChannelClosed,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the day clock is paused.
    paused: AtomicBool,

    /// Notification used to wake the runner when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Notification used to wake the runner on a stop request.
    stop_notify: Notify,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock time when the run started.
    started_at: DateTime<Utc>,

    /// Wall-clock milliseconds since epoch of the last player action.
    last_action_ms: AtomicU64,

    /// Maximum simulated days (0 = unlimited).
    max_days: u32,

    /// Maximum wall-clock seconds (0 = unlimited).
    max_real_time_seconds: u64,

    /// Reason the run ended, if it has.
    end_reason: Mutex<Option<SessionEndReason>>,
}

impl OperatorState {
    /// Create a new operator state from configuration.
    ///
    /// Intervals below [`MIN_TICK_INTERVAL_MS`] are raised to it.
    pub fn new(tick_interval_ms: u64, bounds: &SessionBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms.max(MIN_TICK_INTERVAL_MS)),
            started_at: Utc::now(),
            last_action_ms: AtomicU64::new(0),
            max_days: bounds.max_days,
            max_real_time_seconds: bounds.max_real_time_seconds,
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the day clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the day clock. Actions and sky events keep flowing.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the day clock and wake the runner.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the day clock is no longer paused.
    ///
    /// Returns immediately if not paused.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait until a stop is requested.
    pub async fn stopped(&self) {
        while !self.stop_requested.load(Ordering::Acquire) {
            self.stop_notify.notified().await;
        }
    }

    /// Record the reason the run ended.
    pub async fn set_end_reason(&self, reason: SessionEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the run ended, if it has.
    pub async fn end_reason(&self) -> Option<SessionEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected (below [`MIN_TICK_INTERVAL_MS`]).
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }

    // -----------------------------------------------------------------------
    // Action cool-down
    // -----------------------------------------------------------------------

    /// Record that a player action was just applied.
    pub fn mark_action(&self) {
        self.last_action_ms.store(now_millis(), Ordering::Release);
    }

    /// Whether the last action is still inside its cool-down window.
    ///
    /// Advisory only: the runner applies actions regardless.
    pub fn is_processing(&self, cooldown_ms: u64) -> bool {
        let last = self.last_action_ms.load(Ordering::Acquire);
        last != 0 && now_millis().saturating_sub(last) < cooldown_ms
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Check whether the day limit has been reached.
    ///
    /// Returns `true` if `max_days > 0` and `days_elapsed >= max_days`.
    pub const fn day_limit_reached(&self, days_elapsed: u32) -> bool {
        self.max_days > 0 && days_elapsed >= self.max_days
    }

    /// Check whether the wall-clock time limit has been reached.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed seconds since the run started.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        // `num_seconds` can be negative if clocks are weird; treat as 0.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Get the configured max days.
    pub const fn max_days(&self) -> u32 {
        self.max_days
    }

    /// Get the configured max real-time seconds.
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis().max(0)).unwrap_or(u64::MAX)
}

/// JSON-serializable status of the session for the operator API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Simulated days elapsed.
    pub day: u32,
    /// Whether the day clock is paused.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Whether the last action is still inside its cool-down.
    pub processing: bool,
    /// Current tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Elapsed wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Configured maximum days (0 = unlimited).
    pub max_days: u32,
    /// Configured maximum real-time seconds (0 = unlimited).
    pub max_real_time_seconds: u64,
    /// The reason the run ended, if applicable.
    pub end_reason: Option<SessionEndReason>,
    /// ISO 8601 timestamp of when the run started.
    pub started_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbounded() -> SessionBoundsConfig {
        SessionBoundsConfig::default()
    }

    #[test]
    fn initial_state_is_running() {
        let state = OperatorState::new(1000, &unbounded());
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
        assert!(!state.is_processing(300));
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::new(1000, &unbounded());
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn stop_request() {
        let state = OperatorState::new(1000, &unbounded());
        state.request_stop();
        assert!(state.is_stop_requested());
    }

    #[test]
    fn set_tick_interval() {
        let state = OperatorState::new(1000, &unbounded());
        assert_eq!(state.set_tick_interval_ms(2000), Some(1000));
        assert_eq!(state.tick_interval_ms(), 2000);
    }

    #[test]
    fn reject_sub_100ms_interval() {
        let state = OperatorState::new(1000, &unbounded());
        assert!(state.set_tick_interval_ms(50).is_none());
        assert_eq!(state.tick_interval_ms(), 1000);
    }

    #[test]
    fn initial_interval_is_raised_to_minimum() {
        let state = OperatorState::new(0, &unbounded());
        assert_eq!(state.tick_interval_ms(), MIN_TICK_INTERVAL_MS);
    }

    #[test]
    fn day_limit() {
        let bounds = SessionBoundsConfig {
            max_days: 110,
            max_real_time_seconds: 0,
        };
        let state = OperatorState::new(1000, &bounds);
        assert!(!state.day_limit_reached(109));
        assert!(state.day_limit_reached(110));
        assert!(!OperatorState::new(1000, &unbounded()).day_limit_reached(u32::MAX));
    }

    #[test]
    fn time_limit_zero_means_unlimited() {
        let state = OperatorState::new(1000, &unbounded());
        assert!(!state.time_limit_reached());
    }

    #[test]
    fn action_marks_processing_window() {
        let state = OperatorState::new(1000, &unbounded());
        state.mark_action();
        assert!(state.is_processing(60_000));
        assert!(!state.is_processing(0));
    }

    #[tokio::test]
    async fn end_reason_round_trip() {
        let state = OperatorState::new(1000, &unbounded());
        assert_eq!(state.end_reason().await, None);
        state.set_end_reason(SessionEndReason::OperatorStop).await;
        assert_eq!(state.end_reason().await, Some(SessionEndReason::OperatorStop));
    }

    #[tokio::test]
    async fn stopped_returns_after_request() {
        let state = OperatorState::new(1000, &unbounded());
        state.request_stop();
        state.stopped().await;
    }
}
