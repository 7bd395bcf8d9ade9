//! Engine configuration
//!
//! Deployment knobs for the conflict engine. Game-rule constants (window
//! lengths, strength ratios, penalty magnitudes) are NOT here - they live in
//! `conflict::constants` and are fixed by the game design.

use std::time::Duration;

/// Configuration for the conflict engine runtime
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How often the resolution scheduler re-checks deadlines
    ///
    /// Events resolve on their voting/rally deadline; the scheduler polls
    /// `should_resolve` rather than arming one timer per event, so this
    /// bounds how late past the deadline a resolution can fire.
    pub poll_interval: Duration,

    /// Minimum number of due events before batch resolution goes parallel
    ///
    /// Below this threshold rayon's thread overhead exceeds the benefit;
    /// due events are resolved sequentially instead.
    pub parallel_threshold: usize,

    /// Maximum resolved conflicts retained for historical display
    ///
    /// Oldest records are evicted first. Resolution outcomes already applied
    /// to territory/participant state are never rolled back by eviction.
    pub history_retention: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            parallel_threshold: 8,
            history_retention: 256,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("poll_interval must be positive".into());
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be at least 1".into());
        }

        if self.history_retention == 0 {
            return Err("history_retention must be at least 1".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> Result<(), EngineConfig> {
    CONFIG.set(config)
}
