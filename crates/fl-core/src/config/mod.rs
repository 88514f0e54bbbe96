//! Sync configuration domain model

use serde::{Deserialize, Serialize};

/// Configuration of the offline sync subsystem.
///
/// Loaded from a TOML file by the infrastructure layer; every field has
/// a default so a missing or partial file still yields a usable config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Remote upload endpoint the drain flow posts queued files to
    pub endpoint_url: String,

    /// URL probed to decide whether the network is usable
    pub probe_url: String,

    /// Interval between reachability probes, in seconds.
    /// The probe is a polling fallback; keep it in the 15-30 s band.
    pub probe_interval_secs: u64,

    /// Interval between periodic drain passes while online, in seconds
    pub drain_interval_secs: u64,

    /// Upper bound on a single upload attempt, in seconds
    pub attempt_timeout_secs: u64,

    /// Failed attempts before a record is dead-lettered
    pub max_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://api.fieldlink.example/uploads".to_string(),
            probe_url: "https://api.fieldlink.example/health".to_string(),
            probe_interval_secs: 20,
            drain_interval_secs: 60,
            attempt_timeout_secs: 45,
            max_attempts: 8,
        }
    }
}
