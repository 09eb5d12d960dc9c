//! Revocation registry for access tokens, with a periodic sweeper.
//!
//! Logout revokes the presented access token by its `jti` so it dies
//! before its natural expiry. Entries outlive their usefulness once the
//! token itself has expired, so a background task sweeps them out.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{info, warn};

/// In-process registry of revoked token IDs
///
/// Maps `jti` to the token's expiry timestamp. A `jti` is only treated
/// as revoked while the token it belonged to could still be alive.
#[derive(Default)]
pub struct RevocationRegistry {
    entries: RwLock<HashMap<String, i64>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a token as revoked until its expiry timestamp
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(jti.to_string(), expires_at);
    }

    /// Whether the token ID is currently revoked
    ///
    /// An entry whose expiry has passed no longer counts: the token is
    /// dead anyway and the sweeper will collect the entry.
    pub fn is_revoked(&self, jti: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        match entries.get(jti) {
            Some(expires_at) => *expires_at > Utc::now().timestamp(),
            None => false,
        }
    }

    /// Removes entries whose tokens have expired
    ///
    /// # Returns
    /// Number of entries removed
    pub fn sweep(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Configuration for the registry sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable the background sweep
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

/// Background task sweeping expired entries out of the registry
pub struct RegistrySweeper {
    registry: Arc<RevocationRegistry>,
    config: SweeperConfig,
}

impl RegistrySweeper {
    pub fn new(registry: Arc<RevocationRegistry>, config: SweeperConfig) -> Self {
        Self { registry, config }
    }

    /// Runs a single sweep cycle
    pub fn run_sweep(&self) -> usize {
        let removed = self.registry.sweep();
        if removed > 0 {
            info!("Swept {} expired revocation entries", removed);
        }
        removed
    }

    /// Starts the sweeper as a background task
    ///
    /// Spawns a tokio task that sweeps at regular intervals.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Revocation registry sweeper is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Revocation registry sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;
                self.run_sweep();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoked_until_expiry() {
        let registry = RevocationRegistry::new();
        let future = Utc::now().timestamp() + 600;
        registry.revoke("jti-1", future);

        assert!(registry.is_revoked("jti-1"));
        assert!(!registry.is_revoked("jti-2"));
    }

    #[test]
    fn expired_entry_no_longer_counts() {
        let registry = RevocationRegistry::new();
        let past = Utc::now().timestamp() - 1;
        registry.revoke("jti-1", past);

        assert!(!registry.is_revoked("jti-1"));
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let registry = RevocationRegistry::new();
        let now = Utc::now().timestamp();
        registry.revoke("dead", now - 10);
        registry.revoke("alive", now + 600);

        let removed = registry.sweep();
        assert_eq!(removed, 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_revoked("alive"));
    }

    #[test]
    fn sweeper_runs_a_cycle() {
        let registry = Arc::new(RevocationRegistry::new());
        registry.revoke("dead", Utc::now().timestamp() - 10);

        let sweeper = RegistrySweeper::new(registry.clone(), SweeperConfig::default());
        assert_eq!(sweeper.run_sweep(), 1);
        assert!(registry.is_empty());
    }
}
