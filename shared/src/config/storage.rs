//! Media storage configuration module

use serde::{Deserialize, Serialize};

/// Local media storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding uploaded media files
    pub media_root: String,

    /// URL prefix under which media files are served
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: String::from("./media"),
            public_prefix: default_public_prefix(),
        }
    }
}

impl StorageConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            media_root: std::env::var("MEDIA_ROOT").unwrap_or(defaults.media_root),
            public_prefix: std::env::var("MEDIA_PUBLIC_PREFIX").unwrap_or(defaults.public_prefix),
        }
    }
}

fn default_public_prefix() -> String {
    String::from("/media/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefix_has_trailing_slash() {
        let config = StorageConfig::default();
        assert!(config.public_prefix.ends_with('/'));
    }
}
