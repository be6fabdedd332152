//! Engine configuration

use serde::Deserialize;

/// Default capacity of the preset descriptor cache.
pub const DEFAULT_DESCRIPTOR_CACHE_SIZE: usize = 128;

/// Default capacity of the decoded audio cache.
pub const DEFAULT_AUDIO_CACHE_SIZE: usize = 256;

/// Tunable limits for one catalog engine instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum number of cached preset descriptors
    pub descriptor_cache_size: usize,
    /// Maximum number of cached decoded audio buffers
    pub audio_cache_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            descriptor_cache_size: DEFAULT_DESCRIPTOR_CACHE_SIZE,
            audio_cache_size: DEFAULT_AUDIO_CACHE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.descriptor_cache_size, 128);
        assert_eq!(config.audio_cache_size, 256);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: CatalogConfig =
            serde_json::from_str(r#"{ "audio_cache_size": 32 }"#).unwrap();
        assert_eq!(config.audio_cache_size, 32);
        assert_eq!(config.descriptor_cache_size, 128);
    }
}
