use crate::constants::{frame, grid, link, queue};
use crate::EngineError;
use core_types::ConnectionParameters;
use framing::FrameOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings, loaded from JSON.
///
/// Missing keys fall back to the defaults in [`constants`](crate::constants).
///
/// ```json
/// {
///   "queue_capacity": 256,
///   "tile_size": 80,
///   "address": "00:16:53:18:8E:08",
///   "channel": 1,
///   "frame": { "id_parity": true, "checksum": false }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub queue_capacity: usize,
    pub tile_size: u32,
    pub address: String,
    pub channel: u8,
    pub frame: FrameOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: queue::DEFAULT_CAPACITY,
            tile_size: grid::DEFAULT_TILE_SIZE,
            address: link::DEFAULT_ADDRESS.to_string(),
            channel: link::DEFAULT_CHANNEL,
            frame: FrameOptions {
                id_parity: frame::DEFAULT_ID_PARITY,
                checksum: frame::DEFAULT_CHECKSUM,
            },
        }
    }
}

impl EngineConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a config document.
    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| EngineError::Config(format!("Malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.queue_capacity == 0 {
            return Err(EngineError::Config(
                "queue_capacity must be at least 1".into(),
            ));
        }
        if self.tile_size == 0 {
            return Err(EngineError::Config("tile_size must be positive".into()));
        }
        self.connection_parameters()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(())
    }

    /// The default device to talk to.
    pub fn connection_parameters(&self) -> Result<ConnectionParameters, EngineError> {
        Ok(ConnectionParameters::new(
            &self.address,
            i32::from(self.channel),
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.tile_size, 80);
        assert_eq!(
            config.connection_parameters().unwrap().address.to_string(),
            "00:16:53:18:8E:08"
        );
        assert!(config.frame.id_parity);
        assert!(!config.frame.checksum);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"tile_size": 40, "frame": {"checksum": true}}"#)
                .unwrap();
        assert_eq!(config.tile_size, 40);
        assert_eq!(config.queue_capacity, 256);
        assert!(config.frame.id_parity);
        assert!(config.frame.checksum);
    }

    #[test]
    fn test_rejects_bad_values() {
        for doc in [
            r#"{"queue_capacity": 0}"#,
            r#"{"tile_size": 0}"#,
            r#"{"channel": 0}"#,
            r#"{"address": "00:16:53"}"#,
            r#"{"address": "00:16-53:18:8E:08"}"#,
        ] {
            let err = EngineConfig::from_json_str(doc).unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{} gave {:?}", doc, err);
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(err.to_string().contains("Malformed config"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "engine-config-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"channel": 3, "address": "001653188E08"}}"#).unwrap();
        drop(file);

        let config = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let params = config.connection_parameters().unwrap();
        assert_eq!(params.channel, 3);
        assert_eq!(params.address.to_string(), "00:16:53:18:8E:08");
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/engine.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}
