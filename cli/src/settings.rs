//! Loading [`ProtocolConfig`] from disk.
//!
//! The file is JSON. Missing fields keep their mainnet defaults, so
//! `{"arbitrary_release": 0}` is enough to turn on every transaction type
//! for a devnet.

use std::path::Path;

use anyhow::{Context, Result};

use quill_protocol::config::ProtocolConfig;

/// Read the protocol config at `path`, or the defaults when `path` is `None`.
pub fn load_protocol_config(path: Option<&Path>) -> Result<ProtocolConfig> {
    let Some(path) = path else {
        return Ok(ProtocolConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: ProtocolConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?config, "loaded protocol config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(load_protocol_config(None).unwrap(), ProtocolConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        assert_eq!(
            load_protocol_config(Some(file.path())).unwrap(),
            ProtocolConfig::default()
        );
    }

    #[test]
    fn release_override_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"arbitrary_release": 0}}"#).unwrap();
        assert_eq!(
            load_protocol_config(Some(file.path())).unwrap(),
            ProtocolConfig::all_released()
        );
    }

    #[test]
    fn bad_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_protocol_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_protocol_config(Some(Path::new("/nonexistent/quill.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
