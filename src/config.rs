//! Small persisted configuration record: folder locations plus the last
//! engine/format choices made on the control surface.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SepError};
use crate::types::{Engine, OutputFormat};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub vocals_dir: PathBuf,
    pub instrumental_dir: PathBuf,
    pub transcription_dir: PathBuf,
    pub engine: Engine,
    pub output_format: OutputFormat,
    pub transcribe: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input_dir: PathBuf::from("input"),
            vocals_dir: PathBuf::from("output/vocals"),
            instrumental_dir: PathBuf::from("output/instrumentals"),
            transcription_dir: PathBuf::from("output/text"),
            engine: Engine::Spleeter,
            output_format: OutputFormat::Wav,
            transcribe: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "StemSep", "stemsep-core")
        .ok_or(SepError::ConfigDirUnavailable)?;
    Ok(proj.config_dir().join("config.json"))
}

/// Load the stored configuration, falling back to defaults when none has
/// been saved yet.
pub fn load() -> Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save(config: &AppConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(config)?)?;
    log::debug!("config saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_roundtrips_through_json() {
        let mut config = AppConfig::default();
        config.engine = Engine::Demucs;
        config.output_format = OutputFormat::Flac;
        config.transcribe = true;

        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.engine, Engine::Demucs);
        assert_eq!(back.output_format, OutputFormat::Flac);
        assert!(back.transcribe);
        assert_eq!(back.vocals_dir, PathBuf::from("output/vocals"));
    }

    #[test]
    fn unknown_engine_name_fails_to_parse() {
        let err = serde_json::from_str::<Engine>("\"splitter\"");
        assert!(err.is_err());
    }
}
