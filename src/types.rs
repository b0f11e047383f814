use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SepError;

/// Raw interleaved audio samples plus their layout.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Separation backend selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Spleeter,
    Demucs,
    OpenUnmix,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::Spleeter, Engine::Demucs, Engine::OpenUnmix];

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Spleeter => "spleeter",
            Engine::Demucs => "demucs",
            Engine::OpenUnmix => "openunmix",
        }
    }

    /// Short tag appended to output file names so several engines can share
    /// one destination folder.
    pub fn suffix(&self) -> &'static str {
        match self {
            Engine::Spleeter => "_S",
            Engine::Demucs => "_D",
            Engine::OpenUnmix => "_O",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transcription backend selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriberKind {
    Whisper,
    Wav2Vec2,
    Coqui,
}

impl TranscriberKind {
    pub const ALL: [TranscriberKind; 3] = [
        TranscriberKind::Whisper,
        TranscriberKind::Wav2Vec2,
        TranscriberKind::Coqui,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TranscriberKind::Whisper => "whisper",
            TranscriberKind::Wav2Vec2 => "wav2vec2",
            TranscriberKind::Coqui => "coqui",
        }
    }
}

impl fmt::Display for TranscriberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
    Mp3,
    Flac,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Flac => "flac",
        }
    }

    /// Lenient name lookup for values coming from config/UI strings.
    /// Unknown names fall back to wav with a warning, never an error.
    pub fn from_name(name: &str) -> OutputFormat {
        match name.to_ascii_lowercase().as_str() {
            "wav" => OutputFormat::Wav,
            "mp3" => OutputFormat::Mp3,
            "flac" => OutputFormat::Flac,
            other => {
                log::warn!(
                    "{}",
                    SepError::UnsupportedFormat(format!("`{other}`, defaulting to wav"))
                );
                OutputFormat::Wav
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// WAV sample encoding. Demucs only distinguishes 24-bit int and 32-bit
/// float; 16-bit int is what the re-encode path writes by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavBitDepth {
    Int16,
    Int24,
    Float32,
}

/// Outcome of one separation job. `error` is present iff `success` is
/// false; a canceled job reports `success: false` with [`SepError::Canceled`].
#[derive(Debug)]
pub struct JobResult {
    pub success: bool,
    pub vocals_path: Option<PathBuf>,
    pub instrumental_path: Option<PathBuf>,
    pub transcription_path: Option<PathBuf>,
    pub error: Option<SepError>,
}

impl JobResult {
    pub fn completed(vocals_path: PathBuf, instrumental_path: PathBuf) -> Self {
        JobResult {
            success: true,
            vocals_path: Some(vocals_path),
            instrumental_path: Some(instrumental_path),
            transcription_path: None,
            error: None,
        }
    }

    pub fn failed(error: SepError) -> Self {
        JobResult {
            success: false,
            vocals_path: None,
            instrumental_path: None,
            transcription_path: None,
            error: Some(error),
        }
    }

    pub fn canceled() -> Self {
        JobResult::failed(SepError::Canceled)
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self.error, Some(SepError::Canceled))
    }
}
