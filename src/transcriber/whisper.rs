use std::fs::File;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tempfile::tempdir;

use super::{write_transcript, ModelCache, Segment, Transcriber};
use crate::error::{Result, SepError};
use crate::registry;
use crate::tools;
use crate::types::TranscriberKind;

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

struct WhisperModel {
    name: String,
}

/// Whisper adapter. The CLI writes a JSON result next to its text output;
/// we parse that to get segment timing for the transcript breakdown.
pub struct WhisperTranscriber {
    models: ModelCache<WhisperModel>,
}

impl WhisperTranscriber {
    pub fn new() -> Self {
        WhisperTranscriber {
            models: ModelCache::new(),
        }
    }

    fn run(&mut self, audio_path: &Path, output_path: &Path, model: &str) -> Result<()> {
        if !audio_path.exists() {
            return Err(SepError::MissingInput {
                path: audio_path.display().to_string(),
            });
        }

        let model = self.models.get_or_try_insert(model, || {
            registry::validate_transcriber_model(TranscriberKind::Whisper, model)?;
            log::info!("whisper: model `{model}` ready");
            Ok(WhisperModel {
                name: model.to_string(),
            })
        })?;
        let model_name = model.name.clone();

        let scratch = tempdir()?;
        let output = Command::new(tools::whisper_bin())
            .arg(audio_path)
            .arg("--model")
            .arg(&model_name)
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(scratch.path())
            .output()
            .map_err(|e| SepError::BackendInvocation {
                tool: "whisper".to_string(),
                detail: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(SepError::BackendInvocation {
                tool: "whisper".to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stem = audio_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let json_path = scratch.path().join(format!("{stem}.json"));
        if !json_path.exists() {
            return Err(SepError::BackendOutputMissing {
                tool: "whisper".to_string(),
                dir: scratch.path().display().to_string(),
                listing: crate::separator::scratch_listing(scratch.path()),
            });
        }

        let parsed: WhisperOutput = serde_json::from_reader(File::open(&json_path)?)?;
        if parsed.text.trim().is_empty() {
            return Err(SepError::Transcription(
                "whisper returned an empty transcript".to_string(),
            ));
        }
        let segments: Vec<Segment> = parsed
            .segments
            .into_iter()
            .map(|s| Segment {
                start: s.start,
                end: s.end,
                text: s.text,
            })
            .collect();

        write_transcript(
            output_path,
            &format!("Transcription (Model: {model_name}):"),
            &parsed.text,
            &segments,
        )
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for WhisperTranscriber {
    fn kind(&self) -> TranscriberKind {
        TranscriberKind::Whisper
    }

    fn transcribe(&mut self, audio_path: &Path, output_path: &Path, model: &str) -> bool {
        match self.run(audio_path, output_path, model) {
            Ok(()) => {
                log::info!("whisper: transcript saved to {:?}", output_path);
                true
            }
            Err(e) => {
                log::error!("whisper: {e}");
                false
            }
        }
    }
}
