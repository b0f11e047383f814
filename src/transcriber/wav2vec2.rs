use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;

use super::{write_transcript, ModelCache, Transcriber};
use crate::audio::{downmix_to_mono, read_audio, resample, write_audio};
use crate::error::{Result, SepError};
use crate::registry;
use crate::tools;
use crate::types::{AudioData, TranscriberKind, WavBitDepth};

// The acoustic models are trained on 16 kHz audio.
const MODEL_RATE: u32 = 16_000;

struct Wav2Vec2Model {
    name: String,
    runner: PathBuf,
}

/// Wav2Vec2 adapter. Input is downmixed and resampled to the model rate
/// in-process, then handed to the bundled Python runner which prints the
/// transcript on stdout.
pub struct Wav2Vec2Transcriber {
    models: ModelCache<Wav2Vec2Model>,
}

impl Wav2Vec2Transcriber {
    pub fn new() -> Self {
        Wav2Vec2Transcriber {
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
            registry::validate_transcriber_model(TranscriberKind::Wav2Vec2, model)?;
            let runner = tools::wav2vec2_runner();
            if !runner.exists() {
                return Err(SepError::BackendInvocation {
                    tool: "wav2vec2".to_string(),
                    detail: format!("runner script not found at {}", runner.display()),
                });
            }
            log::info!("wav2vec2: model `{model}` ready");
            Ok(Wav2Vec2Model {
                name: model.to_string(),
                runner,
            })
        })?;
        let (model_name, runner) = (model.name.clone(), model.runner.clone());

        let audio = read_audio(audio_path)?;
        let mono = AudioData {
            samples: downmix_to_mono(&audio.samples, audio.channels),
            sample_rate: audio.sample_rate,
            channels: 1,
        };
        let resampled = resample(&mono, MODEL_RATE)?;

        let scratch = tempdir()?;
        let staged = scratch.path().join("input_16k.wav");
        write_audio(&staged, &resampled, WavBitDepth::Int16)?;

        let output = Command::new(tools::wav2vec2_bin())
            .arg(&runner)
            .arg("--model")
            .arg(&model_name)
            .arg("--audio")
            .arg(&staged)
            .output()
            .map_err(|e| SepError::BackendInvocation {
                tool: "wav2vec2".to_string(),
                detail: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(SepError::BackendInvocation {
                tool: "wav2vec2".to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(SepError::Transcription(
                "wav2vec2 returned an empty transcript".to_string(),
            ));
        }

        write_transcript(output_path, "Transcription (Wav2Vec2):", &text, &[])
    }
}

impl Default for Wav2Vec2Transcriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for Wav2Vec2Transcriber {
    fn kind(&self) -> TranscriberKind {
        TranscriberKind::Wav2Vec2
    }

    fn transcribe(&mut self, audio_path: &Path, output_path: &Path, model: &str) -> bool {
        match self.run(audio_path, output_path, model) {
            Ok(()) => {
                log::info!("wav2vec2: transcript saved to {:?}", output_path);
                true
            }
            Err(e) => {
                log::error!("wav2vec2: {e}");
                false
            }
        }
    }
}
