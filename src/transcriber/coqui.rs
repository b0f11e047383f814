use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;

use super::{write_transcript, ModelCache, Transcriber};
use crate::audio::{downmix_to_mono, read_audio, resample, write_audio};
use crate::error::{Result, SepError};
use crate::registry;
use crate::tools;
use crate::types::{AudioData, TranscriberKind, WavBitDepth};

const MODEL_RATE: u32 = 16_000;

struct CoquiModel {
    model_path: PathBuf,
    scorer_path: Option<PathBuf>,
}

/// Coqui STT adapter. Models are plain files on disk
/// (`{model_dir}/{name}/model.pbmm`, optional `model.scorer`); resolving
/// them once per name is the expensive part worth caching.
pub struct CoquiTranscriber {
    models: ModelCache<CoquiModel>,
}

impl CoquiTranscriber {
    pub fn new() -> Self {
        CoquiTranscriber {
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
            registry::validate_transcriber_model(TranscriberKind::Coqui, model)?;
            let dir = tools::coqui_model_dir().join(model);
            let model_path = dir.join("model.pbmm");
            if !model_path.exists() {
                return Err(SepError::BackendInvocation {
                    tool: "coqui".to_string(),
                    detail: format!(
                        "model not found at {} (download one from https://coqui.ai/models)",
                        model_path.display()
                    ),
                });
            }
            let scorer = dir.join("model.scorer");
            let scorer_path = scorer.exists().then_some(scorer);
            log::info!("coqui: model loaded from {:?}", model_path);
            Ok(CoquiModel {
                model_path,
                scorer_path,
            })
        })?;
        let (model_path, scorer_path) = (model.model_path.clone(), model.scorer_path.clone());

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

        let mut cmd = Command::new(tools::coqui_bin());
        cmd.arg("--model").arg(&model_path);
        if let Some(scorer) = &scorer_path {
            cmd.arg("--scorer").arg(scorer);
        }
        cmd.arg("--audio").arg(&staged);

        let output = cmd.output().map_err(|e| SepError::BackendInvocation {
            tool: "coqui".to_string(),
            detail: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(SepError::BackendInvocation {
                tool: "coqui".to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(SepError::Transcription(
                "coqui returned an empty transcript".to_string(),
            ));
        }

        write_transcript(output_path, "Transcription (Coqui STT):", &text, &[])
    }
}

impl Default for CoquiTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for CoquiTranscriber {
    fn kind(&self) -> TranscriberKind {
        TranscriberKind::Coqui
    }

    fn transcribe(&mut self, audio_path: &Path, output_path: &Path, model: &str) -> bool {
        match self.run(audio_path, output_path, model) {
            Ok(()) => {
                log::info!("coqui: transcript saved to {:?}", output_path);
                true
            }
            Err(e) => {
                log::error!("coqui: {e}");
                false
            }
        }
    }
}
