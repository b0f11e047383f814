use std::path::{Path, PathBuf};

use crate::error::{Result, SepError};
use crate::paths::sanitize_base_name;
use crate::registry;
use crate::types::{Engine, OutputFormat, TranscriberKind, WavBitDepth};

/// Transcription step requested alongside a separation job.
#[derive(Clone, Debug)]
pub struct TranscriptionRequest {
    pub engine: TranscriberKind,
    pub model: String,
}

impl TranscriptionRequest {
    pub fn new(engine: TranscriberKind) -> Result<Self> {
        Ok(TranscriptionRequest {
            engine,
            model: registry::default_transcriber_model(engine)?,
        })
    }
}

/// Engine-agnostic description of one separation request. Built fresh per
/// invocation from control-surface state; normalized and validated by the
/// job runner before any backend is touched.
#[derive(Clone, Debug)]
pub struct JobParams {
    pub input_path: PathBuf,
    /// Input file name without extension, sanitized for reuse in output
    /// file names.
    pub base_name: String,
    pub engine: Engine,
    pub model: String,
    pub output_format: OutputFormat,
    /// Meaningful for wav/flac output only.
    pub sample_rate: Option<u32>,
    /// Meaningful for mp3 output only, in kbit/s.
    pub bitrate: Option<u32>,
    /// Demucs wav output only: Int24 or Float32, defaulting to Int24.
    /// Cleared for every other (engine, format) combination.
    pub bit_depth: Option<WavBitDepth>,
    /// Meaningful for mp3 output on Demucs only.
    pub mp3_preset: Option<u32>,
    /// Demucs quality/time tradeoff knob.
    pub shift_count: Option<u32>,
    pub vocals_dir: PathBuf,
    pub instrumental_dir: PathBuf,
    pub transcription_dir: PathBuf,
    pub transcription: Option<TranscriptionRequest>,
}

impl JobParams {
    /// Build a request for one input file with the engine's default model
    /// and wav output. Tuning knobs start cleared.
    pub fn for_file<P: AsRef<Path>>(
        input_path: P,
        engine: Engine,
        vocals_dir: PathBuf,
        instrumental_dir: PathBuf,
        transcription_dir: PathBuf,
    ) -> Result<Self> {
        let input_path = input_path.as_ref().to_path_buf();
        let base_name = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(sanitize_base_name)
            .unwrap_or_else(|| "output".to_string());

        Ok(JobParams {
            input_path,
            base_name,
            engine,
            model: registry::default_model(engine)?,
            output_format: OutputFormat::Wav,
            sample_rate: None,
            bitrate: None,
            bit_depth: None,
            mp3_preset: None,
            shift_count: None,
            vocals_dir,
            instrumental_dir,
            transcription_dir,
            transcription: None,
        })
    }

    /// `{base_name}{engine suffix}` — the prefix every output file of this
    /// job shares.
    pub fn output_stem_prefix(&self) -> String {
        format!("{}{}", self.base_name, self.engine.suffix())
    }

    /// Clear every knob that is meaningless for the current
    /// (engine, format) combination. Bad combinations are downgraded with a
    /// warning, never rejected.
    pub fn normalize(&mut self) {
        if self.output_format != OutputFormat::Mp3 {
            if self.bitrate.take().is_some() {
                log::warn!("bitrate is only used for mp3 output, ignoring");
            }
            if self.mp3_preset.take().is_some() {
                log::warn!("mp3 preset is only used for mp3 output, ignoring");
            }
        }

        if self.output_format == OutputFormat::Mp3 && self.sample_rate.take().is_some() {
            log::warn!("sample rate is only used for wav/flac output, ignoring");
        }

        if self.output_format != OutputFormat::Wav {
            if self.bit_depth.take().is_some() {
                log::warn!(
                    "{}",
                    SepError::UnsupportedFormat(format!(
                        "bit depth on {} output, ignoring",
                        self.output_format
                    ))
                );
            }
        } else if self.engine == Engine::Demucs {
            // Demucs wav output is 24-bit int xor 32-bit float.
            match self.bit_depth {
                None | Some(WavBitDepth::Int16) => {
                    if self.bit_depth.is_some() {
                        log::warn!("demucs wav output is int24 or float32, using int24");
                    }
                    self.bit_depth = Some(WavBitDepth::Int24);
                }
                Some(_) => {}
            }
        } else if self.bit_depth.take().is_some() {
            // The other backends write their own fixed depth and nothing
            // downstream re-encodes at the native sample rate.
            log::warn!("bit depth is only honored by demucs, ignoring");
        }

        if self.engine != Engine::Demucs && self.shift_count.take().is_some() {
            log::warn!("shift count is a demucs-only option, ignoring");
        }
    }

    /// Reject anything that must not reach a backend: missing input,
    /// unknown model names.
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(SepError::MissingInput {
                path: self.input_path.display().to_string(),
            });
        }

        registry::validate_model(self.engine, &self.model)?;

        if let Some(req) = &self.transcription {
            registry::validate_transcriber_model(req.engine, &req.model)?;
        }

        Ok(())
    }
}
