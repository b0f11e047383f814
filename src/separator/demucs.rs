use std::path::PathBuf;

use tempfile::tempdir;

use super::{finalize_stem, input_file_stem, missing_output, run_strategies, Separator};
use crate::error::{Result, SepError};
use crate::job::CancelToken;
use crate::params::JobParams;
use crate::tools;
use crate::types::{Engine, OutputFormat, WavBitDepth};

/// Demucs adapter. `--two-stems=vocals` yields `vocals` and `no_vocals`;
/// mp3/flac encoding and wav bit depth are handled natively by the
/// backend, so only sample-rate changes require a re-encode pass.
pub struct DemucsSeparator;

impl DemucsSeparator {
    pub fn new() -> Self {
        DemucsSeparator
    }
}

impl Default for DemucsSeparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Separator for DemucsSeparator {
    fn engine(&self) -> Engine {
        Engine::Demucs
    }

    fn run(
        &self,
        job: &JobParams,
        cancel: &CancelToken,
        progress: &dyn Fn(&str),
    ) -> Result<(PathBuf, PathBuf)> {
        let scratch = tempdir()?;
        let scratch_str = scratch.path().to_string_lossy().into_owned();
        let input_str = job.input_path.to_string_lossy().into_owned();

        let mut args: Vec<String> = vec![
            "--two-stems=vocals".into(),
            "-n".into(),
            job.model.clone(),
            "-o".into(),
            scratch_str,
        ];

        // Native extension of the artifacts demucs will write.
        let native_ext = match job.output_format {
            OutputFormat::Mp3 => {
                args.push("--mp3".into());
                if let Some(bitrate) = job.bitrate {
                    args.push("--mp3-bitrate".into());
                    args.push(bitrate.to_string());
                }
                if let Some(preset) = job.mp3_preset {
                    args.push("--mp3-preset".into());
                    args.push(preset.to_string());
                }
                "mp3"
            }
            OutputFormat::Flac => {
                args.push("--flac".into());
                "flac"
            }
            OutputFormat::Wav => {
                // 24-bit int xor 32-bit float; normalization guarantees
                // the default is already filled in.
                match job.bit_depth.unwrap_or(WavBitDepth::Int24) {
                    WavBitDepth::Float32 => args.push("--float32".into()),
                    _ => args.push("--int24".into()),
                }
                "wav"
            }
        };

        if let Some(shifts) = job.shift_count {
            args.push("--shifts".into());
            args.push(shifts.to_string());
        }
        args.push(input_str);

        let mut primary = vec![tools::demucs_bin()];
        primary.extend(args.iter().cloned());
        let mut fallback = vec![tools::python_bin(), "-m".into(), "demucs".into()];
        fallback.extend(args.iter().cloned());

        run_strategies("demucs", &[primary, fallback])?;

        if cancel.is_canceled() {
            return Err(SepError::Canceled);
        }

        // Layout: {scratch}/{model}/{track}/vocals.{ext}
        let track_dir = scratch
            .path()
            .join(&job.model)
            .join(input_file_stem(job));
        let vocals_src = track_dir.join(format!("vocals.{native_ext}"));
        let instr_src = track_dir.join(format!("no_vocals.{native_ext}"));
        if !vocals_src.exists() || !instr_src.exists() {
            return Err(missing_output("demucs", scratch.path()));
        }

        progress("Saving files");
        let vocals = finalize_stem(job, &vocals_src, "vocals", &job.vocals_dir)?;
        let instrumental = finalize_stem(job, &instr_src, "instrumental", &job.instrumental_dir)?;
        Ok((vocals, instrumental))
    }
}
