use std::path::PathBuf;

use tempfile::tempdir;

use super::{finalize_stem, input_file_stem, missing_output, run_strategies, Separator};
use crate::error::{Result, SepError};
use crate::job::CancelToken;
use crate::params::JobParams;
use crate::tools;
use crate::types::{Engine, OutputFormat};

/// Spleeter adapter. Fixed 2-stem model producing `vocals` and
/// `accompaniment`; when the CLI's own codec path does not deliver the
/// requested format, the wav artifacts are re-encoded instead.
pub struct SpleeterSeparator;

impl SpleeterSeparator {
    pub fn new() -> Self {
        SpleeterSeparator
    }
}

impl Default for SpleeterSeparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Separator for SpleeterSeparator {
    fn engine(&self) -> Engine {
        Engine::Spleeter
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
        let codec = job.output_format.extension();

        let mut args: Vec<String> = vec![
            "separate".into(),
            "-p".into(),
            format!("spleeter:{}", job.model),
            "-o".into(),
            scratch_str,
            "-c".into(),
            codec.into(),
        ];
        if job.output_format == OutputFormat::Mp3 {
            if let Some(bitrate) = job.bitrate {
                args.push("-b".into());
                args.push(format!("{bitrate}k"));
            }
        }
        args.push(input_str);

        // The installed entry point first, the module form as fallback.
        let mut primary = vec![tools::spleeter_bin()];
        primary.extend(args.iter().cloned());
        let mut fallback = vec![tools::python_bin(), "-m".into(), "spleeter".into()];
        fallback.extend(args.iter().cloned());

        run_strategies("spleeter", &[primary, fallback])?;

        if cancel.is_canceled() {
            return Err(SepError::Canceled);
        }

        let track_dir = scratch.path().join(input_file_stem(job));
        // Prefer the codec we asked for; fall back to the wav artifacts
        // and let finalize_stem re-encode.
        let find = |stem: &str| -> Option<PathBuf> {
            for ext in [codec, "wav"] {
                let candidate = track_dir.join(format!("{stem}.{ext}"));
                if candidate.exists() {
                    return Some(candidate);
                }
            }
            None
        };

        let vocals_src = find("vocals").ok_or_else(|| missing_output("spleeter", scratch.path()))?;
        let instr_src =
            find("accompaniment").ok_or_else(|| missing_output("spleeter", scratch.path()))?;

        progress("Saving files");
        let vocals = finalize_stem(job, &vocals_src, "vocals", &job.vocals_dir)?;
        let instrumental = finalize_stem(job, &instr_src, "instrumental", &job.instrumental_dir)?;
        Ok((vocals, instrumental))
    }
}
