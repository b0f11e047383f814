use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::{finalize_stem, input_file_stem, missing_output, run_strategies, Separator};
use crate::audio::{duplicate_to_stereo, mix_stems, read_audio, write_audio};
use crate::error::{Result, SepError};
use crate::job::CancelToken;
use crate::params::JobParams;
use crate::tools;
use crate::types::{Engine, WavBitDepth};

/// Open-Unmix adapter. The backend always produces a full stem set plus an
/// optional residual; the instrumental track has to be synthesized:
/// residual when present, otherwise the sum of all non-vocal stems.
pub struct OpenUnmixSeparator;

impl OpenUnmixSeparator {
    pub fn new() -> Self {
        OpenUnmixSeparator
    }
}

impl Default for OpenUnmixSeparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Separator for OpenUnmixSeparator {
    fn engine(&self) -> Engine {
        Engine::OpenUnmix
    }

    fn run(
        &self,
        job: &JobParams,
        cancel: &CancelToken,
        progress: &dyn Fn(&str),
    ) -> Result<(PathBuf, PathBuf)> {
        let scratch = tempdir()?;

        // The model expects stereo input; duplicate mono sources before
        // handing them over.
        let (model_input, track_stem) = {
            let audio = read_audio(&job.input_path)?;
            if audio.channels == 1 {
                let stereo = duplicate_to_stereo(&audio);
                let staged = scratch.path().join("input.wav");
                write_audio(&staged, &stereo, WavBitDepth::Int16)?;
                (staged, "input".to_string())
            } else {
                (job.input_path.clone(), input_file_stem(job))
            }
        };

        let outdir = scratch.path().join("separated");
        // `--residual` takes the name to give the synthesized residual
        // source; the input path is a separate positional argument.
        let argv: Vec<String> = vec![
            tools::umx_bin(),
            "--model".into(),
            job.model.clone(),
            "--outdir".into(),
            outdir.to_string_lossy().into_owned(),
            "--residual".into(),
            "residual".into(),
            model_input.to_string_lossy().into_owned(),
        ];

        run_strategies("openunmix", &[argv])?;

        if cancel.is_canceled() {
            return Err(SepError::Canceled);
        }

        let track_dir = outdir.join(&track_stem);
        let vocals_src = track_dir.join("vocals.wav");
        if !vocals_src.exists() {
            return Err(missing_output("openunmix", scratch.path()));
        }

        let residual = track_dir.join("residual.wav");
        let instr_src = if residual.exists() {
            residual
        } else {
            let mut stems = Vec::new();
            for entry in fs::read_dir(&track_dir)? {
                let path = entry?.path();
                let is_wav = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
                if is_wav && path != vocals_src {
                    stems.push(read_audio(&path)?);
                }
            }
            if stems.is_empty() {
                return Err(missing_output("openunmix", scratch.path()));
            }

            let mix = mix_stems(&stems)?;
            let synthesized = track_dir.join("instrumental.wav");
            write_audio(&synthesized, &mix, WavBitDepth::Int16)?;
            synthesized
        };

        progress("Saving files");
        let vocals = finalize_stem(job, &vocals_src, "vocals", &job.vocals_dir)?;
        let instrumental = finalize_stem(job, &instr_src, "instrumental", &job.instrumental_dir)?;
        Ok((vocals, instrumental))
    }
}
