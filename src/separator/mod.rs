//! Separation engine adapters. Each backend hides its own CLI vocabulary,
//! output layout and naming scheme behind the [`Separator`] contract; the
//! job runner only ever sees normalized [`JobParams`] in and a
//! [`JobResult`] out.

mod demucs;
mod openunmix;
mod spleeter;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub use demucs::DemucsSeparator;
pub use openunmix::OpenUnmixSeparator;
pub use spleeter::SpleeterSeparator;

use crate::error::{Result, SepError};
use crate::job::CancelToken;
use crate::params::JobParams;
use crate::paths::{move_file, unique_dest};
use crate::transcode;
use crate::types::{Engine, JobResult};

pub trait Separator: Send + Sync {
    fn engine(&self) -> Engine;

    /// Backend-specific pipeline: invoke, locate artifacts, finalize.
    /// Returns the destination paths of (vocals, instrumental), or
    /// [`SepError::Canceled`] when the token was flipped before any file
    /// left the scratch dir.
    fn run(
        &self,
        job: &JobParams,
        cancel: &CancelToken,
        progress: &dyn Fn(&str),
    ) -> Result<(PathBuf, PathBuf)>;

    /// Adapter boundary: never propagates an error, always hands back a
    /// terminal `JobResult`.
    fn separate(
        &self,
        job: &JobParams,
        cancel: &CancelToken,
        progress: &dyn Fn(&str),
    ) -> JobResult {
        if !job.input_path.exists() {
            return JobResult::failed(SepError::MissingInput {
                path: job.input_path.display().to_string(),
            });
        }

        match self.run(job, cancel, progress) {
            Ok((vocals, instrumental)) => {
                log::info!(
                    "{}: separation of `{}` complete",
                    self.engine(),
                    job.base_name
                );
                JobResult::completed(vocals, instrumental)
            }
            Err(SepError::Canceled) => {
                log::info!("{}: job for `{}` canceled", self.engine(), job.base_name);
                JobResult::canceled()
            }
            Err(e) => {
                log::error!("{}: separation failed: {e}", self.engine());
                JobResult::failed(e)
            }
        }
    }
}

/// Lookup table dispatching an engine tag to its adapter. Adding an engine
/// means adding one arm here and one module above.
pub fn for_engine(engine: Engine) -> Box<dyn Separator> {
    match engine {
        Engine::Spleeter => Box::new(SpleeterSeparator::new()),
        Engine::Demucs => Box::new(DemucsSeparator::new()),
        Engine::OpenUnmix => Box::new(OpenUnmixSeparator::new()),
    }
}

/// Try each invocation strategy in order; the first success short-circuits.
/// All failures are folded into one `BackendInvocation` carrying the last
/// stderr seen.
pub(crate) fn run_strategies(tool: &str, strategies: &[Vec<String>]) -> Result<()> {
    let mut last_err = String::from("no invocation strategy available");

    for (i, argv) in strategies.iter().enumerate() {
        let (program, args) = match argv.split_first() {
            Some(split) => split,
            None => continue,
        };

        log::debug!("{tool}: strategy {}: `{}`", i + 1, argv.join(" "));
        match Command::new(program).args(args).output() {
            Ok(out) if out.status.success() => return Ok(()),
            Ok(out) => {
                last_err = String::from_utf8_lossy(&out.stderr).trim().to_string();
                if last_err.is_empty() {
                    last_err = format!("exited with {}", out.status);
                }
                log::warn!("{tool}: strategy {} failed: {last_err}", i + 1);
            }
            Err(e) => {
                last_err = format!("failed to launch `{program}`: {e}");
                log::warn!("{tool}: {last_err}");
            }
        }
    }

    Err(SepError::BackendInvocation {
        tool: tool.to_string(),
        detail: last_err,
    })
}

/// Two-level directory listing used for `BackendOutputMissing` diagnostics.
pub(crate) fn scratch_listing(dir: &Path) -> String {
    fn entries(dir: &Path, prefix: &str, out: &mut Vec<String>, depth: u8) {
        let Ok(read) = fs::read_dir(dir) else {
            return;
        };
        let mut names: Vec<_> = read.flatten().collect();
        names.sort_by_key(|e| e.file_name());
        for entry in names {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if path.is_dir() && depth > 0 {
                entries(&path, &format!("{prefix}{name}/"), out, depth - 1);
            } else {
                out.push(format!("{prefix}{name}"));
            }
        }
    }

    let mut out = Vec::new();
    entries(dir, "", &mut out, 2);
    if out.is_empty() {
        "<empty>".to_string()
    } else {
        out.join(", ")
    }
}

pub(crate) fn missing_output(tool: &str, scratch: &Path) -> SepError {
    SepError::BackendOutputMissing {
        tool: tool.to_string(),
        dir: scratch.display().to_string(),
        listing: scratch_listing(scratch),
    }
}

/// Re-encode if needed, then move a stem into its collision-free
/// destination. `stem_label` is "vocals" or "instrumental".
pub(crate) fn finalize_stem(
    job: &JobParams,
    src: &Path,
    stem_label: &str,
    dest_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir)?;
    let ext = job.output_format.extension();

    let final_src = if transcode::needs_transcode(src, job.output_format, job.sample_rate)? {
        let encoded = src.with_file_name(format!("{stem_label}_encoded.{ext}"));
        transcode::transcode(
            src,
            &encoded,
            job.output_format,
            job.sample_rate,
            job.bitrate,
            job.bit_depth,
        )?;
        encoded
    } else {
        src.to_path_buf()
    };

    let dest = unique_dest(
        dest_dir,
        &format!("{}_{stem_label}", job.output_stem_prefix()),
        ext,
    );
    move_file(&final_src, &dest)?;
    Ok(dest)
}

pub(crate) fn input_file_stem(job: &JobParams) -> String {
    job.input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
