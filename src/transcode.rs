//! Generic audio transcoding used when a backend's native output does not
//! already match the requested format. Wav targets are handled in-process
//! (decode, resample, re-encode); mp3/flac targets go through ffmpeg.

use std::path::Path;
use std::process::Command;

use crate::audio::{probe_sample_rate, read_audio, resample, write_audio};
use crate::error::{Result, SepError};
use crate::tools;
use crate::types::{OutputFormat, WavBitDepth};

/// Whether `src` already satisfies the requested format and sample rate.
pub fn needs_transcode(
    src: &Path,
    format: OutputFormat,
    sample_rate: Option<u32>,
) -> Result<bool> {
    let src_ext = src
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if src_ext != format.extension() {
        return Ok(true);
    }

    if let Some(rate) = sample_rate {
        if matches!(format, OutputFormat::Wav | OutputFormat::Flac)
            && probe_sample_rate(src)? != Some(rate)
        {
            return Ok(true);
        }
    }

    Ok(false)
}

pub fn transcode(
    src: &Path,
    dst: &Path,
    format: OutputFormat,
    sample_rate: Option<u32>,
    bitrate: Option<u32>,
    bit_depth: Option<WavBitDepth>,
) -> Result<()> {
    log::debug!("transcoding {:?} -> {:?} as {}", src, dst, format);
    match format {
        OutputFormat::Wav => {
            let audio = read_audio(src)?;
            let audio = match sample_rate {
                Some(rate) if rate != audio.sample_rate => resample(&audio, rate)?,
                _ => audio,
            };
            write_audio(dst, &audio, bit_depth.unwrap_or(WavBitDepth::Int16))?;
            Ok(())
        }
        OutputFormat::Mp3 | OutputFormat::Flac => {
            let mut cmd = Command::new(tools::ffmpeg_bin());
            cmd.arg("-y").arg("-i").arg(src);
            if let Some(rate) = sample_rate {
                cmd.arg("-ar").arg(rate.to_string());
            }
            if format == OutputFormat::Mp3 {
                if let Some(b) = bitrate {
                    cmd.arg("-b:a").arg(format!("{b}k"));
                }
            }
            cmd.arg(dst);

            let output = cmd.output().map_err(|e| SepError::BackendInvocation {
                tool: "ffmpeg".to_string(),
                detail: e.to_string(),
            })?;
            if !output.status.success() {
                return Err(SepError::BackendInvocation {
                    tool: "ffmpeg".to_string(),
                    detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            Ok(())
        }
    }
}
