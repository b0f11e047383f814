//! Backend program resolution. Every external tool the adapters shell out
//! to can be redirected through a `STEMSEP_*` environment variable, which
//! is also how the tests substitute stub backends.

use std::{
    env,
    path::{Path, PathBuf},
};

fn from_env(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

pub fn spleeter_bin() -> String {
    from_env("STEMSEP_SPLEETER_BIN", "spleeter")
}

pub fn demucs_bin() -> String {
    from_env("STEMSEP_DEMUCS_BIN", "demucs")
}

pub fn umx_bin() -> String {
    from_env("STEMSEP_UMX_BIN", "umx")
}

pub fn whisper_bin() -> String {
    from_env("STEMSEP_WHISPER_BIN", "whisper")
}

pub fn coqui_bin() -> String {
    from_env("STEMSEP_COQUI_BIN", "stt")
}

pub fn ffmpeg_bin() -> String {
    from_env("STEMSEP_FFMPEG_BIN", "ffmpeg")
}

pub fn python_bin() -> String {
    from_env("STEMSEP_PYTHON_BIN", "python3")
}

/// Interpreter used for the Wav2Vec2 runner script. Defaults to the
/// configured Python.
pub fn wav2vec2_bin() -> String {
    env::var("STEMSEP_WAV2VEC2_BIN").unwrap_or_else(|_| python_bin())
}

pub fn wav2vec2_runner() -> PathBuf {
    env::var("STEMSEP_WAV2VEC2_RUNNER")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("tools")
                .join("wav2vec2_runner.py")
        })
}

pub fn coqui_model_dir() -> PathBuf {
    env::var("STEMSEP_COQUI_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("models/coqui"))
}
