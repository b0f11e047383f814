//! # stemsep-core
//!
//! Core orchestration for audio stem separation: a uniform contract over
//! interchangeable separation backends (Spleeter, Demucs, Open-Unmix) and
//! transcription backends (Whisper, Wav2Vec2, Coqui), parameter
//! normalization, output-file reconciliation, and an asynchronous job
//! runner that keeps the control surface responsive while a multi-minute
//! backend call runs.

pub mod audio;
pub mod catalog;
pub mod config;
mod error;
pub mod job;
pub mod params;
pub mod paths;
pub mod registry;
pub mod separator;
pub mod tools;
pub mod transcode;
pub mod transcriber;
pub mod types;

pub use crate::{
    error::{Result, SepError},
    job::{CancelToken, JobEvents, JobHandle, JobRunner},
    params::{JobParams, TranscriptionRequest},
    types::{AudioData, Engine, JobResult, OutputFormat, TranscriberKind, WavBitDepth},
};
