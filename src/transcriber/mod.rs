//! Transcription engine adapters. Same boundary discipline as the
//! separators: `transcribe` never propagates an error, it logs the cause
//! and returns `false`. Each adapter owns a model cache keyed by model
//! name that lives as long as the adapter instance.

mod coqui;
mod wav2vec2;
mod whisper;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub use coqui::CoquiTranscriber;
pub use wav2vec2::Wav2Vec2Transcriber;
pub use whisper::WhisperTranscriber;

use crate::error::Result;
use crate::types::TranscriberKind;

pub trait Transcriber: Send {
    fn kind(&self) -> TranscriberKind;

    /// Transcribe `audio_path` into a plain-text file at `output_path`.
    /// Returns false on any failure.
    fn transcribe(&mut self, audio_path: &Path, output_path: &Path, model: &str) -> bool;
}

pub fn for_kind(kind: TranscriberKind) -> Box<dyn Transcriber> {
    match kind {
        TranscriberKind::Whisper => Box::new(WhisperTranscriber::new()),
        TranscriberKind::Wav2Vec2 => Box::new(Wav2Vec2Transcriber::new()),
        TranscriberKind::Coqui => Box::new(CoquiTranscriber::new()),
    }
}

/// Segment-level timing, for backends that expose it.
#[derive(Clone, Debug)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Per-adapter model cache: resolving/validating a model happens once per
/// name, the prepared value is reused for the rest of the adapter's life.
pub(crate) struct ModelCache<T> {
    entries: HashMap<String, T>,
}

impl<T> ModelCache<T> {
    pub(crate) fn new() -> Self {
        ModelCache {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get_or_try_insert(
        &mut self,
        name: &str,
        prepare: impl FnOnce() -> Result<T>,
    ) -> Result<&T> {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => Ok(e.insert(prepare()?)),
        }
    }
}

/// Common transcript file layout: header line, body, and a timestamped
/// breakdown when the backend provided segments.
pub(crate) fn write_transcript(
    output_path: &Path,
    header: &str,
    text: &str,
    segments: &[Segment],
) -> Result<()> {
    let mut file = File::create(output_path)?;
    writeln!(file, "{header}")?;
    writeln!(file, "{}", text.trim())?;

    if !segments.is_empty() {
        writeln!(file)?;
        writeln!(file, "Timestamps:")?;
        for seg in segments {
            writeln!(
                file,
                "{:.2}s - {:.2}s: {}",
                seg.start,
                seg.end,
                seg.text.trim()
            )?;
        }
    }

    Ok(())
}
