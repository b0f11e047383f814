use std::{fs::File, path::Path};

use anyhow::{ensure, Context, Result};
use hound::WavWriter;
use rubato::{FftFixedInOut, Resampler};
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::types::{AudioData, WavBitDepth};

pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path: &Path = path.as_ref();

    let file: File =
        File::open(path).with_context(|| format!("Failed to open audio file: {:?}", path))?;

    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format.default_track().context("No default track found")?;

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate: u32 = 0;
    let mut channels: u16 = 0;

    while let Ok(packet) = format.next_packet() {
        let decoded = decoder.decode(&packet)?;
        sample_rate = decoded.spec().rate;
        channels = decoded.spec().channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        samples.extend_from_slice(buffer.samples());
    }

    log::debug!(
        "read audio {:?}: sample_rate={}, channels={}, samples={}",
        path,
        sample_rate,
        channels,
        samples.len()
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}

/// Read only the container/codec header and report the declared sample rate.
/// Cheaper than decoding when all we need is a format check.
pub fn probe_sample_rate<P: AsRef<Path>>(path: P) -> Result<Option<u32>> {
    let path: &Path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open audio file: {:?}", path))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let track = probed
        .format
        .default_track()
        .context("No default track found")?;
    Ok(track.codec_params.sample_rate)
}

pub fn write_audio<P: AsRef<Path>>(path: P, audio: &AudioData, depth: WavBitDepth) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: match depth {
            WavBitDepth::Int16 => 16,
            WavBitDepth::Int24 => 24,
            WavBitDepth::Float32 => 32,
        },
        sample_format: match depth {
            WavBitDepth::Float32 => hound::SampleFormat::Float,
            _ => hound::SampleFormat::Int,
        },
    };

    let mut writer = WavWriter::create(path, spec)?;
    match depth {
        WavBitDepth::Int16 => {
            for sample in &audio.samples {
                let s = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
                writer.write_sample(s)?;
            }
        }
        WavBitDepth::Int24 => {
            const MAX_24: f32 = 8_388_607.0;
            for sample in &audio.samples {
                let s = (sample * MAX_24).clamp(-MAX_24 - 1.0, MAX_24) as i32;
                writer.write_sample(s)?;
            }
        }
        WavBitDepth::Float32 => {
            for sample in &audio.samples {
                writer.write_sample(*sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| chunk.iter().copied().sum::<f32>() / channels as f32)
        .collect()
}

/// Duplicate a mono signal into both stereo channels. Stereo input is
/// returned unchanged.
pub fn duplicate_to_stereo(audio: &AudioData) -> AudioData {
    if audio.channels != 1 {
        return audio.clone();
    }

    let mut samples = Vec::with_capacity(audio.samples.len() * 2);
    for s in &audio.samples {
        samples.push(*s);
        samples.push(*s);
    }

    AudioData {
        samples,
        sample_rate: audio.sample_rate,
        channels: 2,
    }
}

/// Sum a set of stems into one signal, clamped to [-1, 1]. All stems must
/// share one layout; shorter stems are treated as zero-padded.
pub fn mix_stems(stems: &[AudioData]) -> Result<AudioData> {
    let first = stems.first().context("no stems to mix")?;
    for stem in stems {
        ensure!(
            stem.sample_rate == first.sample_rate && stem.channels == first.channels,
            "stem layout mismatch: {}Hz/{}ch vs {}Hz/{}ch",
            stem.sample_rate,
            stem.channels,
            first.sample_rate,
            first.channels
        );
    }

    let len = stems.iter().map(|s| s.samples.len()).max().unwrap_or(0);
    let mut out = vec![0f32; len];
    for stem in stems {
        for (acc, s) in out.iter_mut().zip(stem.samples.iter()) {
            *acc += s;
        }
    }
    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }

    Ok(AudioData {
        samples: out,
        sample_rate: first.sample_rate,
        channels: first.channels,
    })
}

const RESAMPLE_BLOCK: usize = 1024;

/// Whole-file sample-rate conversion (FFT-based, fixed input blocks).
pub fn resample(audio: &AudioData, target_rate: u32) -> Result<AudioData> {
    if audio.sample_rate == target_rate || audio.samples.is_empty() {
        let mut out = audio.clone();
        out.sample_rate = target_rate;
        return Ok(out);
    }

    let channels = audio.channels.max(1) as usize;
    let frames = audio.samples.len() / channels;

    // Deinterleave into planar buffers for rubato.
    let mut planar: Vec<Vec<f32>> = vec![Vec::with_capacity(frames); channels];
    for frame in audio.samples.chunks_exact(channels) {
        for (ch, s) in frame.iter().enumerate() {
            planar[ch].push(*s);
        }
    }

    let mut resampler = FftFixedInOut::<f32>::new(
        audio.sample_rate as usize,
        target_rate as usize,
        RESAMPLE_BLOCK,
        channels,
    )?;

    let mut output_buffer = resampler.output_buffer_allocate(true);
    let mut out_planar: Vec<Vec<f32>> = vec![Vec::new(); channels];

    let mut pos = 0usize;
    while pos < frames {
        let needed = resampler.input_frames_next();
        let end = (pos + needed).min(frames);

        let mut input: Vec<Vec<f32>> = Vec::with_capacity(channels);
        for plane in &planar {
            let mut block = plane[pos..end].to_vec();
            block.resize(needed, 0.0); // zero-pad the final partial block
            input.push(block);
        }

        let (_, written) = resampler.process_into_buffer(&input, &mut output_buffer, None)?;
        for (out, buf) in out_planar.iter_mut().zip(output_buffer.iter()) {
            out.extend_from_slice(&buf[..written]);
        }

        pos += needed;
    }

    let out_frames = out_planar.first().map(|p| p.len()).unwrap_or(0);
    let mut samples = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        for plane in &out_planar {
            samples.push(plane[i]);
        }
    }

    Ok(AudioData {
        samples,
        sample_rate: target_rate,
        channels: audio.channels,
    })
}
