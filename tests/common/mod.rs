#![allow(dead_code)]

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use stemsep_core::types::{AudioData, WavBitDepth};

/// Tests that touch `STEMSEP_*`/`TMPDIR` env vars share one process; this
/// lock keeps them from racing each other.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _ = env_logger::builder().is_test(true).try_init();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write an executable /bin/sh stub standing in for a backend binary.
#[cfg(unix)]
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Short stereo (or mono) sine fixture.
pub fn write_test_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) {
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        for ch in 0..channels {
            let freq = 440.0 + 220.0 * ch as f32;
            samples.push((2.0 * PI * freq * t).sin() * 0.2);
        }
    }
    let audio = AudioData {
        samples,
        sample_rate,
        channels,
    };
    stemsep_core::audio::write_audio(path, &audio, WavBitDepth::Int16).unwrap();
}

/// Stub spleeter: copies the input into `vocals.{codec}` and
/// `accompaniment.{codec}` under `-o`'s track folder.
pub const SPLEETER_STUB: &str = r#"out=""
codec="wav"
prev=""
input=""
for a in "$@"; do
  case "$prev" in
    -o) out="$a" ;;
    -c) codec="$a" ;;
  esac
  prev="$a"
  input="$a"
done
base=$(basename "$input")
base="${base%.*}"
mkdir -p "$out/$base"
cp "$input" "$out/$base/vocals.$codec"
cp "$input" "$out/$base/accompaniment.$codec""#;

/// Stub demucs: honors `-n`, `-o`, `--mp3`/`--flac`, writes
/// `vocals`/`no_vocals` under the model/track folder.
pub const DEMUCS_STUB: &str = r#"out=""
model="mdx"
ext="wav"
prev=""
input=""
for a in "$@"; do
  case "$prev" in
    -n) model="$a" ;;
    -o) out="$a" ;;
  esac
  case "$a" in
    --mp3) ext="mp3" ;;
    --flac) ext="flac" ;;
  esac
  prev="$a"
  input="$a"
done
base=$(basename "$input")
base="${base%.*}"
mkdir -p "$out/$model/$base"
cp "$input" "$out/$model/$base/vocals.$ext"
cp "$input" "$out/$model/$base/no_vocals.$ext""#;

/// Stub umx writing the full stem set plus the residual named by
/// `--residual`'s value. Like the real CLI's argument parser, `--residual`
/// consumes the next token and a positional input file is required.
pub const UMX_STUB_WITH_RESIDUAL: &str = r#"out=""
residual=""
skip=""
input=""
for a in "$@"; do
  if [ -n "$skip" ]; then
    case "$skip" in
      --outdir) out="$a" ;;
      --model) : ;;
      --residual) residual="$a" ;;
    esac
    skip=""
    continue
  fi
  case "$a" in
    --outdir|--model|--residual) skip="$a" ;;
    *) input="$a" ;;
  esac
done
if [ ! -f "$input" ]; then
  echo "umx: error: the following arguments are required: input" >&2
  exit 2
fi
base=$(basename "$input")
base="${base%.*}"
d="$out/$base"
mkdir -p "$d"
for stem in vocals drums bass other "${residual:-residual}"; do
  cp "$input" "$d/$stem.wav"
done"#;

/// Stub umx that accepts the residual option but never writes that stem;
/// the adapter has to synthesize the instrumental by summing.
pub const UMX_STUB_NO_RESIDUAL: &str = r#"out=""
skip=""
input=""
for a in "$@"; do
  if [ -n "$skip" ]; then
    case "$skip" in
      --outdir) out="$a" ;;
    esac
    skip=""
    continue
  fi
  case "$a" in
    --outdir|--model|--residual) skip="$a" ;;
    *) input="$a" ;;
  esac
done
if [ ! -f "$input" ]; then
  echo "umx: error: the following arguments are required: input" >&2
  exit 2
fi
base=$(basename "$input")
base="${base%.*}"
d="$out/$base"
mkdir -p "$d"
for stem in vocals drums bass other; do
  cp "$input" "$d/$stem.wav"
done"#;

/// Stub whisper: writes a fixed JSON result into `--output_dir`.
pub const WHISPER_STUB: &str = r#"audio="$1"
dir="."
prev=""
for a in "$@"; do
  case "$prev" in
    --output_dir) dir="$a" ;;
  esac
  prev="$a"
done
base=$(basename "$audio")
base="${base%.*}"
printf '{"text": "hello world", "segments": [{"start": 0.0, "end": 1.5, "text": "hello world"}]}' > "$dir/$base.json""#;
