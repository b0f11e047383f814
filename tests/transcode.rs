#![cfg(unix)]

mod common;

use std::env;
use std::fs;

use stemsep_core::audio::read_audio;
use stemsep_core::transcode::{needs_transcode, transcode};
use stemsep_core::{OutputFormat, SepError, WavBitDepth};
use tempfile::tempdir;

#[test]
fn matching_format_and_rate_skips_transcode() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("stem.wav");
    common::write_test_wav(&src, 44_100, 2, 512);

    assert!(!needs_transcode(&src, OutputFormat::Wav, None).unwrap());
    assert!(!needs_transcode(&src, OutputFormat::Wav, Some(44_100)).unwrap());
    assert!(needs_transcode(&src, OutputFormat::Wav, Some(48_000)).unwrap());
    assert!(needs_transcode(&src, OutputFormat::Mp3, None).unwrap());
}

#[test]
fn wav_transcode_resamples_in_process() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("stem.wav");
    let dst = dir.path().join("out.wav");
    common::write_test_wav(&src, 44_100, 2, 2048);

    transcode(
        &src,
        &dst,
        OutputFormat::Wav,
        Some(22_050),
        None,
        Some(WavBitDepth::Int24),
    )
    .unwrap();

    let out = read_audio(&dst).unwrap();
    assert_eq!(out.sample_rate, 22_050);
    assert_eq!(out.channels, 2);
}

#[test]
fn flac_transcode_shells_out_to_ffmpeg() {
    let _env = common::env_lock();
    let dir = tempdir().unwrap();
    let src = dir.path().join("stem.wav");
    let dst = dir.path().join("out.flac");
    common::write_test_wav(&src, 44_100, 1, 256);

    // -y -i {src} ... {dst}
    let stub = common::write_stub(
        dir.path(),
        "ffmpeg",
        r#"src=""
prev=""
for a in "$@"; do
  case "$prev" in
    -i) src="$a" ;;
  esac
  prev="$a"
  dst="$a"
done
cp "$src" "$dst""#,
    );
    env::set_var("STEMSEP_FFMPEG_BIN", &stub);
    let result = transcode(&src, &dst, OutputFormat::Flac, None, None, None);
    env::remove_var("STEMSEP_FFMPEG_BIN");

    result.unwrap();
    assert_eq!(fs::read(&dst).unwrap(), fs::read(&src).unwrap());
}

#[test]
fn ffmpeg_failure_surfaces_stderr() {
    let _env = common::env_lock();
    let dir = tempdir().unwrap();
    let src = dir.path().join("stem.wav");
    common::write_test_wav(&src, 44_100, 1, 256);
    let stub = common::write_stub(dir.path(), "ffmpeg", "echo 'unknown encoder' >&2\nexit 1");
    env::set_var("STEMSEP_FFMPEG_BIN", &stub);

    let result = transcode(
        &src,
        &dir.path().join("out.mp3"),
        OutputFormat::Mp3,
        None,
        Some(192),
        None,
    );
    env::remove_var("STEMSEP_FFMPEG_BIN");

    match result {
        Err(SepError::BackendInvocation { tool, detail }) => {
            assert_eq!(tool, "ffmpeg");
            assert!(detail.contains("unknown encoder"), "{detail}");
        }
        other => panic!("expected BackendInvocation, got {other:?}"),
    }
}
