mod common;

use std::path::PathBuf;

use stemsep_core::{Engine, JobParams, OutputFormat, SepError, TranscriberKind, TranscriptionRequest, WavBitDepth};
use tempfile::tempdir;

fn params_for(input: &std::path::Path, engine: Engine) -> JobParams {
    let dir = input.parent().unwrap();
    JobParams::for_file(
        input,
        engine,
        dir.join("vocals"),
        dir.join("instrumentals"),
        dir.join("text"),
    )
    .unwrap()
}

#[test]
fn for_file_derives_base_name_and_default_model() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("My Song (live).wav");
    common::write_test_wav(&input, 44_100, 2, 512);

    let params = params_for(&input, Engine::Demucs);
    // Parentheses are not filename-safe everywhere and get replaced.
    assert_eq!(params.base_name, "My Song _live_");
    assert_eq!(params.model, "mdx");
    assert_eq!(params.output_format, OutputFormat::Wav);
    assert_eq!(params.output_stem_prefix(), "My Song _live__D");
}

#[test]
fn suffixes_differ_per_engine() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let prefixes: Vec<String> = Engine::ALL
        .iter()
        .map(|&e| params_for(&input, e).output_stem_prefix())
        .collect();
    assert_eq!(prefixes, ["song_S", "song_D", "song_O"]);
}

#[test]
fn normalize_clears_mp3_knobs_for_wav_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let mut params = params_for(&input, Engine::Spleeter);
    params.bitrate = Some(320);
    params.mp3_preset = Some(2);
    params.normalize();

    assert_eq!(params.bitrate, None);
    assert_eq!(params.mp3_preset, None);
}

#[test]
fn normalize_clears_sample_rate_and_bit_depth_for_mp3() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let mut params = params_for(&input, Engine::Spleeter);
    params.output_format = OutputFormat::Mp3;
    params.sample_rate = Some(48_000);
    params.bit_depth = Some(WavBitDepth::Int24);
    params.bitrate = Some(192);
    params.normalize();

    assert_eq!(params.sample_rate, None);
    assert_eq!(params.bit_depth, None);
    assert_eq!(params.bitrate, Some(192));
}

#[test]
fn normalize_defaults_demucs_wav_depth_to_int24() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let mut params = params_for(&input, Engine::Demucs);
    params.normalize();
    assert_eq!(params.bit_depth, Some(WavBitDepth::Int24));

    // Int16 is not a depth demucs can write natively.
    params.bit_depth = Some(WavBitDepth::Int16);
    params.normalize();
    assert_eq!(params.bit_depth, Some(WavBitDepth::Int24));

    params.bit_depth = Some(WavBitDepth::Float32);
    params.normalize();
    assert_eq!(params.bit_depth, Some(WavBitDepth::Float32));
}

#[test]
fn normalize_clears_bit_depth_outside_demucs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    // A spleeter wav job cannot honor a depth request; dropping it beats
    // pretending the 16-bit backend output is something else.
    let mut params = params_for(&input, Engine::Spleeter);
    params.bit_depth = Some(WavBitDepth::Int24);
    params.normalize();
    assert_eq!(params.bit_depth, None);

    let mut params = params_for(&input, Engine::OpenUnmix);
    params.bit_depth = Some(WavBitDepth::Float32);
    params.normalize();
    assert_eq!(params.bit_depth, None);
}

#[test]
fn normalize_clears_shifts_outside_demucs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let mut params = params_for(&input, Engine::OpenUnmix);
    params.shift_count = Some(5);
    params.normalize();
    assert_eq!(params.shift_count, None);

    let mut params = params_for(&input, Engine::Demucs);
    params.shift_count = Some(5);
    params.normalize();
    assert_eq!(params.shift_count, Some(5));
}

#[test]
fn validate_rejects_missing_input() {
    let params = JobParams::for_file(
        PathBuf::from("/definitely/not/here.wav"),
        Engine::Spleeter,
        PathBuf::from("/tmp/v"),
        PathBuf::from("/tmp/i"),
        PathBuf::from("/tmp/t"),
    )
    .unwrap();

    match params.validate() {
        Err(SepError::MissingInput { path }) => assert!(path.contains("not/here.wav")),
        other => panic!("expected MissingInput, got {other:?}"),
    }
}

#[test]
fn validate_rejects_unknown_model() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let mut params = params_for(&input, Engine::Demucs);
    params.model = "not-a-model".to_string();
    assert!(matches!(
        params.validate(),
        Err(SepError::UnknownModel { .. })
    ));
}

#[test]
fn validate_rejects_unknown_transcriber_model() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("song.wav");
    common::write_test_wav(&input, 44_100, 1, 256);

    let mut params = params_for(&input, Engine::Spleeter);
    params.transcription = Some(TranscriptionRequest {
        engine: TranscriberKind::Whisper,
        model: "gigantic".to_string(),
    });
    assert!(matches!(
        params.validate(),
        Err(SepError::UnknownModel { .. })
    ));

    params.transcription = Some(TranscriptionRequest::new(TranscriberKind::Whisper).unwrap());
    assert!(params.validate().is_ok());
}

#[test]
fn unknown_output_format_name_falls_back_to_wav() {
    assert_eq!(OutputFormat::from_name("FLAC"), OutputFormat::Flac);
    assert_eq!(OutputFormat::from_name("ogg"), OutputFormat::Wav);
}
