mod common;

use std::fs;

use stemsep_core::paths::{move_file, unique_dest};
use tempfile::tempdir;

#[test]
fn unique_dest_prefers_plain_name() {
    let dir = tempdir().unwrap();
    let dest = unique_dest(dir.path(), "song_S_vocals", "wav");
    assert_eq!(dest, dir.path().join("song_S_vocals.wav"));
}

#[test]
fn unique_dest_counts_up_past_existing_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("song_S_vocals.wav"), b"first").unwrap();
    fs::write(dir.path().join("song_S_vocals_1.wav"), b"second").unwrap();

    let dest = unique_dest(dir.path(), "song_S_vocals", "wav");
    assert_eq!(dest, dir.path().join("song_S_vocals_2.wav"));

    // Existing files stay untouched.
    assert_eq!(fs::read(dir.path().join("song_S_vocals.wav")).unwrap(), b"first");
}

#[test]
fn unique_dest_is_extension_sensitive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("song_D_vocals.wav"), b"x").unwrap();

    // A different extension does not collide.
    let dest = unique_dest(dir.path(), "song_D_vocals", "mp3");
    assert_eq!(dest, dir.path().join("song_D_vocals.mp3"));
}

#[test]
fn move_file_replaces_source_with_destination() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("scratch.wav");
    let dst = dir.path().join("final.wav");
    fs::write(&src, b"payload").unwrap();

    move_file(&src, &dst).unwrap();
    assert!(!src.exists());
    assert_eq!(fs::read(&dst).unwrap(), b"payload");
}
