use std::{
    fs,
    path::{Path, PathBuf},
};

/// Destination path that does not clobber existing files: `{stem}.{ext}`,
/// then `{stem}_1.{ext}`, `{stem}_2.{ext}`, ...
pub fn unique_dest(dir: &Path, file_stem: &str, ext: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{file_stem}.{ext}"));
    let mut n = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{file_stem}_{n}.{ext}"));
        n += 1;
    }
    candidate
}

/// Move a file, falling back to copy+delete when rename crosses
/// filesystems (scratch dirs usually live on tmpfs).
pub fn move_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dst)?;
            fs::remove_file(src)
        }
    }
}

/// Reduce a song name to something safe to embed in output file names.
pub fn sanitize_base_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.').to_string();
    if trimmed.is_empty() {
        "output".to_string()
    } else {
        trimmed
    }
}
