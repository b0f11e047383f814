//! Folder-backed output catalogs. The job runner only needs `refresh`
//! after a successful job; the entries themselves exist for presentation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "flac", "m4a"];
pub const TEXT_EXTENSIONS: [&str; 2] = ["txt", "lrc"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Vocals,
    Instrumentals,
    Transcriptions,
}

impl Category {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Transcriptions => &TEXT_EXTENSIONS,
            _ => &AUDIO_EXTENSIONS,
        }
    }
}

/// `{path, display_name}` pair for one cataloged file.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub display_name: String,
}

pub trait Catalog: Send + Sync {
    fn refresh(&self, category: Category);
}

/// Catalog over three configured folders, rescanned on demand.
pub struct FolderCatalog {
    dirs: HashMap<Category, PathBuf>,
    entries: Mutex<HashMap<Category, Vec<CatalogEntry>>>,
}

impl FolderCatalog {
    pub fn new(vocals_dir: PathBuf, instrumental_dir: PathBuf, transcription_dir: PathBuf) -> Self {
        let mut dirs = HashMap::new();
        dirs.insert(Category::Vocals, vocals_dir);
        dirs.insert(Category::Instrumentals, instrumental_dir);
        dirs.insert(Category::Transcriptions, transcription_dir);
        FolderCatalog {
            dirs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn entries(&self, category: Category) -> Vec<CatalogEntry> {
        self.entries
            .lock()
            .expect("catalog poisoned")
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }
}

impl Catalog for FolderCatalog {
    fn refresh(&self, category: Category) {
        let Some(dir) = self.dirs.get(&category) else {
            return;
        };
        let scanned = scan_dir(dir, category.extensions());
        log::debug!("catalog: {:?} -> {} entries", category, scanned.len());
        self.entries
            .lock()
            .expect("catalog poisoned")
            .insert(category, scanned);
    }
}

fn scan_dir(dir: &Path, extensions: &[&str]) -> Vec<CatalogEntry> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut entries: Vec<CatalogEntry> = read
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .is_some_and(|e| extensions.contains(&e.as_str()));
            if !path.is_file() || !matches {
                return None;
            }
            let display_name = path.file_name()?.to_string_lossy().into_owned();
            Some(CatalogEntry { path, display_name })
        })
        .collect();

    entries.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    entries
}
