use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use crate::parser::{parse_listing, RawRecipe};

/// On-disk store of raw per-letter API listings (`a.json` .. `z.json`)
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "cocktails-to-sqlite")
                    .context("Could not determine cache directory")?;
                proj_dirs.cache_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn letter_path(&self, letter: char) -> PathBuf {
        self.cache_dir.join(format!("{}.json", letter))
    }

    pub fn is_cached(&self, letter: char) -> bool {
        self.letter_path(letter).exists()
    }

    pub fn read_letter(&self, letter: char) -> Result<String> {
        let path = self.letter_path(letter);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))
    }

    pub fn write_letter(&self, letter: char, body: &str) -> Result<()> {
        let path = self.letter_path(letter);
        fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))
    }
}

/// Load every `*.json` listing in `dir`, in file name order
pub fn read_listings(dir: &Path) -> Result<Vec<Vec<RawRecipe>>> {
    let mut paths = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut partitions = Vec::with_capacity(paths.len());
    for path in paths {
        let body =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let recipes =
            parse_listing(&body).with_context(|| format!("Failed to parse listing {:?}", path))?;
        partitions.push(recipes);
    }

    Ok(partitions)
}
