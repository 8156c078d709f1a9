use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

use sha2::{Digest, Sha256};

/// Page cache shared by all fetches of a run: an in-memory map backed by an
/// optional on-disk directory that persists across runs. Each URL is written
/// to disk at most once.
#[derive(Debug)]
pub struct PageCache {
    dir: Option<PathBuf>,
    mem: Mutex<HashMap<String, String>>,
}

impl PageCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            mem: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, url: &str) -> Option<String> {
        if let Some(page) = self.mem.lock().unwrap().get(url) {
            return Some(page.clone());
        }
        let path = self.dir.as_ref()?.join(Self::key(url));
        let page = fs::read_to_string(path).ok()?;
        self.mem
            .lock()
            .unwrap()
            .insert(url.to_string(), page.clone());
        Some(page)
    }

    pub fn put(&self, url: &str, page: &str) {
        self.mem
            .lock()
            .unwrap()
            .insert(url.to_string(), page.to_string());

        let Some(dir) = &self.dir else { return };
        let path = dir.join(Self::key(url));
        if path.exists() {
            return;
        }
        if let Err(e) = fs::create_dir_all(dir).and_then(|()| fs::write(&path, page)) {
            log::warn!("Couldn't write cache entry {}: {e}", path.display());
        }
    }

    /// Removes the on-disk cache directory, if it exists.
    pub fn clear(dir: &Path) -> io::Result<()> {
        match fs::remove_dir_all(dir) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => {
                log::info!("Cleared page cache at {}", dir.display());
                Ok(())
            }
        }
    }

    fn key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        format!("{:x}.html", hasher.finalize())
    }
}
