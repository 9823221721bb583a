//! Template file loading
//!
//! Templates are read as UTF-8 from absolute paths and their contents are
//! kept in a small FIFO cache, so a service rendering the same files over
//! and over does not hit the disk each time. Rendering itself is never
//! cached.

use crate::error::{Error, Result};
use crate::options::Options;
use crate::value::Params;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Environment variable overriding the cache capacity
pub const CACHE_SIZE_ENV: &str = "TWSQL_CACHE_SIZE";

pub const DEFAULT_CACHE_SIZE: usize = 20;

#[derive(Debug, Default)]
struct Cache {
    entries: HashMap<PathBuf, Arc<str>>,
    order: VecDeque<PathBuf>,
}

#[derive(Debug)]
pub struct TemplateLoader {
    capacity: usize,
    cache: Mutex<Cache>,
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl TemplateLoader {
    /// A loader keeping at most `capacity` files; zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Capacity from `TWSQL_CACHE_SIZE`, falling back to the default when
    /// unset, unparsable or zero
    pub fn from_env() -> Self {
        let capacity = std::env::var(CACHE_SIZE_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CACHE_SIZE);
        Self::new(capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read a template, from cache when possible
    pub fn load(&self, path: &Path) -> Result<Arc<str>> {
        if !path.is_absolute() {
            return Err(Error::validation(format!(
                "template path must be absolute: {}",
                path.display()
            )));
        }

        if let Some(text) = self.cache().entries.get(path) {
            debug!(path = %path.display(), "template cache hit");
            return Ok(Arc::clone(text));
        }

        debug!(path = %path.display(), "template cache miss");
        let text: Arc<str> = std::fs::read_to_string(path)?.into();
        self.insert(path, Arc::clone(&text));
        Ok(text)
    }

    /// Load and render a template file
    pub fn parse_file(
        &self,
        path: &Path,
        params: &Params,
        options: &Options,
    ) -> Result<(String, Params)> {
        let text = self.load(path)?;
        crate::parse_template(&text, params, options)
    }

    pub fn clear(&self) {
        let mut cache = self.cache();
        cache.entries.clear();
        cache.order.clear();
    }

    fn insert(&self, path: &Path, text: Arc<str>) {
        if self.capacity == 0 {
            return;
        }
        let mut cache = self.cache();
        if cache.entries.insert(path.to_path_buf(), text).is_none() {
            cache.order.push_back(path.to_path_buf());
        }
        while cache.order.len() > self.capacity {
            if let Some(oldest) = cache.order.pop_front() {
                cache.entries.remove(&oldest);
            }
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, Cache> {
        // entries are whole strings, so a poisoned cache is still consistent
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.cache().entries.len()
    }
}
