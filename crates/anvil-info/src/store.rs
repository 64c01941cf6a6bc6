//! The store façade: lifecycle bracketing around one cache and its source.
//!
//! A store is opened before any class is requested and closed when scanning
//! is finished. Opening and closing delegate to the class source's
//! session-level hooks and are timed; closing logs a usage summary.

use std::time::{Duration, Instant};

use crate::cache::{CacheStats, ClassInfoCache};
use crate::config::CacheOptions;
use crate::descriptor::ClassId;
use crate::error::{InfoError, Result};
use crate::source::{ClassParser, ClassSource};

/// Lifetime counters for one store.
#[derive(Debug, Default, Clone, Copy)]
pub struct InfoStoreStats {
    pub open_time: Duration,
    pub close_time: Duration,
    pub cache: CacheStats,
}

pub struct InfoStore {
    cache: ClassInfoCache,
    is_open: bool,
    open_time: Duration,
    close_time: Duration,
}

impl InfoStore {
    pub fn new(
        options: &CacheOptions,
        source: Box<dyn ClassSource>,
        parser: Box<dyn ClassParser>,
    ) -> Self {
        Self {
            cache: ClassInfoCache::new(options, source, parser),
            is_open: false,
            open_time: Duration::ZERO,
            close_time: Duration::ZERO,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) -> Result<()> {
        if self.is_open {
            tracing::warn!("store opened while already open");
            return Ok(());
        }
        let started = Instant::now();
        self.cache.source_open()?;
        self.open_time += started.elapsed();
        self.is_open = true;
        tracing::debug!("opened class info store");
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        if !self.is_open {
            return Err(InfoError::StoreClosed);
        }
        let started = Instant::now();
        let result = self.cache.source_close();
        self.close_time += started.elapsed();
        self.is_open = false;

        let stats = self.cache.stats();
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            scans = stats.scans,
            evictions = stats.evictions,
            artificial = stats.artificial,
            scan_time_ms = stats.scan_time.as_millis() as u64,
            stream_time_ms = stats.stream_time.as_millis() as u64,
            "closed class info store"
        );
        result
    }

    /// Resolve a class name through the cache. The store must be open.
    pub fn class(&mut self, name: &str) -> Result<ClassId> {
        if !self.is_open {
            return Err(InfoError::StoreClosed);
        }
        Ok(self.cache.resolve_class(name))
    }

    /// Direct access to the cache for detail queries. The store must be
    /// open: detail accessors may scan, and scanning needs a live source.
    pub fn cache(&mut self) -> Result<&mut ClassInfoCache> {
        if !self.is_open {
            return Err(InfoError::StoreClosed);
        }
        Ok(&mut self.cache)
    }

    pub fn stats(&self) -> InfoStoreStats {
        InfoStoreStats {
            open_time: self.open_time,
            close_time: self.close_time,
            cache: self.cache.stats(),
        }
    }
}
