//! Process-wide build statistics.

use std::time::Instant;

use serde::Serialize;

/// Running counters, updated after every build attempt.
///
/// Cache hits count as builds and their lookup time feeds the average.
#[derive(Debug, Clone)]
pub struct BuildStats {
    total_builds: u64,
    cache_hits: u64,
    last_build_time: f64,
    average_build_time: f64,
    started_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_builds: u64,
    pub cache_hits: u64,
    pub last_build_time: f64,
    pub average_build_time: f64,
    pub cache_size: usize,
    pub uptime_ms: u64,
}

impl BuildStats {
    pub fn new() -> Self {
        Self {
            total_builds: 0,
            cache_hits: 0,
            last_build_time: 0.0,
            average_build_time: 0.0,
            started_at: Instant::now(),
        }
    }

    pub fn record(&mut self, duration_ms: f64, from_cache: bool) {
        self.total_builds += 1;
        if from_cache {
            self.cache_hits += 1;
        }
        self.last_build_time = duration_ms;

        let n = self.total_builds as f64;
        self.average_build_time = (self.average_build_time * (n - 1.0) + duration_ms) / n;
    }

    pub fn total_builds(&self) -> u64 {
        self.total_builds
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn snapshot(&self, cache_size: usize) -> StatsSnapshot {
        StatsSnapshot {
            total_builds: self.total_builds,
            cache_hits: self.cache_hits,
            last_build_time: self.last_build_time,
            average_build_time: self.average_build_time,
            cache_size,
            uptime_ms: u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Default for BuildStats {
    fn default() -> Self {
        Self::new()
    }
}
