/// Memory metrics collection
///
/// Wraps sysinfo's OS memory counters. RAM and swap are re-read once per
/// refresh tick; a query that reports a zero total (counters unavailable
/// this tick) keeps the previously observed snapshot so the display never
/// goes blank.

use sysinfo::System;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

impl MemorySnapshot {
    pub fn new(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            total_bytes,
            used_bytes,
        }
    }

    pub fn total_gb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_GB
    }

    pub fn used_gb(&self) -> f64 {
        self.used_bytes as f64 / BYTES_PER_GB
    }

    /// Used percentage, rounded to one decimal place.
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let raw = self.used_bytes as f64 / self.total_bytes as f64 * 100.0;
        (raw * 10.0).round() / 10.0
    }
}

pub struct MemorySampler {
    system: System,
    ram: MemorySnapshot,
    swap: MemorySnapshot,
}

impl MemorySampler {
    pub fn new() -> Self {
        let mut sampler = Self {
            system: System::new(),
            ram: MemorySnapshot::default(),
            swap: MemorySnapshot::default(),
        };
        sampler.refresh();
        sampler
    }

    /// Re-read OS memory counters, retaining the last good snapshot when a
    /// query comes back empty.
    pub fn refresh(&mut self) {
        self.system.refresh_memory();

        if self.system.total_memory() > 0 {
            self.ram = MemorySnapshot::new(self.system.used_memory(), self.system.total_memory());
        }
        if self.system.total_swap() > 0 {
            self.swap = MemorySnapshot::new(self.system.used_swap(), self.system.total_swap());
        }
    }

    pub fn ram(&self) -> MemorySnapshot {
        self.ram
    }

    pub fn swap(&self) -> MemorySnapshot {
        self.swap
    }
}

impl Default for MemorySampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_percent_one_decimal() {
        let snapshot = MemorySnapshot::new(2 * GB, 16 * GB);
        assert_eq!(snapshot.percent(), 12.5);
    }

    #[test]
    fn test_percent_rounds() {
        // 1/3 used => 33.333...% => 33.3%
        let snapshot = MemorySnapshot::new(GB, 3 * GB);
        assert_eq!(snapshot.percent(), 33.3);
    }

    #[test]
    fn test_percent_zero_total() {
        let snapshot = MemorySnapshot::new(0, 0);
        assert_eq!(snapshot.percent(), 0.0);
    }

    #[test]
    fn test_gb_conversion() {
        let snapshot = MemorySnapshot::new(2 * GB, 16 * GB);
        assert_eq!(snapshot.used_gb(), 2.0);
        assert_eq!(snapshot.total_gb(), 16.0);
    }

    #[test]
    fn test_sampler_populates_ram() {
        let sampler = MemorySampler::new();
        // Total RAM is always reported on a live system
        assert!(sampler.ram().total_bytes > 0);
    }
}
