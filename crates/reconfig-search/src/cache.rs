//! Memoized displacement distances for MRSH-1.

use crate::config::CacheLimits;
use reconfig_core::Coord;
use std::collections::HashMap;

/// Memo table from a canonical offset class to a distance bound.
///
/// Built fresh for each search. Nothing is evicted within a run. The
/// distance limits in [`CacheLimits`] decide which results are stored; the
/// help limit caps how many stored entries one module's evaluation may
/// reuse before it falls back to computing. A lookup always returns
/// exactly what the compute function would.
#[derive(Debug)]
pub struct HeuristicCache {
    limits: CacheLimits,
    entries: HashMap<Coord, u32>,
    reused_for_module: usize,
    hits: u64,
    misses: u64,
}

impl HeuristicCache {
    /// Empty cache with the given limits.
    pub fn new(limits: CacheLimits) -> Self {
        Self {
            limits,
            entries: HashMap::new(),
            reused_for_module: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Start evaluating a new module; resets the help-limit counter.
    pub fn begin_module(&mut self) {
        self.reused_for_module = 0;
    }

    /// Cached value for `signature`, or `compute()` (stored if the limits
    /// allow).
    pub fn lookup_or_compute<F>(&mut self, signature: &[i32], compute: F) -> u32
    where
        F: FnOnce() -> u32,
    {
        if !self.limits.enabled {
            return compute();
        }
        let may_reuse = self
            .limits
            .help_limit
            .is_none_or(|lim| self.reused_for_module < lim);
        if let Some(&v) = self.entries.get(signature) {
            if may_reuse {
                self.hits += 1;
                self.reused_for_module += 1;
                return v;
            }
            self.misses += 1;
            return compute();
        }
        self.misses += 1;
        let v = compute();
        if self.may_store(signature) {
            self.entries.insert(Coord::from_slice(signature), v);
        }
        v
    }

    fn may_store(&self, signature: &[i32]) -> bool {
        let l1: u32 = signature.iter().map(|c| c.unsigned_abs()).sum();
        let linf = signature.iter().map(|c| c.unsigned_abs()).max().unwrap_or(0);
        self.limits.l1_limit.is_none_or(|lim| l1 <= lim)
            && self.limits.linf_limit.is_none_or(|lim| linf <= lim)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the table.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that ran the compute function.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
