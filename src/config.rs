// Key Generation Configuration
// Tunables for the prime search and the exponent selection

/// Number of prime-search workers started per search.
pub const DEFAULT_WORKERS: usize = 4;

/// Candidate ceiling per worker. Far above the expected ~ln(2^b)/2 candidates
/// for any realistic bit length.
pub const DEFAULT_MAX_CANDIDATES: u64 = 1 << 24;

/// Fermat prime F4, the usual fixed public exponent.
pub const FIXED_PUBLIC_EXPONENT: u64 = 65537;

/// Configuration for the parallel prime search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub workers: usize,
    /// `None` lets workers search until they find a prime.
    pub max_candidates: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_candidates: Some(DEFAULT_MAX_CANDIDATES),
        }
    }
}

impl SearchConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: Option<u64>) -> Self {
        self.max_candidates = max_candidates;
        self
    }
}

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenConfig {
    pub search: SearchConfig,
    pub fixed_exponent: u64,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            fixed_exponent: FIXED_PUBLIC_EXPONENT,
        }
    }
}

impl KeygenConfig {
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeygenConfig::default();
        assert_eq!(config.search.workers, 4);
        assert_eq!(config.fixed_exponent, 65537);
        assert!(config.search.max_candidates.is_some());
    }

    #[test]
    fn test_worker_count_never_zero() {
        let config = SearchConfig::default().with_workers(0);
        assert_eq!(config.workers, 1);
    }
}
