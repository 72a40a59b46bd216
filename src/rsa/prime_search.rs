// Parallel Prime Search
// Runs a fixed set of workers, each hunting for a prime of the target bit length

use std::thread;

use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::{debug, trace, warn};

use super::bigint::{random_bits, RsaBigInt};
use super::primality::{MillerRabin, PrimalityTester};
use crate::config::SearchConfig;
use crate::error::{Result, RsaError};

/// Candidate interval for a bit length `b`: `[2^b, 2^(b+1) - 1]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBounds {
    pub bits: usize,
    pub min: RsaBigInt,
    pub max: RsaBigInt,
    pub range: RsaBigInt,
}

impl SearchBounds {
    pub fn for_bits(bits: usize) -> Self {
        let min = RsaBigInt::one() << bits;
        let max = (RsaBigInt::one() << (bits + 1)) - 1u8;
        let range = &max - &min + 1u8;
        Self {
            bits,
            min,
            max,
            range,
        }
    }

    pub fn contains(&self, n: &RsaBigInt) -> bool {
        n >= &self.min && n <= &self.max
    }

    /// Random odd starting point inside the bounds
    fn draw(&self) -> RsaBigInt {
        let mut candidate = &self.min + random_bits(self.bits as u64) % &self.range;
        // max is odd, so this never leaves the interval
        if candidate.is_even() {
            candidate += 1u8;
        }
        candidate
    }

    /// Next odd candidate, wrapping to the bottom of the interval past `max`
    fn advance(&self, candidate: RsaBigInt) -> RsaBigInt {
        let next = candidate + 2u8;
        if next > self.max {
            &self.min + 1u8
        } else {
            next
        }
    }
}

/// Outcome of a single worker, written only into that worker's slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeSearchResult {
    pub found: bool,
    pub value: RsaBigInt,
    pub candidates_tested: u64,
}

impl Default for PrimeSearchResult {
    fn default() -> Self {
        Self {
            found: false,
            value: RsaBigInt::zero(),
            candidates_tested: 0,
        }
    }
}

/// Fans a prime search out over `config.workers` threads and picks the
/// first successful slot in slot order.
pub struct ParallelPrimeSearch {
    config: SearchConfig,
    tester: Box<dyn PrimalityTester>,
}

impl Default for ParallelPrimeSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default(), Box::new(MillerRabin::default()))
    }
}

impl ParallelPrimeSearch {
    pub fn new(config: SearchConfig, tester: Box<dyn PrimalityTester>) -> Self {
        Self { config, tester }
    }

    /// Find a prime `p` with `2^bits <= p <= 2^(bits+1) - 1`
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn search(&self, bits: usize) -> Result<RsaBigInt> {
        if bits == 0 {
            return Err(RsaError::InvalidParameter {
                name: "bits",
                value: bits as u64,
                reason: "prime bit length must be positive",
            });
        }

        let bounds = SearchBounds::for_bits(bits);
        let workers = self.config.workers.max(1);
        let max_candidates = self.config.max_candidates;
        let tester = self.tester.as_ref();

        let mut slots = vec![PrimeSearchResult::default(); workers];

        thread::scope(|scope| {
            let handles: Vec<_> = slots
                .iter_mut()
                .enumerate()
                .map(|(index, slot)| {
                    let bounds = &bounds;
                    scope.spawn(move || {
                        *slot = run_worker(index, bounds, tester, max_candidates);
                    })
                })
                .collect();

            for (index, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    warn!(worker = index, "prime search worker panicked");
                }
            }
        });

        match select_slot(slots) {
            Some((index, slot)) => {
                debug!(
                    worker = index,
                    candidates = slot.candidates_tested,
                    "accepted prime from worker slot"
                );
                Ok(slot.value)
            }
            None => Err(RsaError::SearchExhausted { bits, workers }),
        }
    }
}

/// First successful slot by slot index, regardless of which worker finished first
fn select_slot(slots: Vec<PrimeSearchResult>) -> Option<(usize, PrimeSearchResult)> {
    slots.into_iter().enumerate().find(|(_, slot)| slot.found)
}

fn run_worker(
    index: usize,
    bounds: &SearchBounds,
    tester: &dyn PrimalityTester,
    max_candidates: Option<u64>,
) -> PrimeSearchResult {
    let mut candidate = bounds.draw();
    let mut tested = 0u64;

    loop {
        if max_candidates.map_or(false, |limit| tested >= limit) {
            debug!(worker = index, tested, "candidate ceiling reached");
            return PrimeSearchResult {
                found: false,
                value: candidate,
                candidates_tested: tested,
            };
        }

        tested += 1;
        if tester.is_prime(&candidate) {
            trace!(worker = index, tested, "worker found prime");
            return PrimeSearchResult {
                found: true,
                value: candidate,
                candidates_tested: tested,
            };
        }

        candidate = bounds.advance(candidate);
    }
}
