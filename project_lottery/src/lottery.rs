//! Weighted lottery primitives.
//!
//! A lottery is described by its cumulative weights: for N entries with weights
//! `w_0 .. w_{N-1}`, the intervals are `[0, w_0, w_0 + w_1, ...]`. Entry `i` owns
//! the draws in `(intervals[i], intervals[i + 1]]`, so an entry with a zero
//! weight can never be selected.

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::LotteryErrors;

/// A source of uniform draws.
pub trait DrawSource {
    /// Returns a number drawn uniformly in `[1, upper]`. `upper` is at least 1.
    fn draw(&mut self, upper: u128) -> u128;
}

/// The generator used for real runs. It is created once per run from a seed.
#[derive(Debug, Clone)]
pub struct SeededDraws {
    seed: String,
    rng: StdRng,
}

impl SeededDraws {
    /// Seeds the generator from the SHA-256 digest of the raw input.
    pub fn from_input(raw: &[u8]) -> SeededDraws {
        let seed = sha256::digest(raw);
        let bytes = decode_seed(&seed).expect("a SHA-256 digest is 64 hex characters");
        SeededDraws {
            seed,
            rng: StdRng::from_seed(bytes),
        }
    }

    /// Re-creates the generator from a hex seed, as returned by [SeededDraws::seed].
    pub fn from_hex_seed(seed: &str) -> Result<SeededDraws, LotteryErrors> {
        let bytes = decode_seed(seed).ok_or_else(|| {
            LotteryErrors::ConfigurationError(format!(
                "seed {:?} is not a 64 character hex string",
                seed
            ))
        })?;
        Ok(SeededDraws {
            seed: seed.to_lowercase(),
            rng: StdRng::from_seed(bytes),
        })
    }

    /// The hex representation of the seed.
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl DrawSource for SeededDraws {
    fn draw(&mut self, upper: u128) -> u128 {
        self.rng.gen_range(1..=upper)
    }
}

fn decode_seed(hex: &str) -> Option<[u8; 32]> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut res = [0u8; 32];
    for (idx, b) in res.iter_mut().enumerate() {
        *b = u8::from_str_radix(&hex[2 * idx..2 * idx + 2], 16).ok()?;
    }
    Some(res)
}

/// Builds the cumulative weights, starting at 0.
///
/// Returns None if the total weight does not fit in a `u128`.
pub fn cumulative_weights<I: IntoIterator<Item = u128>>(weights: I) -> Option<Vec<u128>> {
    let mut intervals: Vec<u128> = vec![0];
    let mut last: u128 = 0;
    for w in weights {
        last = last.checked_add(w)?;
        intervals.push(last);
    }
    Some(intervals)
}

/// Finds the entry that owns the given draw.
///
/// This is the smallest `i` such that `intervals[i] >= draw`, minus one.
/// Returns None if the draw is not in `[1, total]`.
pub fn locate(intervals: &[u128], draw: u128) -> Option<usize> {
    let total = *intervals.last()?;
    if draw == 0 || draw > total {
        return None;
    }
    let idx = intervals.partition_point(|c| *c < draw);
    // idx >= 1 because intervals[0] == 0 < draw.
    Some(idx - 1)
}

/// Runs one lottery over the intervals.
///
/// Returns the drawn number and the index of the selected entry, or None if
/// the total weight is zero. Exactly one draw is consumed when there is some
/// weight.
pub fn pick<D: DrawSource + ?Sized>(intervals: &[u128], draws: &mut D) -> Option<(u128, usize)> {
    let total = *intervals.last()?;
    if total == 0 {
        return None;
    }
    let number = draws.draw(total);
    let idx = locate(intervals, number)?;
    debug!("pick: total: {} number: {} index: {}", total, number, idx);
    Some((number, idx))
}
