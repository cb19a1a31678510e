//! Unique-position extraction and indexer compaction for hierarchical label indices.
//!
//! An index level is stored as a table of unique representative `positions` (into some
//! shared label universe) plus an `indexer` that rebuilds the full, repeating label
//! sequence from that table. When the indexer is filtered, the table may reference
//! labels that are no longer used; [`new_indexers_from_indexer_subset`] detects whether
//! the old table is still exactly covered, and otherwise compacts both in one pass.

use tracing::{debug, trace};

use crate::{ArrayKitError, Result};

/// Return the position of the first occurrence of each distinct value in `array`.
///
/// Positions are ordered by ascending value, so `array[result]` is strictly
/// increasing. The argsort is stable, which makes "first occurrence" well defined
/// for repeated values.
///
/// Values are expected to be non-negative label indices, but ordering is defined for
/// any `i64`.
pub fn unique_positions(array: &[i64]) -> Vec<i64> {
    if array.is_empty() {
        return Vec::new();
    }

    // 1. Stable argsort
    let mut perm: Vec<usize> = (0..array.len()).collect();
    perm.sort_by_key(|&i| array[i]);

    // 2-3. Keep the first position of every run of equal sorted values
    let mut keep = vec![true; perm.len()];
    for i in 1..perm.len() {
        keep[i] = array[perm[i]] != array[perm[i - 1]];
    }

    // 4. perm[keep]
    perm.iter()
        .zip(&keep)
        .filter_map(|(&p, &k)| k.then_some(p as i64))
        .collect()
}

/// Outcome of [`new_indexers_from_indexer_subset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compaction {
    /// The indexer references every unique position; the input pair is reusable as-is.
    Unchanged,
    /// Some unique positions are unreferenced; a smaller table and remapped indexer.
    Compacted {
        /// Positions (into the shared universe) of every referenced slot, ordered by
        /// first appearance in the indexer.
        positions: Vec<i64>,
        /// For each indexer element, its slot in the compacted `positions`.
        indexers: Vec<i64>,
    },
}

impl Compaction {
    /// Returns `true` if no compaction was needed.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Compaction::Unchanged)
    }

    /// Resolve into an owned `(positions, indexers)` pair, copying the original inputs
    /// when they were found to be reusable.
    pub fn into_parts(self, array: &[i64], positions: &[i64]) -> (Vec<i64>, Vec<i64>) {
        match self {
            Compaction::Unchanged => (positions.to_vec(), array.to_vec()),
            Compaction::Compacted {
                positions,
                indexers,
            } => (positions, indexers),
        }
    }
}

/// Reuse or compact a `(positions, indexer)` pair after the indexer was subset.
///
/// `array` holds slots into the old unique table `positions` (so every element must be
/// in `[0, positions.len())`), and `positions` holds distinct, non-negative indices into
/// the label universe.
///
/// The indexer is scanned once. If every slot of `positions` is seen, the scan stops early
/// and [`Compaction::Unchanged`] is returned. Otherwise slots are renumbered by the order
/// in which they are first seen, and the table is trimmed to the slots actually used, so
/// that `new_positions[new_indexers[i]] == positions[array[i]]` for every `i`.
///
/// # Errors
///
/// - [`ArrayKitError::IndexOutOfBounds`] if an indexer element is negative or `>= positions.len()`
/// - [`ArrayKitError::NegativePosition`] / [`ArrayKitError::DuplicatePosition`] if
///   `positions` is not a valid unique table
pub fn new_indexers_from_indexer_subset(array: &[i64], positions: &[i64]) -> Result<Compaction> {
    let num_unique = positions.len();
    validate_positions(positions)?;
    validate_indexer(array, num_unique)?;

    // An empty table is vacuously covered (and the indexer must be empty as well).
    if num_unique == 0 {
        return Ok(Compaction::Unchanged);
    }

    let mut order_found: Vec<Option<usize>> = vec![None; num_unique];
    let mut new_indexers: Vec<i64> = Vec::with_capacity(array.len());
    let mut num_found = 0usize;

    for (i, &element) in array.iter().enumerate() {
        let slot = &mut order_found[element as usize];
        let rank = match *slot {
            Some(rank) => rank,
            None => {
                let rank = num_found;
                *slot = Some(rank);
                num_found += 1;
                if num_found == num_unique {
                    trace!(num_unique, scanned = i + 1, "indexer covers all positions");
                    return Ok(Compaction::Unchanged);
                }
                rank
            }
        };
        new_indexers.push(rank as i64);
    }

    // Drop unseen slots, remembering which old slot each survivor came from.
    let (survivors, filtered): (Vec<usize>, Vec<i64>) = order_found
        .iter()
        .enumerate()
        .filter_map(|(slot, rank)| rank.map(|r| (slot, r as i64)))
        .unzip();

    // Ranks are a permutation of 0..num_found, so this yields the survivor for rank 0, 1, ...
    let by_rank = unique_positions(&filtered);
    let compacted: Vec<i64> = by_rank
        .iter()
        .take(num_found)
        .map(|&p| positions[survivors[p as usize]])
        .collect();

    debug!(
        num_unique,
        num_found,
        len = array.len(),
        "compacted indexer positions"
    );
    Ok(Compaction::Compacted {
        positions: compacted,
        indexers: new_indexers,
    })
}

fn validate_positions(positions: &[i64]) -> Result<()> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    if let Some(&first) = sorted.first() {
        if first < 0 {
            return Err(ArrayKitError::NegativePosition(first));
        }
    }
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(ArrayKitError::DuplicatePosition(pair[0]));
    }
    Ok(())
}

fn validate_indexer(array: &[i64], len: usize) -> Result<()> {
    match array.iter().find(|&&e| e < 0 || e as usize >= len) {
        Some(&index) => Err(ArrayKitError::IndexOutOfBounds { index, len }),
        None => Ok(()),
    }
}
