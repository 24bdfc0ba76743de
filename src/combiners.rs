//! Keyed aggregation.
//!
//! A [`CombineFn`] describes how values for one key are folded into an
//! accumulator and finished into an output. [`combine_by_key`] drives a
//! combiner over a stream of `(key, value)` pairs; [`combine_by_key_par`] does
//! the same on rayon, folding per-thread partials and merging them. Frequency
//! tables are built with these and [`Count`].

use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

/// Incremental aggregation of values into an accumulator.
///
/// - `create` returns an empty accumulator
/// - `add_input` folds one value into it
/// - `merge` folds another accumulator into it (for partial results)
/// - `finish` turns the accumulator into the output
pub trait CombineFn<V, A, O>: Send + Sync {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}

/* ===================== Count ===================== */

/// Number of values per key.
///
/// - Accumulator: `u64`
/// - Output: `u64`
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<V> CombineFn<V, u64, u64> for Count {
    fn create(&self) -> u64 {
        0
    }

    fn add_input(&self, acc: &mut u64, _v: V) {
        *acc += 1;
    }

    fn merge(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Driver ===================== */

/// Fold every `(key, value)` pair into a per-key accumulator and finish it.
///
/// Keys that never occur do not appear in the result.
pub fn combine_by_key<K, V, A, O, C, I>(pairs: I, comb: &C) -> HashMap<K, O>
where
    K: Eq + Hash,
    C: CombineFn<V, A, O>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut accs: HashMap<K, A> = HashMap::new();
    for (k, v) in pairs {
        let acc = accs.entry(k).or_insert_with(|| comb.create());
        comb.add_input(acc, v);
    }
    accs.into_iter().map(|(k, a)| (k, comb.finish(a))).collect()
}

/// Parallel [`combine_by_key`]: each rayon task folds its share of the pairs
/// into a partial map, and partials are merged with [`CombineFn::merge`].
///
/// The result does not depend on how the input was split.
pub fn combine_by_key_par<K, V, A, O, C, I>(pairs: I, comb: &C) -> HashMap<K, O>
where
    K: Eq + Hash + Send,
    V: Send,
    A: Send,
    C: CombineFn<V, A, O>,
    I: IntoParallelIterator<Item = (K, V)>,
{
    let accs = pairs
        .into_par_iter()
        .fold(HashMap::new, |mut accs: HashMap<K, A>, (k, v)| {
            let acc = accs.entry(k).or_insert_with(|| comb.create());
            comb.add_input(acc, v);
            accs
        })
        .reduce(HashMap::new, |mut left, right| {
            for (k, a) in right {
                match left.entry(k) {
                    Entry::Occupied(mut e) => comb.merge(e.get_mut(), a),
                    Entry::Vacant(e) => {
                        e.insert(a);
                    }
                }
            }
            left
        });
    accs.into_iter().map(|(k, a)| (k, comb.finish(a))).collect()
}
