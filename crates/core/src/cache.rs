//! Memoization caches
//!
//! Two small utilities with different access patterns:
//!
//! - [`MemoTable`]: remembers every result of a pure function over a finite
//!   argument domain. Storage is a trie of nested hash maps, one level per
//!   argument position. Nothing is ever evicted.
//! - [`LastCall`]: a single slot that recomputes only when the arguments differ
//!   from the previous call. Used for values derived every frame from a scalar
//!   that rarely changes.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// An argument tuple usable as a [`MemoTable`] key.
///
/// Each arity maps to its own trie shape: `(A,)` is a flat map, `(A, B)` is a
/// map of maps, and so on. A lookup walks the cached prefix and only allocates
/// nested maps for the part of the path that was never seen.
pub trait MemoArgs: Sized {
    type Table<R>: Default;

    /// Return the stored result for `self`, computing and storing it first if
    /// the full path is missing.
    fn lookup<'t, R>(&self, table: &'t mut Self::Table<R>, compute: impl FnOnce(&Self) -> R) -> &'t R;

    /// Number of results stored in `table`.
    fn count<R>(table: &Self::Table<R>) -> usize;
}

impl<A> MemoArgs for (A,)
where
    A: Hash + Eq + Clone,
{
    type Table<R> = HashMap<A, R>;

    fn lookup<'t, R>(&self, table: &'t mut Self::Table<R>, compute: impl FnOnce(&Self) -> R) -> &'t R {
        table.entry(self.0.clone()).or_insert_with(|| compute(self))
    }

    fn count<R>(table: &Self::Table<R>) -> usize {
        table.len()
    }
}

impl<A, B> MemoArgs for (A, B)
where
    A: Hash + Eq + Clone,
    B: Hash + Eq + Clone,
{
    type Table<R> = HashMap<A, HashMap<B, R>>;

    fn lookup<'t, R>(&self, table: &'t mut Self::Table<R>, compute: impl FnOnce(&Self) -> R) -> &'t R {
        table
            .entry(self.0.clone())
            .or_default()
            .entry(self.1.clone())
            .or_insert_with(|| compute(self))
    }

    fn count<R>(table: &Self::Table<R>) -> usize {
        table.values().map(HashMap::len).sum()
    }
}

impl<A, B, C> MemoArgs for (A, B, C)
where
    A: Hash + Eq + Clone,
    B: Hash + Eq + Clone,
    C: Hash + Eq + Clone,
{
    type Table<R> = HashMap<A, HashMap<B, HashMap<C, R>>>;

    fn lookup<'t, R>(&self, table: &'t mut Self::Table<R>, compute: impl FnOnce(&Self) -> R) -> &'t R {
        table
            .entry(self.0.clone())
            .or_default()
            .entry(self.1.clone())
            .or_default()
            .entry(self.2.clone())
            .or_insert_with(|| compute(self))
    }

    fn count<R>(table: &Self::Table<R>) -> usize {
        table
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }
}

/// Memoizes a pure function keyed by its full argument tuple.
///
/// ```
/// use canvas_tetris_core::MemoTable;
///
/// let mut area = MemoTable::new(|&(w, h): &(u32, u32)| w * h);
/// assert_eq!(*area.get((3, 4)), 12);
/// assert_eq!(*area.get((3, 4)), 12);
/// assert_eq!(area.computations(), 1);
/// ```
pub struct MemoTable<Args, R, F>
where
    Args: MemoArgs,
{
    table: Args::Table<R>,
    compute: F,
    computations: usize,
}

impl<Args, R, F> MemoTable<Args, R, F>
where
    Args: MemoArgs,
    F: FnMut(&Args) -> R,
{
    pub fn new(compute: F) -> Self {
        Self {
            table: Default::default(),
            compute,
            computations: 0,
        }
    }

    /// Look up `args`, invoking the wrapped function only on the first sighting.
    pub fn get(&mut self, args: Args) -> &R {
        let compute = &mut self.compute;
        let computations = &mut self.computations;
        args.lookup(&mut self.table, |args| {
            *computations += 1;
            compute(args)
        })
    }

    /// Number of distinct argument tuples stored.
    pub fn len(&self) -> usize {
        Args::count(&self.table)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the wrapped function has run.
    pub fn computations(&self) -> usize {
        self.computations
    }
}

impl<Args, R, F> Clone for MemoTable<Args, R, F>
where
    Args: MemoArgs,
    Args::Table<R>: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            compute: self.compute.clone(),
            computations: self.computations,
        }
    }
}

impl<Args, R, F> fmt::Debug for MemoTable<Args, R, F>
where
    Args: MemoArgs,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoTable")
            .field("len", &Args::count(&self.table))
            .field("computations", &self.computations)
            .finish()
    }
}

/// Single-slot cache: recomputes only when the arguments differ from the
/// previous call. The first call always computes.
///
/// ```
/// use canvas_tetris_core::LastCall;
///
/// let mut double = LastCall::new(|&(x,): &(i32,)| x * 2);
/// assert_eq!(*double.call((2,)), 4);
/// assert_eq!(*double.call((2,)), 4);
/// assert_eq!(*double.call((3,)), 6);
/// assert_eq!(double.computations(), 2);
/// ```
pub struct LastCall<Args, R, F> {
    last: Option<(Args, R)>,
    compute: F,
    computations: usize,
}

impl<Args, R, F> LastCall<Args, R, F>
where
    Args: PartialEq,
    F: FnMut(&Args) -> R,
{
    pub fn new(compute: F) -> Self {
        Self {
            last: None,
            compute,
            computations: 0,
        }
    }

    pub fn call(&mut self, args: Args) -> &R {
        if self.last.as_ref().is_some_and(|(prev, _)| *prev != args) {
            self.last = None;
        }
        let compute = &mut self.compute;
        let computations = &mut self.computations;
        let (_, result) = self.last.get_or_insert_with(|| {
            *computations += 1;
            let result = compute(&args);
            (args, result)
        });
        result
    }

    /// Drop the stored slot so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn computations(&self) -> usize {
        self.computations
    }
}

impl<Args, R, F> Clone for LastCall<Args, R, F>
where
    Args: Clone,
    R: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            last: self.last.clone(),
            compute: self.compute.clone(),
            computations: self.computations,
        }
    }
}

impl<Args, R, F> fmt::Debug for LastCall<Args, R, F>
where
    Args: fmt::Debug,
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastCall")
            .field("last", &self.last)
            .field("computations", &self.computations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_shares_prefix() {
        let mut table = MemoTable::new(|&(a, b): &(u8, u8)| a as u32 * 100 + b as u32);

        assert_eq!(*table.get((1, 2)), 102);
        assert_eq!(*table.get((1, 3)), 103);
        assert_eq!(*table.get((2, 2)), 202);

        // Two first-level entries, three leaves.
        assert_eq!(table.table.len(), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.computations(), 3);
    }

    #[test]
    fn test_memo_three_arguments() {
        let mut table = MemoTable::new(|&(a, b, c): &(u8, bool, char)| format!("{a}{b}{c}"));

        assert_eq!(table.get((1, true, 'x')).as_str(), "1truex");
        assert_eq!(table.get((1, true, 'y')).as_str(), "1truey");
        assert_eq!(table.get((1, true, 'x')).as_str(), "1truex");
        assert_eq!(table.len(), 2);
        assert_eq!(table.computations(), 2);
    }

    #[test]
    fn test_last_call_first_call_computes() {
        let mut slot = LastCall::new(|&(x, y): &(f64, usize)| x + y as f64);
        assert_eq!(slot.computations(), 0);
        assert_eq!(*slot.call((1.5, 2)), 3.5);
        assert_eq!(slot.computations(), 1);
    }

    #[test]
    fn test_last_call_invalidate() {
        let mut slot = LastCall::new(|&(x,): &(u32,)| x + 1);
        slot.call((1,));
        slot.invalidate();
        slot.call((1,));
        assert_eq!(slot.computations(), 2);
    }

    #[test]
    fn test_last_call_replaces_slot_on_new_args() {
        let mut slot = LastCall::new(|&(x,): &(u32,)| x * 10);
        assert_eq!(*slot.call((1,)), 10);
        assert_eq!(*slot.call((2,)), 20);
        assert_eq!(*slot.call((2,)), 20);
        assert_eq!(*slot.call((1,)), 10);
        assert_eq!(slot.computations(), 3);
    }
}
