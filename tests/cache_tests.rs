//! Memoization cache tests

use std::cell::Cell;

use canvas_tetris::core::{LastCall, MemoTable, SimpleRng};

fn mix(a: u32, b: u32, c: u32) -> u64 {
    (a as u64) * 1_000_003 + (b as u64) * 1_009 + c as u64
}

#[test]
fn test_memo_table_matches_direct_calls() {
    let calls = Cell::new(0);
    let mut table = MemoTable::new(|&(a, b, c): &(u32, u32, u32)| {
        calls.set(calls.get() + 1);
        mix(a, b, c)
    });

    let mut rng = SimpleRng::new(99);
    let mut distinct = Vec::new();
    for _ in 0..500 {
        let args = (rng.next_range(3), rng.next_range(4), rng.next_range(5));
        if !distinct.contains(&args) {
            distinct.push(args);
        }
        assert_eq!(*table.get(args), mix(args.0, args.1, args.2));
    }

    assert_eq!(calls.get(), distinct.len());
    assert_eq!(table.computations(), distinct.len());
    assert_eq!(table.len(), distinct.len());
}

#[test]
fn test_memo_table_shared_prefixes_do_not_collide() {
    let mut table = MemoTable::new(|&(a, b): &(char, u8)| format!("{a}{b}"));

    assert_eq!(table.get(('x', 1)), "x1");
    assert_eq!(table.get(('x', 2)), "x2");
    assert_eq!(table.get(('y', 1)), "y1");
    assert_eq!(table.get(('x', 1)), "x1");
    assert_eq!(table.computations(), 3);
}

#[test]
fn test_memo_table_single_argument() {
    let mut squares = MemoTable::new(|&(n,): &(i64,)| n * n);
    assert!(squares.is_empty());

    for n in [3, -3, 3, 4, -3] {
        assert_eq!(*squares.get((n,)), n * n);
    }
    assert_eq!(squares.len(), 3);
}

#[test]
fn test_last_call_reuses_identical_arguments() {
    let mut cache = LastCall::new(|&(x, y): &(f64, usize)| x * y as f64);

    assert_eq!(*cache.call((1.5, 4)), 6.0);
    assert_eq!(*cache.call((1.5, 4)), 6.0);
    assert_eq!(*cache.call((1.5, 4)), 6.0);
    assert_eq!(cache.computations(), 1);
}

#[test]
fn test_last_call_recomputes_once_per_change() {
    let mut cache = LastCall::new(|&(x,): &(u32,)| x + 1);

    for (x, expected_computations) in [(1, 1), (2, 2), (2, 2), (1, 3), (1, 3), (3, 4)] {
        assert_eq!(*cache.call((x,)), x + 1);
        assert_eq!(cache.computations(), expected_computations);
    }
}

#[test]
fn test_last_call_invalidate_forces_recompute() {
    let mut cache = LastCall::new(|&(x,): &(u32,)| x * 10);
    cache.call((2,));
    cache.invalidate();
    assert_eq!(*cache.call((2,)), 20);
    assert_eq!(cache.computations(), 2);
}
