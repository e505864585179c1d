//! Tests for concatenation, slicing and capability dispatch.

use std::collections::VecDeque;

use rrb_vector::prelude::*;
use rstest::rstest;

#[rstest]
#[case(0, 0)]
#[case(0, 5)]
#[case(5, 0)]
#[case(1, 1)]
#[case(32, 32)]
#[case(33, 33)]
#[case(100, 1)]
#[case(1, 100)]
#[case(1057, 1057)]
#[case(2000, 35)]
#[case(35, 2000)]
#[case(40_000, 777)]
fn test_append_sizes(#[case] left_size: usize, #[case] right_size: usize) {
    let left: PersistentVector<usize> = (0..left_size).collect();
    let right: PersistentVector<usize> = (left_size..left_size + right_size).collect();
    let joined = left.append(&right);

    assert_eq!(joined.len(), left_size + right_size);
    assert_eq!(joined.verify(), Ok(()));
    assert!(joined.iter().copied().eq(0..left_size + right_size));
}

#[rstest]
fn test_append_of_slices_restores_vector() {
    let vector: PersistentVector<usize> = (0..10_000).collect();
    for cut in [1, 31, 32, 33, 999, 1024, 1025, 5000, 9968, 9999] {
        let head = vector.slice(0, cut).unwrap();
        let rest = vector.slice(cut, vector.len()).unwrap();
        let joined = head.append(&rest);
        assert_eq!(joined.verify(), Ok(()));
        assert_eq!(joined, vector);
    }
}

#[rstest]
fn test_repeated_small_appends_stay_shallow() {
    let piece: PersistentVector<usize> = (0..7).collect();
    let mut vector = PersistentVector::new();
    for _ in 0..2000 {
        vector = vector.append(&piece);
    }
    assert_eq!(vector.len(), 14_000);
    assert_eq!(vector.verify(), Ok(()));
    assert!(vector.iter().copied().eq((0..2000).flat_map(|_| 0..7)));
}

#[rstest]
fn test_operations_after_append() {
    let left: PersistentVector<usize> = (0..100).collect();
    let right: PersistentVector<usize> = (100..1300).collect();
    let mut vector = left.append(&right);

    vector = vector.update(50, 0).unwrap();
    vector = vector.push_back_many(1300..3000);
    let (rest, last) = vector.pop_back().unwrap();
    assert_eq!(last, 2999);
    assert_eq!(rest.verify(), Ok(()));
    assert_eq!(rest.get(50), Some(&0));
    assert_eq!(rest.get(51), Some(&51));
    assert_eq!(rest.get(2998), Some(&2998));
}

#[rstest]
fn test_nested_slices() {
    let vector: PersistentVector<usize> = (0..20_000).collect();
    let outer = vector.slice(1000, 19_000).unwrap();
    let inner = outer.slice(500, 10_000).unwrap();
    assert_eq!(inner.verify(), Ok(()));
    assert!(inner.iter().copied().eq(1500..11_000));
}

#[rstest]
fn test_slice_range_errors() {
    let vector: PersistentVector<usize> = (0..10).collect();
    assert_eq!(
        vector.slice(3, 2),
        Err(VectorError::InvalidRange {
            start: 3,
            end: 2,
            length: 10
        })
    );
    assert!(vector.slice(0, 11).is_err());
    assert_eq!(vector.slice(10, 10).map(|sliced| sliced.len()), Ok(0));
}

// =============================================================================
// Capability dispatch
// =============================================================================

struct Opaque;

impl VectorLike<u32> for Opaque {}

struct Countdown(u32);

impl VectorLike<u32> for Countdown {
    fn sequence(&self) -> Option<Sequence<'_, u32>> {
        Some(Box::new(COUNTDOWN[..self.0 as usize].iter()))
    }
}

static COUNTDOWN: [u32; 5] = [5, 4, 3, 2, 1];

#[rstest]
fn test_splice_persistent_operands() {
    let left: PersistentVector<u32> = (0..600).collect();
    let right: PersistentVector<u32> = (600..700).collect();
    assert_eq!(splice(&left, &right), Ok(left.append(&right)));
}

#[rstest]
fn test_splice_with_sequence_operands() {
    let vector: PersistentVector<u32> = (0..3).collect();
    let deque: VecDeque<u32> = VecDeque::from(vec![7, 8]);

    let joined = splice(&vector, &Countdown(2)).unwrap();
    assert!(joined.iter().copied().eq([0, 1, 2, 5, 4]));

    let joined = splice(&Countdown(5), &vector).unwrap();
    assert!(joined.iter().copied().eq([5, 4, 3, 2, 1, 0, 1, 2]));

    let joined = splice(&deque, &[9_u32, 10]).unwrap();
    assert!(joined.iter().copied().eq([7, 8, 9, 10]));
}

#[rstest]
fn test_slice_sequence_operand() {
    let sliced = slice(&Countdown(5), 1, 4).unwrap();
    assert!(sliced.iter().copied().eq([4, 3, 2]));
    assert_eq!(
        slice(&Countdown(5), 4, 6),
        Err(VectorError::InvalidRange {
            start: 4,
            end: 6,
            length: 5
        })
    );
}

#[rstest]
fn test_missing_capability() {
    let vector: PersistentVector<u32> = (0..3).collect();
    for error in [
        splice(&vector, &Opaque).unwrap_err(),
        splice(&Opaque, &vector).unwrap_err(),
        slice(&Opaque, 0, 0).unwrap_err(),
    ] {
        match error {
            VectorError::MissingCapability { type_name } => {
                assert!(type_name.contains("Opaque"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[rstest]
fn test_trait_methods_dispatch() {
    let vector: PersistentVector<u32> = (0..100).collect();
    let values: Vec<u32> = (100..150).collect();
    let joined = vector.splice_with(&values).unwrap();
    assert!(joined.iter().copied().eq(0..150));

    let sliced = values.slice_range(10, 20).unwrap();
    assert!(sliced.iter().copied().eq(110..120));
}

#[rstest]
fn test_prelude_leaves_std_splice_callable() {
    let mut values: Vec<u32> = vec![1, 4];
    let removed: Vec<u32> = values.splice(1..1, [2, 3]).collect();
    assert!(removed.is_empty());
    assert_eq!(values, [1, 2, 3, 4]);

    let joined = values.splice_with(&[5_u32][..]).unwrap();
    assert!(joined.iter().copied().eq(1..=5));
}

#[rstest]
fn test_logged_operations_behave_identically() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let _guard = tracing_subscriber::registry()
        .with(EnvFilter::new("rrb_vector=trace"))
        .with(fmt::layer().with_test_writer())
        .set_default();

    let left: PersistentVector<u32> = (0..90).collect();
    let right: PersistentVector<u32> = (90..5000).collect();
    let joined = splice(&left, &right).unwrap();
    let extended = splice(&joined, &vec![5000_u32, 5001]).unwrap();
    let mut transient = extended.transient();
    transient.push_back(5002).unwrap();
    let vector = transient.persist().unwrap();

    assert_eq!(vector.verify(), Ok(()));
    assert!(vector.iter().copied().eq(0..5003));
}
