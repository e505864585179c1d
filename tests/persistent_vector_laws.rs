//! Property-based tests for PersistentVector laws.
//!
//! Every operation is checked against a plain `Vec` model, and every result
//! must pass the structural checks of `verify`.

use proptest::prelude::*;
use rrb_vector::persistent::PersistentVector;

#[derive(Clone, Debug)]
enum Operation {
    Push(i32),
    Pop,
    Update(usize, i32),
    PushFront(i32),
    Append(Vec<i32>),
    Slice(usize, usize),
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => any::<i32>().prop_map(Operation::Push),
        2 => Just(Operation::Pop),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(index, value)| Operation::Update(index, value)),
        1 => any::<i32>().prop_map(Operation::PushFront),
        1 => prop::collection::vec(any::<i32>(), 0..300).prop_map(Operation::Append),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Operation::Slice(a, b)),
    ]
}

fn apply(
    vector: &PersistentVector<i32>,
    model: &mut Vec<i32>,
    operation: Operation,
) -> PersistentVector<i32> {
    match operation {
        Operation::Push(value) => {
            model.push(value);
            vector.push_back(value)
        }
        Operation::Pop => match vector.pop_back() {
            Some((rest, value)) => {
                assert_eq!(model.pop(), Some(value));
                rest
            }
            None => {
                assert!(model.is_empty());
                vector.clone()
            }
        },
        Operation::Update(index, value) => {
            if model.is_empty() {
                assert!(vector.update(index, value).is_none());
                return vector.clone();
            }
            let index = index % model.len();
            model[index] = value;
            vector.update(index, value).unwrap()
        }
        Operation::PushFront(value) => {
            model.insert(0, value);
            vector.push_front(value)
        }
        Operation::Append(values) => {
            model.extend(values.iter().copied());
            vector.append(&values.into_iter().collect())
        }
        Operation::Slice(a, b) => {
            let length = model.len() + 1;
            let (start, end) = {
                let (a, b) = (a % length, b % length);
                (a.min(b), a.max(b))
            };
            *model = model[start..end].to_vec();
            vector.slice(start, end).unwrap()
        }
    }
}

proptest! {
    #[test]
    fn prop_collect_matches_model(elements in prop::collection::vec(any::<i32>(), 0..3000)) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        prop_assert_eq!(vector.len(), elements.len());
        prop_assert_eq!(vector.verify(), Ok(()));
        prop_assert!(vector.iter().eq(elements.iter()));
    }

    #[test]
    fn prop_get_update_law(
        elements in prop::collection::vec(any::<i32>(), 1..2000),
        index in any::<usize>(),
        value in any::<i32>(),
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let index = index % vector.len();
        let updated = vector.update(index, value).unwrap();

        prop_assert_eq!(updated.get(index), Some(&value));
        prop_assert_eq!(vector.get(index), Some(&elements[index]));
        for other in (0..vector.len()).filter(|&other| other != index) {
            prop_assert_eq!(updated.get(other), vector.get(other));
        }
    }

    #[test]
    fn prop_push_pop_law(
        elements in prop::collection::vec(any::<i32>(), 0..2000),
        value in any::<i32>(),
    ) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let (popped, last) = vector.push_back(value).pop_back().unwrap();
        prop_assert_eq!(last, value);
        prop_assert_eq!(&popped, &vector);
        prop_assert_eq!(popped.verify(), Ok(()));
    }

    #[test]
    fn prop_operation_sequences_match_model(
        initial in prop::collection::vec(any::<i32>(), 0..500),
        operations in prop::collection::vec(operation_strategy(), 1..40),
    ) {
        let mut model = initial.clone();
        let mut vector: PersistentVector<i32> = initial.into_iter().collect();
        for operation in operations {
            vector = apply(&vector, &mut model, operation);
            prop_assert_eq!(vector.verify(), Ok(()));
            prop_assert_eq!(vector.len(), model.len());
        }
        prop_assert!(vector.iter().eq(model.iter()));
    }

    #[test]
    fn prop_into_iter_matches_iter(elements in prop::collection::vec(any::<i32>(), 0..1500)) {
        let vector: PersistentVector<i32> = elements.iter().copied().collect();
        let owned: Vec<i32> = vector.clone().into_iter().collect();
        prop_assert_eq!(owned, elements);
    }
}
