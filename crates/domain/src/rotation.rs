use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use derive_more::{Deref, Display};
use log::debug;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{CatalogRepository, Exercise, Muscle, ReadError, StorageError};

/// Number of exercises handed out per request.
#[derive(Deref, Display, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    pub const DEFAULT: BatchSize = BatchSize(2);

    pub fn new(value: usize) -> Result<Self, BatchSizeError> {
        if value == 0 {
            return Err(BatchSizeError::Zero);
        }
        Ok(Self(value))
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BatchSizeError {
    #[error("Batch size must be greater than 0")]
    Zero,
}

/// Hands out the exercises of each muscle in shuffled cycles.
///
/// Every exercise of a muscle is handed out exactly once before any of them is repeated. The
/// exercises of a muscle are fetched from the catalog on the first request and again whenever
/// the current cycle is used up, and are reshuffled on each fetch.
///
/// The queues of all muscles share one lock, so concurrent callers never interleave within a
/// cycle.
pub struct RotationEngine<R> {
    repository: R,
    state: Mutex<State>,
}

struct State {
    queues: HashMap<Muscle, VecDeque<Exercise>>,
    rng: StdRng,
}

impl<R: CatalogRepository> RotationEngine<R> {
    pub fn new(repository: R) -> Self {
        Self::with_rng(repository, StdRng::from_entropy())
    }

    pub fn with_rng(repository: R, rng: StdRng) -> Self {
        Self {
            repository,
            state: Mutex::new(State {
                queues: HashMap::new(),
                rng,
            }),
        }
    }

    /// Takes up to `limit` exercises from the front of the queue of `muscle`.
    ///
    /// A batch never spans two cycles, so it is shorter than `limit` at the end of a cycle. An
    /// empty batch means that the catalog has no exercise for `muscle`. If the catalog cannot be
    /// read, the queue is left untouched.
    pub fn next_batch(&self, muscle: Muscle, limit: BatchSize) -> Result<Vec<Exercise>, ReadError> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))?;
        let State { queues, rng } = &mut *state;

        if queues.get(&muscle).is_none_or(VecDeque::is_empty) {
            let mut exercises = self.repository.read_exercises(muscle)?;
            exercises.shuffle(rng);
            debug!("refilled {muscle} rotation with {} exercises", exercises.len());
            queues.insert(muscle, exercises.into());
        }

        let queue = queues.entry(muscle).or_default();
        let len = queue.len().min(*limit);

        Ok(queue.drain(..len).collect())
    }

    /// Number of exercises left in the current cycle of `muscle`, if it has been started.
    #[cfg(test)]
    pub fn remaining(&self, muscle: Muscle) -> Option<usize> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.queues.get(&muscle).map(VecDeque::len))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeSet,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::{FakeCatalog, exercise, titles};

    fn engine(catalog: &FakeCatalog) -> RotationEngine<&FakeCatalog> {
        RotationEngine::with_rng(catalog, StdRng::seed_from_u64(7))
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    fn test_batch_size_new(#[case] value: usize) {
        assert_eq!(*BatchSize::new(value).unwrap(), value);
    }

    #[test]
    fn test_batch_size_new_zero() {
        assert_eq!(BatchSize::new(0), Err(BatchSizeError::Zero));
        assert_eq!(*BatchSize::default(), 2);
    }

    #[rstest]
    #[case::fewer_than_limit(1, 2)]
    #[case::divisible(4, 2)]
    #[case::not_divisible(5, 2)]
    #[case::limit_one(3, 1)]
    #[case::limit_above_catalog(3, 10)]
    #[case::larger(17, 4)]
    fn test_next_batch_exhausts_cycle_before_repeating(
        #[case] catalog_size: usize,
        #[case] limit: usize,
    ) {
        let catalog = FakeCatalog::with_exercises(Muscle::Biceps, catalog_size);
        let engine = engine(&catalog);
        let limit = BatchSize::new(limit).unwrap();
        let all = titles(&catalog.exercises(Muscle::Biceps))
            .into_iter()
            .collect::<BTreeSet<_>>();

        let mut dispensed = vec![];
        while dispensed.len() < 3 * catalog_size {
            dispensed.extend(titles(&engine.next_batch(Muscle::Biceps, limit).unwrap()));
        }

        for cycle in dispensed.chunks(catalog_size) {
            assert_eq!(cycle.len(), catalog_size);
            assert_eq!(cycle.iter().cloned().collect::<BTreeSet<_>>(), all);
        }
        assert_eq!(catalog.reads(), 3);
    }

    #[rstest]
    #[case(5, 2, vec![2, 2, 1, 2, 2, 1, 2])]
    #[case(3, 2, vec![2, 1, 2, 1])]
    #[case(3, 3, vec![3, 3, 3])]
    #[case(2, 5, vec![2, 2])]
    fn test_next_batch_length(
        #[case] catalog_size: usize,
        #[case] limit: usize,
        #[case] expected: Vec<usize>,
    ) {
        let catalog = FakeCatalog::with_exercises(Muscle::Core, catalog_size);
        let engine = engine(&catalog);
        let limit = BatchSize::new(limit).unwrap();

        assert_eq!(
            (0..expected.len())
                .map(|_| engine.next_batch(Muscle::Core, limit).unwrap().len())
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_next_batch_three_biceps_exercises() {
        let catalog = FakeCatalog::default().add(
            Muscle::Biceps,
            vec![exercise("A"), exercise("B"), exercise("C")],
        );
        let engine = engine(&catalog);

        let first = engine.next_batch(Muscle::Biceps, BatchSize::DEFAULT).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(engine.remaining(Muscle::Biceps), Some(1));

        let second = engine.next_batch(Muscle::Biceps, BatchSize::DEFAULT).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(engine.remaining(Muscle::Biceps), Some(0));

        let cycle = titles(&first)
            .into_iter()
            .chain(titles(&second))
            .collect::<BTreeSet<_>>();
        assert_eq!(
            cycle,
            BTreeSet::from(["A".to_string(), "B".to_string(), "C".to_string()])
        );

        let third = engine.next_batch(Muscle::Biceps, BatchSize::DEFAULT).unwrap();
        assert_eq!(third.len(), 2);
        assert_eq!(engine.remaining(Muscle::Biceps), Some(1));
        assert_eq!(catalog.reads(), 2);
    }

    #[test]
    fn test_next_batch_keeps_order_within_cycle() {
        let catalog = FakeCatalog::with_exercises(Muscle::Chest, 6);
        let engine = engine(&catalog);
        let reference = RotationEngine::with_rng(&catalog, StdRng::seed_from_u64(7));

        let whole_cycle = reference
            .next_batch(Muscle::Chest, BatchSize::new(6).unwrap())
            .unwrap();
        let batches = (0..3)
            .flat_map(|_| engine.next_batch(Muscle::Chest, BatchSize::DEFAULT).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(batches, whole_cycle);
    }

    #[test]
    fn test_next_batch_separate_muscles() {
        let catalog = FakeCatalog::with_exercises(Muscle::Glutes, 3).add(
            Muscle::Calves,
            vec![exercise("Calf Raise"), exercise("Seated Calf Raise")],
        );
        let engine = engine(&catalog);

        engine.next_batch(Muscle::Glutes, BatchSize::DEFAULT).unwrap();
        let calves = engine.next_batch(Muscle::Calves, BatchSize::DEFAULT).unwrap();

        assert_eq!(calves.len(), 2);
        assert_eq!(engine.remaining(Muscle::Glutes), Some(1));
        assert_eq!(engine.remaining(Muscle::Calves), Some(0));
        assert_eq!(engine.remaining(Muscle::Neck), None);
    }

    #[test]
    fn test_next_batch_empty_catalog() {
        let catalog = FakeCatalog::default();
        let engine = engine(&catalog);

        assert!(engine.next_batch(Muscle::Neck, BatchSize::DEFAULT).unwrap().is_empty());
        assert!(engine.next_batch(Muscle::Neck, BatchSize::DEFAULT).unwrap().is_empty());
        assert_eq!(engine.remaining(Muscle::Neck), Some(0));
        assert_eq!(catalog.reads(), 2);
    }

    #[test]
    fn test_next_batch_catalog_unavailable() {
        let catalog = FakeCatalog::with_exercises(Muscle::Traps, 3);
        let engine = engine(&catalog);

        catalog.set_available(false);

        assert!(matches!(
            engine.next_batch(Muscle::Traps, BatchSize::DEFAULT),
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
        assert_eq!(engine.remaining(Muscle::Traps), None);

        catalog.set_available(true);

        assert_eq!(
            engine.next_batch(Muscle::Traps, BatchSize::DEFAULT).unwrap().len(),
            2
        );
        assert_eq!(engine.remaining(Muscle::Traps), Some(1));
    }

    #[test]
    fn test_next_batch_catalog_unavailable_on_refill() {
        let catalog = FakeCatalog::with_exercises(Muscle::Lats, 2);
        let engine = engine(&catalog);

        engine.next_batch(Muscle::Lats, BatchSize::DEFAULT).unwrap();
        catalog.set_available(false);

        assert!(engine.next_batch(Muscle::Lats, BatchSize::DEFAULT).is_err());
        assert_eq!(engine.remaining(Muscle::Lats), Some(0));

        catalog.set_available(true);

        assert_eq!(
            engine.next_batch(Muscle::Lats, BatchSize::DEFAULT).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_next_batch_same_seed_same_order() {
        let catalog = FakeCatalog::with_exercises(Muscle::Hamstrings, 10);
        let a = RotationEngine::with_rng(&catalog, StdRng::seed_from_u64(42));
        let b = RotationEngine::with_rng(&catalog, StdRng::seed_from_u64(42));
        let limit = BatchSize::new(3).unwrap();

        for _ in 0..8 {
            assert_eq!(
                a.next_batch(Muscle::Hamstrings, limit).unwrap(),
                b.next_batch(Muscle::Hamstrings, limit).unwrap()
            );
        }
    }

    struct SharedCatalog {
        exercises: Vec<Exercise>,
        reads: AtomicUsize,
    }

    impl CatalogRepository for SharedCatalog {
        fn read_exercises(&self, _: Muscle) -> Result<Vec<Exercise>, ReadError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.exercises.clone())
        }
    }

    #[test]
    fn test_next_batch_from_several_threads() {
        let catalog = SharedCatalog {
            exercises: (1..=40).map(|i| exercise(&format!("Exercise {i}"))).collect(),
            reads: AtomicUsize::new(0),
        };
        let engine = RotationEngine::with_rng(&catalog, StdRng::seed_from_u64(3));

        let dispensed = thread::scope(|s| {
            let workers = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..5)
                            .flat_map(|_| {
                                engine.next_batch(Muscle::Back, BatchSize::DEFAULT).unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            workers
                .into_iter()
                .flat_map(|worker| titles(&worker.join().unwrap()))
                .collect::<Vec<_>>()
        });

        assert_eq!(dispensed.len(), 40);
        assert_eq!(
            dispensed.into_iter().collect::<BTreeSet<_>>(),
            titles(&catalog.exercises).into_iter().collect::<BTreeSet<_>>()
        );
        assert_eq!(catalog.reads.load(Ordering::SeqCst), 1);
        assert_eq!(engine.remaining(Muscle::Back), Some(0));
    }
}
