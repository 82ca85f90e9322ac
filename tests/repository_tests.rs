//! Integration tests for the in-memory task repository.
//!
//! A manual clock makes timestamp changes observable.

use chrono::{DateTime, Duration, Utc};
use dalil::clock::{Clock, ManualClock};
use dalil::tasks::{FIRST_TASK_ID, InMemoryTaskRepository, RepositoryError, Task, TaskRepository};
use std::sync::Arc;

fn setup_repo() -> (InMemoryTaskRepository, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
    ));
    let repo = InMemoryTaskRepository::new().with_clock(clock.clone());
    (repo, clock)
}

fn seeded() -> (InMemoryTaskRepository, Arc<ManualClock>, Task) {
    let (repo, clock) = setup_repo();
    let stored = repo.insert(Task::candidate("A", 0, Some("d".into()))).unwrap();
    (repo, clock, stored)
}

mod insert_tests {
    use super::*;

    #[test]
    fn insert_assigns_sequence_and_timestamps() {
        let (repo, clock) = setup_repo();
        let task = repo.insert(Task::candidate("write", 1, None)).unwrap();

        assert_eq!(task.id, FIRST_TASK_ID);
        assert_eq!(task.created_at, clock.now());
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(repo.get_by_id(task.id).unwrap(), task);
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let (repo, _) = setup_repo();
        let first = repo.insert(Task::candidate("a", 0, None)).unwrap();
        repo.remove_by_id(first.id).unwrap();
        let second = repo.insert(Task::candidate("b", 0, None)).unwrap();

        assert!(second.id > first.id);
        assert_eq!(second.id, first.id + 1);
    }
}

mod sequence_tests {
    use super::*;

    #[test]
    fn seeding_max_id_does_not_overflow() {
        let repo = InMemoryTaskRepository::new()
            .with_tasks([Task::candidate("a", 0, None).with_id(i64::MAX)]);

        assert_eq!(repo.get_by_id(i64::MAX).unwrap().name, "a");
        assert_eq!(
            repo.insert(Task::candidate("b", 0, None)),
            Err(RepositoryError::SequenceExhausted)
        );
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn exhausted_sequence_stays_exhausted_after_removal() {
        let repo = InMemoryTaskRepository::new()
            .with_tasks([Task::candidate("a", 0, None).with_id(i64::MAX)]);
        repo.remove_by_id(i64::MAX).unwrap();

        assert_eq!(
            repo.insert(Task::candidate("b", 0, None)),
            Err(RepositoryError::SequenceExhausted)
        );
    }
}

mod read_tests {
    use super::*;

    #[test]
    fn get_by_id_missing_is_not_found() {
        let (repo, _) = setup_repo();
        assert_eq!(repo.get_by_id(42), Err(RepositoryError::NotFound(42)));
    }

    #[test]
    fn get_all_orders_by_ascending_id() {
        let repo = InMemoryTaskRepository::new().with_tasks([
            Task::candidate("c", 0, None).with_id(30),
            Task::candidate("a", 0, None).with_id(1),
            Task::candidate("b", 0, None).with_id(7),
        ]);
        repo.insert(Task::candidate("d", 0, None)).unwrap();

        let ids: Vec<i64> = repo.get_all().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 7, 30, 31]);
    }

    #[test]
    fn get_all_on_empty_repository_is_empty() {
        let (repo, _) = setup_repo();
        assert!(repo.get_all().is_empty());
    }
}

mod update_tests {
    use super::*;

    #[test]
    fn identical_candidate_is_not_modified() {
        let (repo, clock, stored) = seeded();
        clock.advance(Duration::minutes(5));

        let result = repo.update(Task::candidate("A", 0, Some("d".into())).with_id(stored.id));

        assert_eq!(result, Err(RepositoryError::NotModified(Box::new(stored.clone()))));
        assert_eq!(repo.get_by_id(stored.id).unwrap(), stored);
    }

    #[test]
    fn changed_candidate_bumps_updated_at_only() {
        let (repo, clock, stored) = seeded();
        clock.advance(Duration::minutes(5));

        let previous = repo
            .update(Task::candidate("B", 0, Some("d".into())).with_id(stored.id))
            .unwrap();
        let current = repo.get_by_id(stored.id).unwrap();

        assert_eq!(previous, stored);
        assert_eq!(current.name, "B");
        assert_eq!(current.created_at, stored.created_at);
        assert_eq!(current.updated_at, stored.updated_at + Duration::minutes(5));
    }

    #[test]
    fn each_content_field_counts_as_a_change() {
        let (repo, _, stored) = seeded();
        let candidates = [
            Task::candidate("A", 3, Some("d".into())),
            Task::candidate("A", 3, None),
            Task::candidate("Z", 3, None),
        ];
        for candidate in candidates {
            assert!(repo.update(candidate.with_id(stored.id)).is_ok());
        }
    }

    #[test]
    fn update_missing_is_not_found() {
        let (repo, _) = setup_repo();
        let result = repo.update(Task::candidate("x", 0, None).with_id(9));
        assert_eq!(result, Err(RepositoryError::NotFound(9)));
        assert!(repo.is_empty());
    }

    #[test]
    fn candidate_timestamps_are_ignored() {
        let (repo, _, stored) = seeded();
        let mut candidate = Task::candidate("B", 0, None).with_id(stored.id);
        candidate.created_at = DateTime::<Utc>::UNIX_EPOCH;

        repo.update(candidate).unwrap();
        assert_eq!(repo.get_by_id(stored.id).unwrap().created_at, stored.created_at);
    }
}

mod remove_tests {
    use super::*;

    #[test]
    fn remove_by_id_returns_removed_record() {
        let (repo, _, stored) = seeded();
        assert_eq!(repo.remove_by_id(stored.id).unwrap(), stored);
        assert_eq!(repo.get_by_id(stored.id), Err(RepositoryError::NotFound(stored.id)));
        assert_eq!(repo.remove_by_id(stored.id), Err(RepositoryError::NotFound(stored.id)));
    }

    #[test]
    fn remove_by_ids_returns_records_in_input_order() {
        let repo = InMemoryTaskRepository::new().with_tasks([
            Task::candidate("a", 0, None).with_id(1),
            Task::candidate("b", 0, None).with_id(2),
            Task::candidate("c", 0, None).with_id(3),
        ]);

        let removed = repo.remove_by_ids(&[3, 1]).unwrap();
        let ids: Vec<i64> = removed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn remove_by_ids_with_missing_id_removes_nothing() {
        let repo = InMemoryTaskRepository::new()
            .with_tasks([Task::candidate("a", 0, None).with_id(1)]);

        assert_eq!(repo.remove_by_ids(&[1, 999]), Err(RepositoryError::NotFound(999)));
        assert!(repo.get_by_id(1).is_ok());
    }

    #[test]
    fn remove_by_ids_with_repeated_id_removes_nothing() {
        let repo = InMemoryTaskRepository::new()
            .with_tasks([Task::candidate("a", 0, None).with_id(1)]);

        assert_eq!(repo.remove_by_ids(&[1, 1]), Err(RepositoryError::NotFound(1)));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn remove_by_ids_empty_batch_is_noop() {
        let (repo, _, _) = seeded();
        assert!(repo.remove_by_ids(&[]).unwrap().is_empty());
        assert_eq!(repo.len(), 1);
    }
}

mod concurrency_tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn concurrent_inserts_get_distinct_ids() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let ids: HashSet<i64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|worker| {
                    let repo = Arc::clone(&repo);
                    s.spawn(move || {
                        (0..50)
                            .map(|n| {
                                repo.insert(Task::candidate(format!("{worker}-{n}"), 0, None))
                                    .unwrap()
                                    .id
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(ids.len(), 400);
        assert_eq!(repo.len(), 400);
    }
}
