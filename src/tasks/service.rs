//! Maps between wire DTOs and stored entities.

use super::model::{TaskResponse, UpsertTaskRequest};
use super::repository::TaskRepository;
use crate::error::{Error, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    pub fn get_by_id(&self, id: i64) -> Result<TaskResponse> {
        Ok(self.repository.get_by_id(id)?.into())
    }

    pub fn get_all(&self) -> Vec<TaskResponse> {
        self.repository
            .get_all()
            .into_iter()
            .map(TaskResponse::from)
            .collect()
    }

    /// Insert when the request carries no id, update otherwise.
    ///
    /// The update path returns the record as it was before the update.
    pub fn upsert(&self, request: UpsertTaskRequest) -> Result<TaskResponse> {
        let is_update = request.id.is_some();
        let task = request.into_entity();

        let task = if is_update {
            self.repository.update(task)?
        } else {
            self.repository.insert(task)?
        };
        Ok(task.into())
    }

    pub fn remove_by_id(&self, id: i64) -> Result<()> {
        self.repository.remove_by_id(id)?;
        Ok(())
    }

    pub fn remove_by_ids(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("ids must not be empty"));
        }
        self.repository.remove_by_ids(ids)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{InMemoryTaskRepository, Task};

    fn service_with(tasks: Vec<Task>) -> TaskService {
        TaskService::new(Arc::new(InMemoryTaskRepository::new().with_tasks(tasks)))
    }

    #[test]
    fn test_upsert_without_id_inserts() {
        let service = service_with(vec![]);
        let created = service
            .upsert(UpsertTaskRequest {
                name: "write docs".into(),
                status_id: 1,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(created.name, "write docs");
        assert_eq!(service.get_by_id(created.id).unwrap(), created);
    }

    #[test]
    fn test_upsert_with_id_updates_and_returns_previous() {
        let service = service_with(vec![Task::candidate("old", 0, None).with_id(1)]);
        let returned = service
            .upsert(UpsertTaskRequest {
                id: Some(1),
                name: "new".into(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(returned.name, "old");
        assert_eq!(service.get_by_id(1).unwrap().name, "new");
    }

    #[test]
    fn test_upsert_propagates_kinds() {
        let service = service_with(vec![Task::candidate("same", 0, None).with_id(1)]);
        let unchanged = UpsertTaskRequest {
            id: Some(1),
            name: "same".into(),
            ..Default::default()
        };
        assert_eq!(service.upsert(unchanged).unwrap_err(), Error::NotModified);

        let missing = UpsertTaskRequest {
            id: Some(2),
            name: "x".into(),
            ..Default::default()
        };
        assert_eq!(service.upsert(missing).unwrap_err(), Error::NotFound);
    }

    #[test]
    fn test_upsert_insert_fails_when_ids_run_out() {
        let service = service_with(vec![Task::candidate("last", 0, None).with_id(i64::MAX)]);
        let request = UpsertTaskRequest {
            name: "one more".into(),
            ..Default::default()
        };
        assert!(matches!(service.upsert(request), Err(Error::Internal(_))));
    }

    #[test]
    fn test_remove_by_ids_rejects_empty_batch() {
        let service = service_with(vec![]);
        assert!(matches!(
            service.remove_by_ids(&[]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_get_all_is_ordered() {
        let service = service_with(vec![
            Task::candidate("c", 0, None).with_id(3),
            Task::candidate("a", 0, None).with_id(1),
            Task::candidate("b", 0, None).with_id(2),
        ]);
        let ids: Vec<i64> = service.get_all().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
