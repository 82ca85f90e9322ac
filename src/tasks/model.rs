//! JSON request and response bodies for the task endpoints.

use super::entity::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub name: String,
    pub status_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            status_id: task.status_id,
            description: task.description,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Body of create and update requests.
///
/// Missing fields take their zero value, so `{}` decodes to the empty request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpsertTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub status_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpsertTaskRequest {
    /// Every field is at its zero value. An empty description counts as absent.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_empty()
            && self.status_id == 0
            && self.description.as_deref().is_none_or(str::is_empty)
    }

    /// Checks the request against the id taken from the path.
    ///
    /// Valid requests are non-empty and either carry no id with no path id
    /// (create) or carry the same id as the path (update).
    pub fn is_valid(&self, path_id: Option<i64>) -> bool {
        if self.is_empty() {
            return false;
        }
        match (path_id, self.id) {
            (None, None) => true,
            (Some(path_id), Some(body_id)) => path_id == body_id,
            _ => false,
        }
    }

    pub fn into_entity(self) -> Task {
        let description = self.description.filter(|d| !d.is_empty());
        Task::candidate(self.name, self.status_id, description).with_id(self.id.unwrap_or_default())
    }
}

/// Body of the bulk delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(id: Option<i64>, name: &str) -> UpsertTaskRequest {
        UpsertTaskRequest {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_request_is_invalid() {
        assert!(!UpsertTaskRequest::default().is_valid(None));
        assert!(!UpsertTaskRequest::default().is_valid(Some(1)));

        let blank_description = UpsertTaskRequest {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(!blank_description.is_valid(None));
    }

    #[test]
    fn test_create_requires_no_id_anywhere() {
        assert!(request(None, "a").is_valid(None));
        assert!(!request(Some(1), "a").is_valid(None));
    }

    #[test]
    fn test_update_requires_matching_ids() {
        assert!(request(Some(3), "a").is_valid(Some(3)));
        assert!(!request(Some(4), "a").is_valid(Some(3)));
        assert!(!request(None, "a").is_valid(Some(3)));
    }

    #[test]
    fn test_id_alone_makes_request_non_empty() {
        assert!(request(Some(0), "").is_valid(Some(0)));
    }

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let parsed: UpsertTaskRequest = serde_json::from_value(json!({"name": "n"})).unwrap();
        assert_eq!(parsed, request(None, "n"));

        let parsed: UpsertTaskRequest =
            serde_json::from_value(json!({"id": 2, "statusId": 5, "description": "d"})).unwrap();
        assert_eq!(parsed.id, Some(2));
        assert_eq!(parsed.status_id, 5);
        assert_eq!(parsed.description.as_deref(), Some("d"));
    }

    #[test]
    fn test_into_entity_drops_blank_description() {
        let entity = UpsertTaskRequest {
            id: Some(9),
            name: "n".into(),
            status_id: 2,
            description: Some(String::new()),
        }
        .into_entity();
        assert_eq!(entity.id, 9);
        assert_eq!(entity.description, None);
    }

    #[test]
    fn test_response_uses_camel_case_and_omits_missing_description() {
        let response = TaskResponse::from(Task::candidate("n", 4, None).with_id(1));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["statusId"], 4);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("description").is_none());
    }
}
