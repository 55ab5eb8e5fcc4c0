//! The remote task API as seen by the board.
//!
//! [`TaskApi`] is the seam between board logic and transport. The HTTP
//! implementation lives in [`crate::http`]; tests drive the sync layer with an
//! in-memory implementation.

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::model::{Column, Service, Task};

/// `GET /tasks/task-board/{id}` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskBoard {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub cards: Vec<Task>,
}

/// Body of the create (`POST .../cards`) and update (`PATCH .../tasks/{id}`)
/// requests. Updates always send the full field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardPayload {
    pub title: String,
    pub column: Column,
    pub description: String,
    pub tags: Vec<String>,
    pub color: String,
    pub users: Vec<String>,
    pub order: usize,
}

impl From<&Task> for CardPayload {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            column: task.column,
            description: task.description.clone().unwrap_or_default(),
            tags: task.tags.clone(),
            color: task.color.clone().unwrap_or_default(),
            users: task.assignees.clone(),
            order: task.order,
        }
    }
}

/// Remote operations the board depends on.
pub trait TaskApi {
    /// `GET /service/{service_id}`
    fn fetch_service(&self, service_id: &str) -> Result<Service, BoardError>;

    /// `GET /tasks/task-board/{task_board_id}`
    fn fetch_task_board(&self, task_board_id: &str) -> Result<TaskBoard, BoardError>;

    /// `POST /service/{task_board_id}/cards`
    fn create_card(&self, task_board_id: &str, card: &CardPayload) -> Result<Task, BoardError>;

    /// `PATCH /service/{task_board_id}/tasks/{task_id}`
    fn patch_task(
        &self,
        task_board_id: &str,
        task_id: &str,
        card: &CardPayload,
    ) -> Result<Task, BoardError>;

    /// `DELETE /service/{task_board_id}/tasks/{task_id}`
    fn delete_task(&self, task_board_id: &str, task_id: &str) -> Result<(), BoardError>;
}

impl<T: TaskApi + ?Sized> TaskApi for &T {
    fn fetch_service(&self, service_id: &str) -> Result<Service, BoardError> {
        (**self).fetch_service(service_id)
    }

    fn fetch_task_board(&self, task_board_id: &str) -> Result<TaskBoard, BoardError> {
        (**self).fetch_task_board(task_board_id)
    }

    fn create_card(&self, task_board_id: &str, card: &CardPayload) -> Result<Task, BoardError> {
        (**self).create_card(task_board_id, card)
    }

    fn patch_task(
        &self,
        task_board_id: &str,
        task_id: &str,
        card: &CardPayload,
    ) -> Result<Task, BoardError> {
        (**self).patch_task(task_board_id, task_id, card)
    }

    fn delete_task(&self, task_board_id: &str, task_id: &str) -> Result<(), BoardError> {
        (**self).delete_task(task_board_id, task_id)
    }
}
