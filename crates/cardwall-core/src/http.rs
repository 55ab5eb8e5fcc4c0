//! Blocking HTTP implementation of [`TaskApi`].

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{CardPayload, TaskApi, TaskBoard};
use crate::error::BoardError;
use crate::model::{Service, Task};

/// Longest remote error body echoed back in an error message.
const MAX_ERROR_BODY: usize = 200;

/// REST client for the tracker backend.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpTaskApi {
    #[must_use]
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("cardwall/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(|t| t.trim().trim_start_matches("Bearer ").to_string()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&CardPayload>,
    ) -> Result<ureq::Response, BoardError> {
        debug!(method, url, "sending request");

        let mut request = self
            .agent
            .request(method, url)
            .set("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        result.map_err(|err| {
            let err = match err {
                ureq::Error::Status(status, response) => BoardError::Remote {
                    method,
                    url: url.to_string(),
                    status,
                    message: error_message(response.into_string().unwrap_or_default()),
                },
                ureq::Error::Transport(transport) => BoardError::Transport {
                    method,
                    url: url.to_string(),
                    message: transport.to_string(),
                },
            };
            warn!(method, url, error = %err, "remote call failed");
            err
        })
    }

    fn json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&CardPayload>,
    ) -> Result<T, BoardError> {
        self.send(method, url, body)?
            .into_json::<T>()
            .map_err(|e| BoardError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

impl TaskApi for HttpTaskApi {
    fn fetch_service(&self, service_id: &str) -> Result<Service, BoardError> {
        self.json("GET", &self.url(&format!("/service/{service_id}")), None)
    }

    fn fetch_task_board(&self, task_board_id: &str) -> Result<TaskBoard, BoardError> {
        self.json(
            "GET",
            &self.url(&format!("/tasks/task-board/{task_board_id}")),
            None,
        )
    }

    fn create_card(&self, task_board_id: &str, card: &CardPayload) -> Result<Task, BoardError> {
        self.json(
            "POST",
            &self.url(&format!("/service/{task_board_id}/cards")),
            Some(card),
        )
    }

    fn patch_task(
        &self,
        task_board_id: &str,
        task_id: &str,
        card: &CardPayload,
    ) -> Result<Task, BoardError> {
        self.json(
            "PATCH",
            &self.url(&format!("/service/{task_board_id}/tasks/{task_id}")),
            Some(card),
        )
    }

    fn delete_task(&self, task_board_id: &str, task_id: &str) -> Result<(), BoardError> {
        self.send(
            "DELETE",
            &self.url(&format!("/service/{task_board_id}/tasks/{task_id}")),
            None,
        )
        .map(drop)
    }
}

/// Prefer the backend's `{"message": ...}` field; otherwise a trimmed body.
fn error_message(body: String) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(&body) {
        if let Some(serde_json::Value::String(message)) = map.get("message") {
            return message.clone();
        }
    }
    let body = body.trim();
    if body.chars().count() > MAX_ERROR_BODY {
        let cut: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{cut}…")
    } else {
        body.to_string()
    }
}
