//! cardwall-core library.
//!
//! Board view-model for a project/issue-tracking REST API: the cards of one
//! service grouped into three ordered columns, kept in step with the remote
//! task list, gated by the caller's role on the service.
//!
//! # Conventions
//!
//! - **Errors**: board operations return [`error::BoardError`]; configuration
//!   loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod model;
pub mod roles;
pub mod stats;
pub mod sync;

pub use api::{CardPayload, TaskApi, TaskBoard};
pub use board::BoardState;
pub use error::{BoardError, ErrorCode};
pub use http::HttpTaskApi;
pub use identity::Identity;
pub use model::{Column, NewTask, Priority, Service, Task, UserRef};
pub use roles::{Action, MovePolicy, Roles, Tier};
pub use stats::{ProjectRollup, ServiceStats};
pub use sync::{BoardSync, LoadedBoard, fetch_board};
