pub mod service;
pub mod tags;
pub mod task;

pub use service::{Service, UserRef};
pub use task::{Column, NewTask, Priority, Task};
