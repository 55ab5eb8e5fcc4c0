pub mod board;
pub mod completions;
pub mod create;
pub mod delete;
pub mod edit;
pub mod move_cmd;
pub mod stats;
pub mod whoami;

use crate::output::pretty_kv;
use cardwall_core::{Column, Priority, Task};
use serde::Serialize;
use std::io::{self, Write};

/// A card as printed by the CLI: the stored fields plus its derived priority.
#[derive(Debug, Serialize)]
pub struct CardView<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl<'a> CardView<'a> {
    pub fn new(task: &'a Task) -> Self {
        Self {
            task,
            priority: task.priority(),
        }
    }
}

/// One tab-separated line per card, for pipes and agents.
pub fn card_line(task: &Task) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        task.id,
        task.column,
        task.order,
        task.title,
        task.tags.join(",")
    )
}

/// Multi-line card block for humans.
pub fn write_card(w: &mut dyn Write, task: &Task) -> io::Result<()> {
    pretty_kv(w, "ID", &task.id)?;
    pretty_kv(w, "Title", &task.title)?;
    pretty_kv(
        w,
        "Column",
        format!("{} (#{})", task.column.label(), task.order),
    )?;
    if let Some(priority) = task.priority() {
        pretty_kv(w, "Priority", priority.as_str())?;
    } else if let Some(color) = &task.color {
        pretty_kv(w, "Color", color)?;
    }
    if !task.tags.is_empty() {
        pretty_kv(w, "Tags", task.tags.join(", "))?;
    }
    if !task.assignees.is_empty() {
        pretty_kv(w, "Assigned", task.assignees.join(", "))?;
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(w)?;
        writeln!(w, "{description}")?;
    }
    Ok(())
}

/// Accepts the column spellings the web board shows as well as the stored ones.
pub fn parse_column(raw: &str) -> Result<Column, String> {
    raw.parse::<Column>().map_err(|e| e.to_string())
}

pub fn parse_priority(raw: &str) -> Result<Priority, String> {
    raw.parse::<Priority>().map_err(|e| e.to_string())
}
