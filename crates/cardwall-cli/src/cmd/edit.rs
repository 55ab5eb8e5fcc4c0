//! `cw edit` — change a card's fields, and optionally its column.

use crate::cmd::{CardView, card_line, parse_column, parse_priority, write_card};
use crate::output::{fail, render_mode};
use crate::session::Session;
use cardwall_core::model::tags;
use cardwall_core::{BoardError, Column, Priority, Task};
use clap::Args;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Service whose board holds the card.
    pub service: String,

    /// Card id.
    pub task: String,

    /// New title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description. Pass an empty string to clear it.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Move the card to this column as part of the edit.
    #[arg(short, long, value_parser = parse_column)]
    pub column: Option<Column>,

    /// Replace the tags (comma-separated or repeated).
    #[arg(long = "tag", value_delimiter = ',', conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove every tag.
    #[arg(long)]
    pub clear_tags: bool,

    /// New priority; stored as the matching card color.
    #[arg(short, long, value_parser = parse_priority, conflicts_with = "color")]
    pub priority: Option<Priority>,

    /// New raw card color.
    #[arg(long)]
    pub color: Option<String>,

    /// Replace the assigned user ids (repeatable).
    #[arg(long = "assign")]
    pub assignees: Vec<String>,
}

impl EditArgs {
    /// Apply the requested changes; unspecified fields keep their value.
    fn apply(&self, mut task: Task) -> Task {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone()).filter(|d| !d.is_empty());
        }
        if let Some(column) = self.column {
            task.column = column;
        }
        if self.clear_tags {
            task.tags.clear();
        } else if !self.tags.is_empty() {
            task.tags = tags::normalize(&self.tags);
        }
        if let Some(priority) = self.priority {
            task.color = Some(priority.color().to_string());
        } else if let Some(color) = &self.color {
            task.color = Some(color.clone()).filter(|c| !c.is_empty());
        }
        if !self.assignees.is_empty() {
            task.assignees.clone_from(&self.assignees);
        }
        task
    }
}

pub fn run_edit(args: &EditArgs, session: &Session) -> anyhow::Result<()> {
    let output = session.output();
    let mut sync = session.open(&args.service)?;

    let Some(current) = sync.board().get(&args.task).cloned() else {
        return Err(fail(
            output,
            BoardError::TaskNotFound {
                task_id: args.task.clone(),
            },
        ));
    };

    sync.update_task(args.apply(current))
        .map_err(|e| fail(output, e))?;

    let Some(task) = sync.board().get(&args.task) else {
        anyhow::bail!("card {} vanished after update", args.task);
    };
    render_mode(
        output,
        &CardView::new(task),
        |view, w| writeln!(w, "{}", card_line(view.task)),
        |view, w| {
            writeln!(w, "✓ Updated card {}", view.task.id)?;
            write_card(w, view.task)
        },
    )
}
