//! `cw create` — add a card to the bottom of a column.

use crate::cmd::{CardView, card_line, parse_column, parse_priority, write_card};
use crate::output::{fail, render_mode};
use crate::session::Session;
use cardwall_core::model::tags;
use cardwall_core::{Column, NewTask, Priority};
use clap::Args;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Service whose board gets the card.
    pub service: String,

    /// Title of the new card.
    #[arg(short, long)]
    pub title: String,

    /// Column to create in (default: new).
    #[arg(short, long, value_parser = parse_column)]
    pub column: Option<Column>,

    /// Tags to attach (comma-separated or repeated).
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Description text.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority; stored as the matching card color.
    #[arg(short, long, value_parser = parse_priority, conflicts_with = "color")]
    pub priority: Option<Priority>,

    /// Raw card color, e.g. "#0079bf".
    #[arg(long)]
    pub color: Option<String>,

    /// User ids to assign (repeatable).
    #[arg(long = "assign")]
    pub assignees: Vec<String>,
}

impl CreateArgs {
    fn new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            column: self.column,
            tags: tags::normalize(&self.tags),
            description: self.description.clone(),
            color: self
                .priority
                .map(|p| p.color().to_string())
                .or_else(|| self.color.clone()),
            assignees: self.assignees.clone(),
        }
    }
}

pub fn run_create(args: &CreateArgs, session: &Session) -> anyhow::Result<()> {
    let mut sync = session.open(&args.service)?;
    let task = sync
        .create_task(args.new_task())
        .map_err(|e| fail(session.output(), e))?;

    render_mode(
        session.output(),
        &CardView::new(&task),
        |view, w| writeln!(w, "{}", card_line(view.task)),
        |view, w| {
            writeln!(w, "✓ Created card {}", view.task.id)?;
            write_card(w, view.task)
        },
    )
}
