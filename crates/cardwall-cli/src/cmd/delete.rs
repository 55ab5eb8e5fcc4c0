//! `cw delete` — remove a card and close the gap it leaves.

use crate::cmd::CardView;
use crate::output::{fail, render};
use crate::session::Session;
use clap::Args;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Service whose board holds the card.
    pub service: String,

    /// Card id.
    pub task: String,
}

pub fn run_delete(args: &DeleteArgs, session: &Session) -> anyhow::Result<()> {
    let output = session.output();
    let mut sync = session.open(&args.service)?;
    let removed = sync
        .delete_task(&args.task)
        .map_err(|e| fail(output, e))?;

    render(output, &CardView::new(&removed), |view, w| {
        writeln!(
            w,
            "✓ Deleted card {} ({}) from {}",
            view.task.id,
            view.task.title,
            view.task.column.label()
        )
    })
}
