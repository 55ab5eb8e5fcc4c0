//! `cw move` — move a card to the bottom of another column.

use crate::cmd::{CardView, card_line, parse_column};
use crate::output::{fail, render_mode};
use crate::session::Session;
use cardwall_core::{BoardError, Column};
use clap::Args;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Service whose board holds the card.
    pub service: String,

    /// Card id.
    pub task: String,

    /// Target column (new, work, done; "In Progress" and "backlog" work too).
    #[arg(value_parser = parse_column)]
    pub column: Column,
}

pub fn run_move(args: &MoveArgs, session: &Session) -> anyhow::Result<()> {
    let output = session.output();
    let mut sync = session.open(&args.service)?;

    let from = sync.board().get(&args.task).map(|t| t.column);
    sync.move_task(&args.task, args.column)
        .map_err(|e| fail(output, e))?;

    let Some(task) = sync.board().get(&args.task) else {
        return Err(fail(
            output,
            BoardError::TaskNotFound {
                task_id: args.task.clone(),
            },
        ));
    };

    let moved = from != Some(args.column);
    render_mode(
        output,
        &CardView::new(task),
        |view, w| writeln!(w, "{}", card_line(view.task)),
        |view, w| {
            if moved {
                writeln!(
                    w,
                    "✓ Moved {} to {} (#{})",
                    view.task.id,
                    view.task.column.label(),
                    view.task.order
                )
            } else {
                writeln!(w, "✓ {} is already in {}", view.task.id, view.task.column.label())
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: MoveArgs,
    }

    #[test]
    fn move_args_parse_positionals() {
        let w = Wrapper::parse_from(["test", "svc-1", "t1", "in-progress"]);
        assert_eq!(w.args.service, "svc-1");
        assert_eq!(w.args.task, "t1");
        assert_eq!(w.args.column, Column::Work);
    }

    #[test]
    fn move_requires_a_column() {
        assert!(Wrapper::try_parse_from(["test", "svc-1", "t1"]).is_err());
        assert!(Wrapper::try_parse_from(["test", "svc-1", "t1", "later"]).is_err());
    }
}
