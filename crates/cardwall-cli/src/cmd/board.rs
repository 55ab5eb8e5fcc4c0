//! `cw board` — show a service's board column by column.

use crate::cmd::{CardView, card_line, parse_column, write_card};
use crate::output::{pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::session::Session;
use cardwall_core::{Action, Column, ServiceStats, Tier};
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Service whose board to show.
    pub service: String,

    /// Only show one column (new, work, done).
    #[arg(short, long, value_parser = parse_column)]
    pub column: Option<Column>,
}

#[derive(Debug, Serialize)]
struct ColumnView<'a> {
    column: Column,
    label: &'static str,
    cards: Vec<CardView<'a>>,
}

#[derive(Debug, Serialize)]
struct BoardView<'a> {
    service_id: &'a str,
    service_name: &'a str,
    tier: Tier,
    allowed: Vec<Action>,
    columns: Vec<ColumnView<'a>>,
    stats: ServiceStats,
}

pub fn run_board(args: &BoardArgs, session: &Session) -> anyhow::Result<()> {
    let sync = session.open(&args.service)?;
    let roles = sync.roles();

    let columns = Column::ALL
        .into_iter()
        .filter(|c| args.column.is_none_or(|only| only == *c))
        .map(|column| ColumnView {
            column,
            label: column.label(),
            cards: sync.board().column(column).into_iter().map(CardView::new).collect(),
        })
        .collect();

    let view = BoardView {
        service_id: &sync.service().id,
        service_name: &sync.service().name,
        tier: roles.tier(),
        allowed: roles.allowed(),
        columns,
        stats: sync.stats(),
    };

    render_mode(session.output(), &view, write_text, write_pretty)
}

fn write_text(view: &BoardView<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for column in &view.columns {
        for card in &column.cards {
            writeln!(w, "{}", card_line(card.task))?;
        }
    }
    Ok(())
}

fn write_pretty(view: &BoardView<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    let title = if view.service_name.is_empty() {
        view.service_id.to_string()
    } else {
        format!("{} ({})", view.service_name, view.service_id)
    };
    pretty_section(w, &title)?;
    pretty_kv(w, "You are", view.tier.to_string())?;
    pretty_kv(
        w,
        "Completion",
        format!(
            "{:.1}% of {} cards, {} members",
            view.stats.completion_rate, view.stats.total, view.stats.total_members
        ),
    )?;

    for column in &view.columns {
        writeln!(w)?;
        pretty_section(w, &format!("{} ({})", column.label, column.cards.len()))?;
        if column.cards.is_empty() {
            writeln!(w, "  (empty)")?;
        }
        for (i, card) in column.cards.iter().enumerate() {
            if i > 0 {
                pretty_rule(w)?;
            }
            write_card(w, card.task)?;
        }
    }
    Ok(())
}
