//! `cw stats` — per-service card counts and the project-wide rollup.

use crate::output::{fail, pretty_kv, pretty_section, render_mode};
use crate::session::Session;
use cardwall_core::{ProjectRollup, ServiceStats, fetch_board};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Services to report on.
    #[arg(required = true, num_args = 1..)]
    pub services: Vec<String>,

    /// Completion percentage below which a service counts as at risk.
    #[arg(long, value_parser = parse_percentage)]
    pub at_risk_below: Option<f64>,
}

fn parse_percentage(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("expected a percentage between 0 and 100, got {raw}"))
    }
}

#[derive(Debug, Serialize)]
struct StatsReport {
    services: Vec<ServiceStats>,
    rollup: ProjectRollup,
}

pub fn run_stats(args: &StatsArgs, session: &Session) -> anyhow::Result<()> {
    let output = session.output();
    let api = session.api()?;
    let threshold = args
        .at_risk_below
        .unwrap_or(session.settings().at_risk_threshold);

    let mut services = Vec::with_capacity(args.services.len());
    for service_id in &args.services {
        let loaded = fetch_board(&api, service_id).map_err(|e| fail(output, e))?;
        let stats = ServiceStats::derive(&loaded.tasks, &loaded.service);
        debug!(service_id, rate = stats.completion_rate, "derived stats");
        services.push(stats);
    }

    let rollup = ProjectRollup::from_stats(&services, threshold);
    let report = StatsReport { services, rollup };
    render_mode(output, &report, write_text, write_pretty)
}

fn write_text(report: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for s in &report.services {
        writeln!(
            w,
            "{}\tbacklog={}\tactive={}\tcompleted={}\ttotal={}\trate={:.2}\tmembers={}",
            s.service_id, s.backlog, s.active, s.completed, s.total, s.completion_rate, s.total_members
        )?;
    }
    let r = &report.rollup;
    writeln!(
        w,
        "total\tservices={}\ttasks={}\tcompleted={}\trate={:.2}\tat_risk={}",
        r.services,
        r.total_tasks,
        r.completed_tasks,
        r.completion_rate,
        r.at_risk.join(",")
    )
}

fn write_pretty(report: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    for s in &report.services {
        pretty_section(w, &s.service_id)?;
        pretty_kv(w, "Backlog", s.backlog.to_string())?;
        pretty_kv(w, "In Progress", s.active.to_string())?;
        pretty_kv(w, "Done", s.completed.to_string())?;
        pretty_kv(w, "Total", s.total.to_string())?;
        pretty_kv(w, "Completion", format!("{:.1}%", s.completion_rate))?;
        pretty_kv(w, "Members", s.total_members.to_string())?;
        writeln!(w)?;
    }

    let r = &report.rollup;
    pretty_section(w, "Project")?;
    pretty_kv(w, "Services", r.services.to_string())?;
    pretty_kv(
        w,
        "Completion",
        format!(
            "{:.1}% ({} of {})",
            r.completion_rate, r.completed_tasks, r.total_tasks
        ),
    )?;
    if r.at_risk.is_empty() {
        pretty_kv(w, "At risk", "none")
    } else {
        pretty_kv(w, "At risk", r.at_risk.join(", "))
    }
}
