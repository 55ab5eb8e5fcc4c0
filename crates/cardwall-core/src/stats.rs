//! Derived board statistics.
//!
//! Everything here is recomputed from the current tasks and membership on
//! every call; nothing is cached between mutations.

use serde::Serialize;

use crate::model::{Column, Service, Task};

/// Threshold below which a service with open work counts as at risk.
pub const DEFAULT_AT_RISK_THRESHOLD: f64 = 50.0;

/// Counts and rates for one service's board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStats {
    pub service_id: String,
    pub backlog: usize,
    pub active: usize,
    pub completed: usize,
    pub total: usize,
    /// Percentage of tasks in `done`, in `[0, 100]`.
    pub completion_rate: f64,
    pub total_members: usize,
}

impl ServiceStats {
    /// Derive stats from a task list and the service's membership.
    #[must_use]
    pub fn derive(tasks: &[Task], service: &Service) -> Self {
        let (mut backlog, mut active, mut completed) = (0, 0, 0);
        for task in tasks {
            match task.column {
                Column::New => backlog += 1,
                Column::Work => active += 1,
                Column::Done => completed += 1,
            }
        }
        let total = backlog + active + completed;

        Self {
            service_id: service.id.clone(),
            backlog,
            active,
            completed,
            total,
            completion_rate: percentage(completed, total),
            total_members: service.member_ids().len(),
        }
    }

    #[must_use]
    pub const fn count(&self, column: Column) -> usize {
        match column {
            Column::New => self.backlog,
            Column::Work => self.active,
            Column::Done => self.completed,
        }
    }

    /// A service is at risk when it has work and completes less than
    /// `threshold` percent of it.
    #[must_use]
    pub fn is_at_risk(&self, threshold: f64) -> bool {
        self.total > 0 && self.completion_rate < threshold
    }
}

/// Aggregate over several services of one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRollup {
    pub services: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: f64,
    pub at_risk: Vec<String>,
}

impl ProjectRollup {
    #[must_use]
    pub fn from_stats(stats: &[ServiceStats], at_risk_threshold: f64) -> Self {
        let total_tasks = stats.iter().map(|s| s.total).sum();
        let completed_tasks = stats.iter().map(|s| s.completed).sum();
        let at_risk = stats
            .iter()
            .filter(|s| s.is_at_risk(at_risk_threshold))
            .map(|s| s.service_id.clone())
            .collect();

        Self {
            services: stats.len(),
            total_tasks,
            completed_tasks,
            completion_rate: percentage(completed_tasks, total_tasks),
            at_risk,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::task;
    use crate::model::UserRef;

    fn service(chief: &str, manager: Option<&str>, resources: &[&str], backup: &[&str]) -> Service {
        Service {
            id: "svc".into(),
            name: "Billing".into(),
            chief: Some(UserRef::new(chief)),
            project_manager: manager.map(UserRef::new),
            assigned_resources: resources.iter().copied().map(UserRef::new).collect(),
            backup: backup.iter().copied().map(UserRef::new).collect(),
            task_board: Some("tb".into()),
        }
    }

    #[test]
    fn empty_board_has_zero_completion() {
        let stats = ServiceStats::derive(&[], &service("c", None, &[], &[]));
        assert_eq!(stats.total, 0);
        assert!(stats.completion_rate.abs() < f64::EPSILON);
        assert!(!stats.is_at_risk(DEFAULT_AT_RISK_THRESHOLD));
    }

    #[test]
    fn one_of_three_done_is_a_third() {
        let tasks = vec![
            task("a", Column::New, 0),
            task("b", Column::New, 1),
            task("c", Column::Done, 0),
        ];
        let stats = ServiceStats::derive(&tasks, &service("c", None, &[], &[]));
        assert_eq!(stats.count(Column::New), 2);
        assert_eq!(stats.count(Column::Done), 1);
        assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);
        assert!(stats.is_at_risk(DEFAULT_AT_RISK_THRESHOLD));
    }

    #[test]
    fn members_are_not_double_counted() {
        let svc = service("u1", Some("u1"), &["u2", "u3"], &["u3", "u4"]);
        let stats = ServiceStats::derive(&[], &svc);
        assert_eq!(stats.total_members, 4);
    }

    #[test]
    fn absent_roles_are_excluded() {
        let mut svc = service("u1", None, &[], &[]);
        svc.chief = None;
        assert_eq!(ServiceStats::derive(&[], &svc).total_members, 0);
    }

    #[test]
    fn rollup_flags_services_below_threshold() {
        let done = vec![task("a", Column::Done, 0), task("b", Column::Done, 1)];
        let stuck = vec![task("c", Column::Work, 0), task("d", Column::New, 0)];
        let mut healthy = ServiceStats::derive(&done, &service("x", None, &[], &[]));
        healthy.service_id = "healthy".into();
        let mut late = ServiceStats::derive(&stuck, &service("y", None, &[], &[]));
        late.service_id = "late".into();
        let idle = ServiceStats::derive(&[], &service("z", None, &[], &[]));

        let rollup = ProjectRollup::from_stats(&[healthy, late, idle], 50.0);
        assert_eq!(rollup.services, 3);
        assert_eq!(rollup.total_tasks, 4);
        assert_eq!(rollup.completed_tasks, 2);
        assert!((rollup.completion_rate - 50.0).abs() < 1e-9);
        assert_eq!(rollup.at_risk, vec!["late".to_string()]);
    }
}
