//! Caller classification against one service's membership.
//!
//! | Action | Allowed |
//! |---|---|
//! | create task | chief, manager, resource, admin |
//! | edit / delete task, change column on edit | chief, admin |
//! | move task (drag) | any viewer, or chief/admin when moves are restricted |

use serde::Serialize;
use std::fmt;

use crate::error::BoardError;
use crate::identity::Identity;
use crate::model::Service;

/// A board mutation that needs a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateTask,
    EditTask,
    DeleteTask,
    MoveTask,
}

impl Action {
    pub const ALL: [Self; 4] = [
        Self::CreateTask,
        Self::EditTask,
        Self::MoveTask,
        Self::DeleteTask,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create task",
            Self::EditTask => "edit task",
            Self::DeleteTask => "delete task",
            Self::MoveTask => "move task",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest permission tier held by the caller, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Viewer,
    Resource,
    Manager,
    Chief,
    Admin,
}

impl Tier {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Resource => "resource",
            Self::Manager => "manager",
            Self::Chief => "chief",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether drag-moves follow the edit rule or are open to every viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovePolicy {
    #[default]
    AnyViewer,
    ChiefOrAdmin,
}

/// The caller's standing on one service. Resolved once per board load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Roles {
    pub is_admin: bool,
    pub is_chief: bool,
    pub is_manager: bool,
    pub is_resource: bool,
    #[serde(skip)]
    move_policy: MovePolicy,
}

impl Roles {
    #[must_use]
    pub fn resolve(identity: &Identity, service: &Service, move_policy: MovePolicy) -> Self {
        let me = identity.user_id.as_str();
        let is = |user: Option<&crate::model::UserRef>| user.is_some_and(|u| u.id == me);

        Self {
            is_admin: identity.role == "admin",
            is_chief: is(service.chief.as_ref()),
            is_manager: is(service.project_manager.as_ref()),
            is_resource: service.assigned_resources.iter().any(|u| u.id == me),
            move_policy,
        }
    }

    #[must_use]
    pub const fn tier(&self) -> Tier {
        if self.is_admin {
            Tier::Admin
        } else if self.is_chief {
            Tier::Chief
        } else if self.is_manager {
            Tier::Manager
        } else if self.is_resource {
            Tier::Resource
        } else {
            Tier::Viewer
        }
    }

    #[must_use]
    pub const fn permits(&self, action: Action) -> bool {
        let chief_or_admin = self.is_chief || self.is_admin;
        match action {
            Action::CreateTask => {
                self.is_chief || self.is_manager || self.is_resource || self.is_admin
            }
            Action::EditTask | Action::DeleteTask => chief_or_admin,
            Action::MoveTask => match self.move_policy {
                MovePolicy::AnyViewer => true,
                MovePolicy::ChiefOrAdmin => chief_or_admin,
            },
        }
    }

    /// Every action the caller may perform, in [`Action::ALL`] order.
    #[must_use]
    pub fn allowed(&self) -> Vec<Action> {
        Action::ALL.into_iter().filter(|a| self.permits(*a)).collect()
    }

    /// # Errors
    ///
    /// [`BoardError::PermissionDenied`] when the caller's tier does not allow
    /// `action`.
    pub fn authorize(&self, action: Action) -> Result<(), BoardError> {
        if self.permits(action) {
            Ok(())
        } else {
            tracing::debug!(%action, tier = %self.tier(), "permission denied");
            Err(BoardError::denied(action, self.tier().as_str()))
        }
    }
}
