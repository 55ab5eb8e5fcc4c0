//! Keeps a [`BoardState`] in step with the remote task list.
//!
//! Every mutation runs as a small transaction: permission and input checks
//! first, then the local change, then the remote writes. If any remote write
//! fails the board is restored from the snapshot taken before the local
//! change, so local state never shows a write the server did not accept.
//! Writes that the server already accepted before the failure stay applied
//! remotely; the next load reconciles them.

use tracing::{debug, info, warn};

use crate::api::{CardPayload, TaskApi};
use crate::board::BoardState;
use crate::error::BoardError;
use crate::identity::Identity;
use crate::model::{Column, NewTask, Service, Task, tags};
use crate::roles::{Action, MovePolicy, Roles};
use crate::stats::ServiceStats;

/// A service with its board id and current cards.
#[derive(Debug, Clone)]
pub struct LoadedBoard {
    pub service: Service,
    pub task_board_id: String,
    pub tasks: Vec<Task>,
}

/// Fetch a service and the cards on its task board.
///
/// An empty board is a valid result.
///
/// # Errors
///
/// [`BoardError::NoTaskBoard`] when the service has no board attached, or any
/// transport error from `api`.
pub fn fetch_board<A: TaskApi>(api: &A, service_id: &str) -> Result<LoadedBoard, BoardError> {
    let service = api.fetch_service(service_id)?;
    let task_board_id = service
        .task_board
        .clone()
        .ok_or_else(|| BoardError::NoTaskBoard {
            service_id: service_id.to_string(),
        })?;
    let board = api.fetch_task_board(&task_board_id)?;
    debug!(service_id, task_board_id, cards = board.cards.len(), "fetched board");

    Ok(LoadedBoard {
        service,
        task_board_id,
        tasks: board.cards,
    })
}

/// One open board and the caller's standing on it.
#[derive(Debug)]
pub struct BoardSync<A> {
    api: A,
    service: Service,
    task_board_id: String,
    roles: Roles,
    board: BoardState,
}

impl<A: TaskApi> BoardSync<A> {
    /// Load the board for `service_id` and resolve the caller's roles once.
    ///
    /// # Errors
    ///
    /// Propagates [`fetch_board`] failures.
    pub fn open(
        api: A,
        identity: &Identity,
        service_id: &str,
        move_policy: MovePolicy,
    ) -> Result<Self, BoardError> {
        let loaded = fetch_board(&api, service_id)?;
        let roles = Roles::resolve(identity, &loaded.service, move_policy);
        let mut board = BoardState::new();
        board.load(loaded.tasks);
        info!(service_id, tier = %roles.tier(), tasks = board.len(), "opened board");

        Ok(Self {
            api,
            service: loaded.service,
            task_board_id: loaded.task_board_id,
            roles,
            board,
        })
    }

    #[must_use]
    pub const fn board(&self) -> &BoardState {
        &self.board
    }

    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    #[must_use]
    pub const fn roles(&self) -> &Roles {
        &self.roles
    }

    #[must_use]
    pub fn task_board_id(&self) -> &str {
        &self.task_board_id
    }

    /// Statistics for the board as it is right now.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        ServiceStats::derive(self.board.tasks(), &self.service)
    }

    /// Re-fetch the cards, discarding local state.
    ///
    /// # Errors
    ///
    /// Transport errors from the board fetch; the local board is kept.
    pub fn refresh(&mut self) -> Result<(), BoardError> {
        let board = self.api.fetch_task_board(&self.task_board_id)?;
        self.board.load(board.cards);
        Ok(())
    }

    /// Create a card at the bottom of its column.
    ///
    /// The server's representation is stored; its id is authoritative.
    ///
    /// # Errors
    ///
    /// [`BoardError::EmptyTitle`] or [`BoardError::PermissionDenied`] before
    /// any request; otherwise the remote error, with the board unchanged.
    pub fn create_task(&mut self, new: NewTask) -> Result<Task, BoardError> {
        let title = validate_title(&new.title)?;
        self.roles.authorize(Action::CreateTask)?;

        let column = new.column.unwrap_or(Column::New);
        let payload = CardPayload {
            title,
            column,
            description: new.description.unwrap_or_default(),
            tags: tags::normalize(&new.tags),
            color: new.color.unwrap_or_default(),
            users: new.assignees,
            order: self.board.next_order(column),
        };

        let created = self.api.create_card(&self.task_board_id, &payload)?;
        info!(task_id = %created.id, %column, "created task");
        self.board.upsert(created.clone());
        Ok(created)
    }

    /// Replace a card's fields with `task`, sending the full field set.
    ///
    /// Changing the column here is an edit, not a drag, and needs edit
    /// rights; both affected columns are renumbered afterwards.
    ///
    /// # Errors
    ///
    /// Validation, permission, and not-found errors before any request;
    /// remote errors after rolling the board back.
    pub fn update_task(&mut self, task: Task) -> Result<(), BoardError> {
        let title = validate_title(&task.title)?;
        let current = self.require(&task.id)?.clone();
        self.roles.authorize(Action::EditTask)?;

        let target = task.column;
        let edited = Task {
            title,
            tags: tags::normalize(&task.tags),
            column: current.column,
            order: current.order,
            ..task
        };

        self.transact(|sync| {
            let id = edited.id.clone();
            sync.board.upsert(edited);
            if target == current.column {
                return sync.persist(&id);
            }
            sync.board.move_task(&id, target)?;
            sync.persist(&id)?;
            sync.persist_reorder(current.column)?;
            sync.persist_reorder(target)?;
            Ok(())
        })?;
        info!(task_id = %current.id, "updated task");
        Ok(())
    }

    /// Drag a card to another column, appending it there.
    ///
    /// Moving to the card's current column is a no-op.
    ///
    /// # Errors
    ///
    /// Permission and not-found errors before any request; remote errors
    /// after rolling the board back.
    pub fn move_task(&mut self, task_id: &str, target: Column) -> Result<(), BoardError> {
        self.roles.authorize(Action::MoveTask)?;
        let from = self.require(task_id)?.column;
        if from == target {
            debug!(task_id, %target, "task already in column");
            return Ok(());
        }

        self.transact(|sync| {
            sync.board.move_task(task_id, target)?;
            sync.persist(task_id)?;
            sync.persist_reorder(from)?;
            sync.persist_reorder(target)
        })?;
        info!(task_id, %from, %target, "moved task");
        Ok(())
    }

    /// Renumber `column` to 0..n-1 and persist the cards whose ordinal
    /// changed. Returns how many were written.
    ///
    /// # Errors
    ///
    /// The first remote error, after rolling the board back.
    pub fn reorder(&mut self, column: Column) -> Result<usize, BoardError> {
        self.transact(|sync| sync.persist_reorder(column))
    }

    /// Delete a card and close the gap it leaves in its column.
    ///
    /// # Errors
    ///
    /// Permission and not-found errors before any request. A failed DELETE
    /// leaves the board unchanged. If the DELETE succeeds but renumbering the
    /// column fails, the card stays removed and the renumber error is returned.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task, BoardError> {
        let column = self.require(task_id)?.column;
        self.roles.authorize(Action::DeleteTask)?;

        self.api.delete_task(&self.task_board_id, task_id)?;
        let removed = self
            .board
            .remove(task_id)
            .ok_or_else(|| BoardError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;
        info!(task_id, %column, "deleted task");

        self.reorder(column)?;
        Ok(removed)
    }

    fn require(&self, task_id: &str) -> Result<&Task, BoardError> {
        self.board.get(task_id).ok_or_else(|| BoardError::TaskNotFound {
            task_id: task_id.to_string(),
        })
    }

    /// Run `op`, restoring the pre-call board if it fails.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let snapshot = self.board.snapshot();
        op(self).inspect_err(|err| {
            warn!(error = %err, "remote write failed; rolling back local board");
            self.board.restore(snapshot);
        })
    }

    fn persist(&self, task_id: &str) -> Result<(), BoardError> {
        let task = self.require(task_id)?;
        self.api
            .patch_task(&self.task_board_id, task_id, &CardPayload::from(task))?;
        Ok(())
    }

    fn persist_reorder(&mut self, column: Column) -> Result<usize, BoardError> {
        let changed = self.board.renumber(column);
        for task in &changed {
            self.api
                .patch_task(&self.task_board_id, &task.id, &CardPayload::from(task))?;
        }
        debug!(%column, written = changed.len(), "renumbered column");
        Ok(changed.len())
    }
}

fn validate_title(title: &str) -> Result<String, BoardError> {
    let title = title.trim();
    if title.is_empty() {
        Err(BoardError::EmptyTitle)
    } else {
        Ok(title.to_string())
    }
}
