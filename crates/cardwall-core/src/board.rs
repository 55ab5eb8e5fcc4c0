//! In-memory board for one service.
//!
//! The board is a disposable cache of the remote task list. Tasks are kept in
//! one vector; a column view is the subset with that column, ordered by
//! ordinal and then by position in the vector.

use crate::error::BoardError;
use crate::model::{Column, Task};

/// The current task collection of one board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    tasks: Vec<Task>,
}

/// Pre-mutation copy of a board, used to roll back a failed remote write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    tasks: Vec<Task>,
}

impl BoardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection.
    pub fn load(&mut self, mut tasks: Vec<Task>) {
        tasks.sort_by_key(|t| (t.column, t.order));
        self.tasks = tasks;
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Tasks of one column in display order.
    #[must_use]
    pub fn column(&self, column: Column) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.column == column).collect();
        tasks.sort_by_key(|t| t.order);
        tasks
    }

    #[must_use]
    pub fn column_len(&self, column: Column) -> usize {
        self.tasks.iter().filter(|t| t.column == column).count()
    }

    /// Ordinal one past the highest in `column`, or 0 when it is empty.
    ///
    /// Columns can have gaps after remote edits.
    #[must_use]
    pub fn next_order(&self, column: Column) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.column == column)
            .map(|t| t.order + 1)
            .max()
            .unwrap_or(0)
    }

    /// Reassign a task to `target`, placing it after the column's last card.
    ///
    /// Returns the column the task came from. Ordinals of both columns are
    /// left for the caller to renumber.
    ///
    /// # Errors
    ///
    /// [`BoardError::TaskNotFound`] when the id is not on the board.
    pub fn move_task(&mut self, task_id: &str, target: Column) -> Result<Column, BoardError> {
        let idx = self.index_of(task_id)?;

        let mut task = self.tasks.remove(idx);
        let previous = task.column;
        task.column = target;
        task.order = self.next_order(target);
        self.tasks.push(task);
        Ok(previous)
    }

    /// Insert a task, or replace the one with the same id in place.
    ///
    /// Returns the replaced task, if any.
    pub fn upsert(&mut self, task: Task) -> Option<Task> {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => Some(std::mem::replace(slot, task)),
            None => {
                self.tasks.push(task);
                None
            }
        }
    }

    pub fn remove(&mut self, task_id: &str) -> Option<Task> {
        let idx = self.index_of(task_id).ok()?;
        Some(self.tasks.remove(idx))
    }

    /// Set ordinal = index for every task in `column`, in display order.
    ///
    /// Returns copies of the tasks whose ordinal changed.
    pub fn renumber(&mut self, column: Column) -> Vec<Task> {
        let mut indices: Vec<usize> = (0..self.tasks.len())
            .filter(|&i| self.tasks[i].column == column)
            .collect();
        indices.sort_by_key(|&i| self.tasks[i].order);

        let mut changed = Vec::new();
        for (ordinal, idx) in indices.into_iter().enumerate() {
            let task = &mut self.tasks[idx];
            if task.order != ordinal {
                task.order = ordinal;
                changed.push(task.clone());
            }
        }
        changed
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tasks: self.tasks.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        self.tasks = snapshot.tasks;
    }

    fn index_of(&self, task_id: &str) -> Result<usize, BoardError> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| BoardError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }
}

#[cfg(test)]
pub(crate) fn task(id: &str, column: Column, order: usize) -> Task {
    Task {
        id: id.to_string(),
        title: format!("task {id}"),
        description: None,
        tags: Vec::new(),
        column,
        color: None,
        order,
        assignees: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn orders(board: &BoardState, column: Column) -> Vec<usize> {
        board.column(column).iter().map(|t| t.order).collect()
    }

    fn three_new() -> BoardState {
        let mut board = BoardState::new();
        board.load(vec![
            task("a", Column::New, 0),
            task("b", Column::New, 1),
            task("c", Column::New, 2),
        ]);
        board
    }

    #[test]
    fn load_replaces_everything() {
        let mut board = three_new();
        board.load(vec![task("z", Column::Done, 0)]);
        assert_eq!(board.len(), 1);
        assert!(board.get("a").is_none());
    }

    #[test]
    fn column_view_is_sorted_by_ordinal() {
        let mut board = BoardState::new();
        board.load(vec![
            task("late", Column::Work, 2),
            task("first", Column::Work, 0),
            task("mid", Column::Work, 1),
            task("other", Column::New, 0),
        ]);
        assert_eq!(ids(&board.column(Column::Work)), ["first", "mid", "late"]);
        assert_eq!(board.column_len(Column::New), 1);
    }

    #[test]
    fn move_then_renumber_keeps_ordinals_contiguous() {
        let mut board = three_new();
        let from = board.move_task("b", Column::Done).unwrap();
        assert_eq!(from, Column::New);

        board.renumber(Column::New);
        board.renumber(Column::Done);

        assert_eq!(ids(&board.column(Column::New)), ["a", "c"]);
        assert_eq!(orders(&board, Column::New), [0, 1]);
        assert_eq!(orders(&board, Column::Done), [0]);
    }

    #[test]
    fn move_appends_after_last_card() {
        let mut board = three_new();
        board.upsert(task("d", Column::Done, 0));
        board.move_task("a", Column::Done).unwrap();
        assert_eq!(ids(&board.column(Column::Done)), ["d", "a"]);
        assert_eq!(board.get("a").unwrap().order, 1);
    }

    #[test]
    fn next_order_follows_the_highest_ordinal() {
        let mut board = BoardState::new();
        assert_eq!(board.next_order(Column::New), 0);
        board.load(vec![task("a", Column::New, 0), task("c", Column::New, 2)]);
        assert_eq!(board.column_len(Column::New), 2);
        assert_eq!(board.next_order(Column::New), 3);
    }

    #[test]
    fn move_unknown_task_fails() {
        let mut board = three_new();
        let err = board.move_task("nope", Column::Work).unwrap_err();
        assert!(matches!(err, BoardError::TaskNotFound { .. }));
        assert_eq!(board, three_new());
    }

    #[test]
    fn renumber_reports_only_changed_tasks() {
        let mut board = three_new();
        board.remove("a");
        let changed = board.renumber(Column::New);
        let changed_ids: Vec<_> = changed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(changed_ids, ["b", "c"]);
        assert!(board.renumber(Column::New).is_empty());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut board = three_new();
        let mut edited = task("b", Column::New, 1);
        edited.title = "renamed".into();
        let old = board.upsert(edited).unwrap();
        assert_eq!(old.title, "task b");
        assert_eq!(board.get("b").unwrap().title, "renamed");
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn snapshot_restores_pre_mutation_state() {
        let mut board = three_new();
        let snapshot = board.snapshot();
        board.move_task("a", Column::Work).unwrap();
        board.renumber(Column::New);
        board.remove("c");
        board.restore(snapshot);
        assert_eq!(board, three_new());
    }
}
