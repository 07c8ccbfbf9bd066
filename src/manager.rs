use crate::types::Task;
use chrono::{NaiveDate, NaiveDateTime};

/// Ordered, in-memory task list.
///
/// Index arguments are 0-based and must already be bounds-checked by the
/// caller; an out-of-range index panics.
#[derive(Debug, Default)]
pub struct TaskManager {
    tasks: Vec<Task>,
}

impl TaskManager {
    pub fn new() -> Self {
        TaskManager { tasks: Vec::new() }
    }

    pub fn add_todo(&mut self, description: &str) -> &Task {
        self.push(Task::todo(description))
    }

    pub fn add_deadline(&mut self, description: &str, due: NaiveDate) -> &Task {
        self.push(Task::deadline(description, due))
    }

    pub fn add_event(
        &mut self,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> &Task {
        self.push(Task::event(description, start, end))
    }

    /// Bulk append, used when loading from storage.
    pub fn add_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks.extend(tasks);
    }

    pub fn mark_done(&mut self, index: usize) -> &Task {
        let task = &mut self.tasks[index];
        task.mark_done();
        task
    }

    pub fn mark_undone(&mut self, index: usize) -> &Task {
        let task = &mut self.tasks[index];
        task.mark_undone();
        task
    }

    pub fn delete_task(&mut self, index: usize) -> Task {
        self.tasks.remove(index)
    }

    /// Case-insensitive substring match on descriptions, in list order.
    pub fn find(&self, keyword: &str) -> Vec<&Task> {
        let needle = keyword.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| t.description().to_lowercase().contains(&needle))
            .collect()
    }

    /// Deadlines and events falling on `date`, earliest first.
    pub fn schedule_for(&self, date: NaiveDate) -> Vec<&Task> {
        let mut schedule: Vec<&Task> = self.tasks.iter().filter(|t| t.occurs_on(date)).collect();
        schedule.sort_by_key(|t| t.schedule_time(date));
        schedule
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn push(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }
}
