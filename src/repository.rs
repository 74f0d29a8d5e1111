// --------------------------------------------------
// Canonical in-memory task collection.
//
// Every mutation rewrites the whole durable collection.
// Write failures are logged and swallowed; memory stays
// the source of truth for the rest of the session.
// --------------------------------------------------

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::logic::now_fixed_offset;
use crate::models::{NewTask, Priority, Task, TaskPatch, TaskStatus};
use crate::store::Document;

/// Lists that always exist, even with no tasks in them.
pub const BUILTIN_LISTS: [&str; 2] = ["Life", "Work"];

pub struct TaskRepository {
    tasks: Vec<Task>,
    selected: Option<String>,
    doc: Box<dyn Document<Vec<Task>>>,
}

impl TaskRepository {
    /// Read the durable collection. Absent or corrupt input means no tasks.
    pub fn load(doc: impl Document<Vec<Task>> + 'static) -> Self {
        let tasks = match doc.read() {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "task collection unreadable, starting empty");
                Vec::new()
            }
        };
        tracing::info!(count = tasks.len(), "tasks loaded");

        Self {
            tasks,
            selected: None,
            doc: Box::new(doc),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.doc.write(&self.tasks) {
            tracing::error!(error = %e, "failed to save tasks");
        }
    }

    /// Snapshot of the current collection.
    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a fully formed task. Colliding ids are the caller's problem.
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
        self.persist();
    }

    /// Append a new task with a fresh id and repository-assigned timestamps.
    pub fn create(&mut self, input: NewTask) -> Task {
        let now = now_fixed_offset();
        let completed_at = (input.status == TaskStatus::Done).then_some(now);

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status: input.status,
            project_id: input.project_id,
            parent_task_id: input.parent_task_id,
            is_recurring: input.is_recurring,
            recurring_pattern_id: input.recurring_pattern_id,
            progress: input.progress.min(100),
            created_at: now,
            updated_at: now,
            completed_at,
        };

        self.add(task.clone());
        task
    }

    /// Merge `patch` into the task with `id` and refresh `updatedAt`.
    /// Unknown ids are a silent no-op. `completedAt` is merged as given,
    /// never inferred from `status`.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Option<Task> {
        self.update_at(id, patch, now_fixed_offset())
    }

    fn update_at(&mut self, id: &str, patch: TaskPatch, now: DateTime<FixedOffset>) -> Option<Task> {
        let mut updated = None;
        for task in self.tasks.iter_mut().filter(|t| t.id == id) {
            patch.clone().apply_to(task);
            task.updated_at = now.max(task.created_at);
            updated = Some(task.clone());
        }

        if updated.is_some() {
            self.persist();
        }
        updated
    }

    /// Remove the task with `id` if present and clear a matching selection.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.persist();

        self.tasks.len() != before
    }

    /// Full-collection replace.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if self.selected().is_none() {
            self.selected = None;
        }
        self.persist();
    }

    /// Select a task by id, or clear the selection with `None`.
    /// Selecting an unknown id clears it as well.
    pub fn select(&mut self, id: Option<&str>) -> Option<&Task> {
        self.selected = id
            .filter(|id| self.tasks.iter().any(|t| t.id == *id))
            .map(str::to_string);
        self.selected()
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Every list name in use, in first-seen order, then the built-in ones.
    pub fn lists(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let in_use = self.tasks.iter().filter_map(|t| t.project_id.as_deref());
        for name in in_use.chain(BUILTIN_LISTS) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// A list exists only through its tasks, so a new list gets a placeholder.
    pub fn create_list(&mut self, name: &str) -> Task {
        let mut input = NewTask::titled(format!("Start of {name}"));
        input.priority = Priority::Medium;
        input.project_id = Some(name.to_string());
        self.create(input)
    }

    /// Detach every task from list `name`. Returns how many were detached.
    pub fn remove_list(&mut self, name: &str) -> usize {
        let ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(name))
            .map(|t| t.id.clone())
            .collect();

        for id in &ids {
            self.update(
                id,
                TaskPatch {
                    project_id: Some(None),
                    ..TaskPatch::default()
                },
            );
        }
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use chrono::Duration;
    use tempfile::TempDir;

    use super::*;
    use crate::store::JsonFile;
    use crate::store::testing::{FailingDocument, MemoryDocument};

    fn task(id: &str, title: &str) -> Task {
        let created = now_fixed_offset() - Duration::minutes(5);
        Task {
            id: id.into(),
            title: title.into(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            status: TaskStatus::Todo,
            project_id: None,
            parent_task_id: None,
            is_recurring: false,
            recurring_pattern_id: None,
            progress: 0,
            created_at: created,
            updated_at: created,
            completed_at: None,
        }
    }

    fn memory_repo(tasks: Vec<Task>) -> (TaskRepository, Arc<MemoryDocument<Vec<Task>>>) {
        let doc = Arc::new(MemoryDocument::new(Some(tasks)));
        (TaskRepository::load(doc.clone()), doc)
    }

    #[test]
    fn load_treats_corrupt_file_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json at all").unwrap();

        let repo = TaskRepository::load(JsonFile::<Vec<Task>>::new(&path));
        assert!(repo.get_all().is_empty());
    }

    #[test]
    fn add_persists_whole_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let mut repo = TaskRepository::load(JsonFile::<Vec<Task>>::new(&path));
        repo.add(task("a", "first"));
        repo.add(task("b", "second"));

        let reloaded = TaskRepository::load(JsonFile::<Vec<Task>>::new(&path));
        let ids: Vec<_> = reloaded.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let (mut repo, _) = memory_repo(Vec::new());
        let created = repo.create(NewTask::titled("Buy milk"));

        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.status, TaskStatus::Todo);
        assert_eq!(created.priority, Priority::Medium);
        assert_eq!(repo.get(&created.id), Some(&created));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (mut repo, doc) = memory_repo(vec![task("a", "first")]);
        let before = repo.get_all();

        let result = repo.update(
            "missing",
            TaskPatch {
                title: Some("x".into()),
                ..TaskPatch::default()
            },
        );

        assert!(result.is_none());
        assert_eq!(repo.get_all(), before);
        assert_eq!(*doc.writes.lock(), 0);
    }

    #[test]
    fn status_round_trip_clears_completed_at() {
        let original = task("a", "ship it");
        let created_at = original.created_at;
        let (mut repo, _) = memory_repo(vec![original]);
        let done_at = now_fixed_offset();

        repo.update(
            "a",
            TaskPatch {
                status: Some(TaskStatus::Done),
                completed_at: Some(Some(done_at)),
                ..TaskPatch::default()
            },
        );
        assert_eq!(repo.get("a").unwrap().completed_at, Some(done_at));

        let back = repo
            .update(
                "a",
                TaskPatch {
                    status: Some(TaskStatus::Todo),
                    completed_at: Some(None),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        assert_eq!(back.status, TaskStatus::Todo);
        assert_eq!(back.completed_at, None);
        assert!(back.updated_at > created_at);
    }

    #[test]
    fn update_does_not_infer_completed_at() {
        let (mut repo, _) = memory_repo(vec![task("a", "ship it")]);
        let updated = repo
            .update(
                "a",
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..TaskPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.completed_at, None);
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let mut t = task("a", "future");
        t.created_at = now_fixed_offset() + Duration::hours(1);
        let created_at = t.created_at;
        let (mut repo, _) = memory_repo(vec![t]);

        let updated = repo
            .update_at("a", TaskPatch::default(), created_at - Duration::hours(2))
            .unwrap();
        assert_eq!(updated.updated_at, created_at);
    }

    #[test]
    fn remove_unknown_id_leaves_collection_unchanged() {
        let (mut repo, _) = memory_repo(vec![task("a", "first"), task("b", "second")]);
        let before = repo.get_all();

        assert!(!repo.remove("missing"));
        assert_eq!(repo.get_all(), before);
    }

    #[test]
    fn remove_clears_matching_selection() {
        let (mut repo, _) = memory_repo(vec![task("a", "first"), task("b", "second")]);

        repo.select(Some("a"));
        repo.remove("b");
        assert_eq!(repo.selected().map(|t| t.id.as_str()), Some("a"));

        assert!(repo.remove("a"));
        assert!(repo.selected().is_none());
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let mut repo = TaskRepository::load(FailingDocument);
        repo.add(task("a", "first"));
        repo.update(
            "a",
            TaskPatch {
                title: Some("renamed".into()),
                ..TaskPatch::default()
            },
        );

        assert_eq!(repo.get("a").unwrap().title, "renamed");
    }

    #[test]
    fn replace_all_drops_stale_selection() {
        let (mut repo, doc) = memory_repo(vec![task("a", "first")]);
        repo.select(Some("a"));

        repo.replace_all(vec![task("b", "second")]);

        assert!(repo.selected().is_none());
        assert_eq!(doc.value.lock().as_ref().unwrap()[0].id, "b");
    }

    #[test]
    fn lists_include_builtins_after_used_names() {
        let mut a = task("a", "first");
        a.project_id = Some("Errands".into());
        let mut b = task("b", "second");
        b.project_id = Some("Work".into());
        let (repo, _) = memory_repo(vec![a, b, task("c", "third")]);

        assert_eq!(repo.lists(), ["Errands", "Work", "Life"]);
    }

    #[test]
    fn create_and_remove_list() {
        let (mut repo, _) = memory_repo(Vec::new());
        let placeholder = repo.create_list("Garden");
        assert_eq!(placeholder.title, "Start of Garden");
        assert_eq!(placeholder.project_id.as_deref(), Some("Garden"));
        assert!(repo.lists().contains(&"Garden".to_string()));

        assert_eq!(repo.remove_list("Garden"), 1);
        assert!(!repo.lists().contains(&"Garden".to_string()));
        assert_eq!(repo.tasks().len(), 1);
    }
}
