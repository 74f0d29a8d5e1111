use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::{Note, Task, WindowSettings};
use crate::notes::NoteBook;
use crate::repository::TaskRepository;
use crate::settings::SettingsStore;
use crate::store::{DataPaths, JsonFile};

/// Service objects shared across all API handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub tasks: Arc<Mutex<TaskRepository>>,
    pub notes: Arc<Mutex<NoteBook>>,
}

impl AppState {
    pub fn new(settings: SettingsStore, tasks: TaskRepository, notes: NoteBook) -> Self {
        Self {
            settings: Arc::new(settings),
            tasks: Arc::new(Mutex::new(tasks)),
            notes: Arc::new(Mutex::new(notes)),
        }
    }

    /// Load every durable document under `paths`.
    pub fn open(paths: &DataPaths) -> Self {
        tracing::info!(data_dir = %paths.root().display(), "opening data directory");
        Self::new(
            SettingsStore::new(JsonFile::<WindowSettings>::new(paths.settings())),
            TaskRepository::load(JsonFile::<Vec<Task>>::new(paths.tasks())),
            NoteBook::load(JsonFile::<Vec<Note>>::new(paths.notes())),
        )
    }
}
