/*
Window/UI preference persistence.
Every save is read-modify-write against the durable document so a partial
update never drops fields written by an earlier partial update.
*/

use parking_lot::Mutex;

use crate::models::{SettingsPatch, WindowSettings};
use crate::store::Document;

pub struct SettingsStore {
    doc: Box<dyn Document<WindowSettings>>,
    // serialises the read-merge-write cycle
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(doc: impl Document<WindowSettings> + 'static) -> Self {
        Self {
            doc: Box::new(doc),
            write_lock: Mutex::new(()),
        }
    }

    /// Durable document if present and parseable, otherwise the defaults.
    pub fn load(&self) -> WindowSettings {
        match self.doc.read() {
            Ok(Some(settings)) => settings,
            Ok(None) => WindowSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "settings unreadable, using defaults");
                WindowSettings::default()
            }
        }
    }

    /// Merge `patch` over the current durable document and rewrite it whole.
    /// Returns the merged document even when the write fails.
    pub fn save(&self, patch: SettingsPatch) -> WindowSettings {
        let _guard = self.write_lock.lock();

        let mut settings = self.load();
        patch.merge_into(&mut settings);

        if let Err(e) = self.doc.write(&settings) {
            tracing::error!(error = %e, "failed to save settings");
        }
        settings
    }

    pub fn window_moved(&self, x: i32, y: i32) -> WindowSettings {
        self.save(SettingsPatch::moved(x, y))
    }

    pub fn window_resized(&self, width: u32, height: u32) -> WindowSettings {
        self.save(SettingsPatch::resized(width, height))
    }
}
