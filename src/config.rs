use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Fallback when the platform has no per-user data directory.
const LOCAL_DATA_DIR: &str = "data";
const APP_DIR_NAME: &str = "task-notes";

#[derive(Debug, Parser)]
#[command(name = "task_notes", version, about = "Local backend for the task & notes desktop app")]
pub struct Args {
    /// Directory holding window-settings.json, tasks.json and notes.json
    #[arg(long, env = "TASK_NOTES_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Address the HTTP API listens on
    #[arg(long, env = "TASK_NOTES_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Front-end assets served for any non-API path
    #[arg(long, env = "TASK_NOTES_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl Args {
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(LOCAL_DATA_DIR))
    }
}
