// Define data modules
mod config;         // CLI / env configuration
mod error;          // Store error type
mod models;         // Data structures (Task, Note, WindowSettings, FilterOptions, etc.)
mod store;          // Durable JSON documents (tasks.json, notes.json, window-settings.json)
mod logic;          // Query pipeline: filter, sort, focus, group, statistics
mod repository;     // In-memory task collection with write-through persistence
mod notes;          // In-memory note collection with write-through persistence
mod settings;       // Read-modify-write settings store
mod state;          // Shared service objects
mod routes_tasks;   // HTTP handlers for task, selection & list APIs
mod routes_query;   // HTTP handlers for query & statistics APIs
mod routes_settings; // HTTP handlers for settings & window events
mod routes_notes;   // HTTP handlers for note APIs
#[cfg(test)]
mod test_support;

use std::path::Path;

use anyhow::Context;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use clap::Parser;
use tower_http::services::ServeDir; // Serves the front-end bundle for non-API paths

use config::Args;
use state::AppState;
use store::DataPaths;

/// API routes nested under `/api`, with the static front-end as fallback.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        // settings
        .route("/settings", get(routes_settings::get_settings).patch(routes_settings::save_settings))
        .route("/window/moved", post(routes_settings::window_moved))
        .route("/window/resized", post(routes_settings::window_resized))
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task).put(routes_tasks::save_tasks))
        .route("/tasks/query", post(routes_query::query_tasks))
        .route("/tasks/stats", get(routes_query::get_stats))
        .route("/tasks/:id", patch(routes_tasks::update_task).delete(routes_tasks::delete_task))
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        .route("/selection", get(routes_tasks::get_selection).put(routes_tasks::put_selection))
        // lists
        .route("/lists", get(routes_tasks::get_lists).post(routes_tasks::create_list))
        .route("/lists/:name", delete(routes_tasks::delete_list))
        // notes
        .route("/notes", get(routes_notes::get_notes).post(routes_notes::create_note).put(routes_notes::save_notes))
        .route("/notes/:id", patch(routes_notes::update_note).delete(routes_notes::delete_note))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,task_notes=debug".into()),
        )
        .with_target(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    let paths = DataPaths::new(args.resolved_data_dir());
    let state = AppState::open(&paths);

    let app = app(state, &args.static_dir);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;

    tracing::info!("Server running at http://{}", args.addr);
    tracing::info!("Static files: {}", args.static_dir.display());
    tracing::info!("API base:     http://{}/api", args.addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
