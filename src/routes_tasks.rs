// --------------------------------------------------
// Handles API endpoints related to task CRUD operations,
// list management and the selected-task reference.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Full-collection replace (saveTasks)
// - Toggle completion (Done <-> Todo, with completedAt)
// - Select a task, list / create / remove lists
// -------------------------------------------------

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::logic::now_fixed_offset;
use crate::models::{NewTask, Task, TaskPatch, TaskStatus};
use crate::repository::BUILTIN_LISTS;
use crate::state::AppState;

// -----------------------------
// GET /api/tasks
// Returns every task in memory
// -----------------------------
pub async fn get_tasks(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tasks.lock().get_all())
}

// -----------------------------
// PUT /api/tasks
// Replaces the whole collection
// -----------------------------
pub async fn save_tasks(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<Task>>,
) -> impl IntoResponse {
    state.tasks.lock().replace_all(tasks);
    Json(serde_json::json!({ "ok": true }))
}

// -----------------------------
// POST /api/tasks
// Creates a new task
// -----------------------------
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<NewTask>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }
    if input.progress > 100 {
        return (StatusCode::BAD_REQUEST, "progress must be 0..=100").into_response();
    }

    let task = state.tasks.lock().create(input);
    (StatusCode::CREATED, Json(task)).into_response()
}

// -----------------------------
// PATCH /api/tasks/:id
// Merges the given fields into an existing task
// ----------------------------
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> impl IntoResponse {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }
    if patch.progress.is_some_and(|p| p > 100) {
        return (StatusCode::BAD_REQUEST, "progress must be 0..=100").into_response();
    }

    match state.tasks.lock().update(&id, patch) {
        Some(updated) => Json(updated).into_response(),
        None => (StatusCode::NOT_FOUND, "task not found").into_response(),
    }
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task permanently
// -----------------------------
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !state.tasks.lock().remove(&id) {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    }
    Json(serde_json::json!({ "ok": true })).into_response()
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Done -> Todo clears completedAt, anything else -> Done sets it
// -----------------------------
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut tasks = state.tasks.lock();

    let Some(current) = tasks.get(&id).map(|t| t.status) else {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    };

    let patch = if current == TaskStatus::Done {
        TaskPatch {
            status: Some(TaskStatus::Todo),
            completed_at: Some(None),
            ..TaskPatch::default()
        }
    } else {
        TaskPatch {
            status: Some(TaskStatus::Done),
            completed_at: Some(Some(now_fixed_offset())),
            ..TaskPatch::default()
        }
    };

    match tasks.update(&id, patch) {
        Some(updated) => Json(updated).into_response(),
        None => (StatusCode::NOT_FOUND, "task not found").into_response(),
    }
}

// -----------------------------
// GET /api/selection
// -----------------------------
pub async fn get_selection(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tasks.lock().selected().cloned())
}

#[derive(Debug, Deserialize)]
pub struct SelectionInput {
    pub id: Option<String>,
}

// -----------------------------
// PUT /api/selection
// Selects a task, or clears with {"id": null}
// -----------------------------
pub async fn put_selection(
    State(state): State<AppState>,
    Json(input): Json<SelectionInput>,
) -> impl IntoResponse {
    let mut tasks = state.tasks.lock();
    let selected = tasks.select(input.id.as_deref()).cloned();

    if input.id.is_some() && selected.is_none() {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    }
    Json(selected).into_response()
}

// -----------------------------
// GET /api/lists
// -----------------------------
pub async fn get_lists(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tasks.lock().lists())
}

#[derive(Debug, Deserialize)]
pub struct ListInput {
    pub name: String,
}

// -----------------------------
// POST /api/lists
// Creates a list by adding its placeholder task
// -----------------------------
pub async fn create_list(
    State(state): State<AppState>,
    Json(input): Json<ListInput>,
) -> impl IntoResponse {
    let name = input.name.trim();
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, "list name required").into_response();
    }

    let placeholder = state.tasks.lock().create_list(name);
    (StatusCode::CREATED, Json(placeholder)).into_response()
}

// -----------------------------
// DELETE /api/lists/:name
// Detaches every task from the list
// -----------------------------
pub async fn delete_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    if BUILTIN_LISTS.contains(&name.as_str()) {
        return (StatusCode::BAD_REQUEST, "built-in lists cannot be removed").into_response();
    }

    let detached = state.tasks.lock().remove_list(&name);
    Json(serde_json::json!({ "detached": detached })).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;
    use crate::test_support::{app, call};

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, _) = call(&app, "POST", "/api/tasks", Some(json!({ "title": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, tasks) = call(&app, "GET", "/api/tasks", None).await;
        assert_eq!(tasks, json!([]));
    }

    #[tokio::test]
    async fn create_update_toggle_delete() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, created) = call(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Pay rent", "priority": "high", "dueDate": "2026-11-01T09:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["status"], "todo");

        let (_, updated) = call(
            &app,
            "PATCH",
            &format!("/api/tasks/{id}"),
            Some(json!({ "description": "before the 1st", "status": "in-progress" })),
        )
        .await;
        assert_eq!(updated["description"], "before the 1st");
        assert_eq!(updated["status"], "in-progress");
        assert_eq!(updated["priority"], "high");

        let (_, done) = call(&app, "POST", &format!("/api/tasks/{id}/toggle"), None).await;
        assert_eq!(done["status"], "done");
        assert!(done["completedAt"].is_string());

        let (_, undone) = call(&app, "POST", &format!("/api/tasks/{id}/toggle"), None).await;
        assert_eq!(undone["status"], "todo");
        assert!(undone.get("completedAt").is_none());

        let (status, _) = call(&app, "DELETE", &format!("/api/tasks/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", &format!("/api/tasks/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tasks_survive_restart() {
        let dir = TempDir::new().unwrap();
        {
            let app = app(&dir);
            call(&app, "POST", "/api/tasks", Some(json!({ "title": "Persist me" }))).await;
        }

        let (_, tasks) = call(&app(&dir), "GET", "/api/tasks", None).await;
        assert_eq!(tasks[0]["title"], "Persist me");
    }

    #[tokio::test]
    async fn selection_is_cleared_on_delete() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let (_, created) = call(&app, "POST", "/api/tasks", Some(json!({ "title": "Pick me" }))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (_, selected) = call(&app, "PUT", "/api/selection", Some(json!({ "id": id }))).await;
        assert_eq!(selected["id"], id.as_str());

        call(&app, "DELETE", &format!("/api/tasks/{id}"), None).await;
        let (_, selected) = call(&app, "GET", "/api/selection", None).await;
        assert_eq!(selected, Value::Null);
    }

    #[tokio::test]
    async fn lists_lifecycle() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, _) = call(&app, "POST", "/api/lists", Some(json!({ "name": "Garden" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, lists) = call(&app, "GET", "/api/lists", None).await;
        assert_eq!(lists, json!(["Garden", "Life", "Work"]));

        let (status, _) = call(&app, "DELETE", "/api/lists/Work", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, removed) = call(&app, "DELETE", "/api/lists/Garden", None).await;
        assert_eq!(removed["detached"], 1);
        let (_, lists) = call(&app, "GET", "/api/lists", None).await;
        assert_eq!(lists, json!(["Life", "Work"]));
    }
}
