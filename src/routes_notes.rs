use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::models::{Note, NotePatch};
use crate::state::AppState;

// GET /api/notes
pub async fn get_notes(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.notes.lock().get_all())
}

// PUT /api/notes
pub async fn save_notes(
    State(state): State<AppState>,
    Json(notes): Json<Vec<Note>>,
) -> impl IntoResponse {
    state.notes.lock().replace_all(notes);
    Json(serde_json::json!({ "ok": true }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateNoteInput {
    pub title: String,
    pub content: String,
}

// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<CreateNoteInput>,
) -> impl IntoResponse {
    let note = state.notes.lock().create(input.title, input.content);
    (StatusCode::CREATED, Json(note))
}

// PATCH /api/notes/:id
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<NotePatch>,
) -> impl IntoResponse {
    match state.notes.lock().update(&id, patch) {
        Some(note) => Json(note).into_response(),
        None => (StatusCode::NOT_FOUND, "note not found").into_response(),
    }
}

// DELETE /api/notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !state.notes.lock().remove(&id) {
        return (StatusCode::NOT_FOUND, "note not found").into_response();
    }
    Json(serde_json::json!({ "ok": true })).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::test_support::{app, call};

    #[tokio::test]
    async fn note_crud_round_trip() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, note) = call(
            &app,
            "POST",
            "/api/notes",
            Some(json!({ "title": "Groceries", "content": "<ul><li>eggs</li></ul>" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = note["id"].as_str().unwrap().to_string();

        let (_, edited) =
            call(&app, "PATCH", &format!("/api/notes/{id}"), Some(json!({ "title": "Shopping" }))).await;
        assert_eq!(edited["title"], "Shopping");
        assert_eq!(edited["content"], "<ul><li>eggs</li></ul>");

        let (status, _) = call(&app, "PATCH", "/api/notes/nope", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        call(&app, "DELETE", &format!("/api/notes/{id}"), None).await;
        let (_, notes) = call(&app, "GET", "/api/notes", None).await;
        assert_eq!(notes, json!([]));
    }

    #[tokio::test]
    async fn save_notes_replaces_everything() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        call(&app, "POST", "/api/notes", Some(json!({ "title": "old" }))).await;

        let replacement = json!([{
            "id": "n1",
            "title": "kept",
            "content": "<p>hi</p>",
            "createdAt": "2026-02-01T08:00:00Z",
            "updatedAt": "2026-02-01T08:00:00Z",
            "pinned": true
        }]);
        call(&app, "PUT", "/api/notes", Some(replacement)).await;

        let (_, notes) = call(&app, "GET", "/api/notes", None).await;
        assert_eq!(notes.as_array().unwrap().len(), 1);
        assert_eq!(notes[0]["pinned"], true);
    }
}
