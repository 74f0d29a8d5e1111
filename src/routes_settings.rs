// --------------------------------------------------
// Window / UI settings endpoints.
//
// Every call is one partial save merged over the durable
// document. Window chrome itself is owned by the shell.
// -------------------------------------------------

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::models::SettingsPatch;
use crate::state::AppState;

fn validate(patch: &SettingsPatch) -> Result<(), &'static str> {
    if patch.opacity.is_some_and(|o| !(0.0..=1.0).contains(&o)) {
        return Err("opacity must be within 0.0..=1.0");
    }
    if patch.width == Some(0) || patch.height == Some(0) {
        return Err("width and height must be positive");
    }
    Ok(())
}

// -----------------------------
// GET /api/settings
// -----------------------------
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.settings.load())
}

// -----------------------------
// PATCH /api/settings
// Merges the given fields and returns the full document
// -----------------------------
pub async fn save_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> impl IntoResponse {
    if let Err(reason) = validate(&patch) {
        return (StatusCode::BAD_REQUEST, reason).into_response();
    }
    Json(state.settings.save(patch)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct MovedInput {
    pub x: i32,
    pub y: i32,
}

// -----------------------------
// POST /api/window/moved
// -----------------------------
pub async fn window_moved(
    State(state): State<AppState>,
    Json(input): Json<MovedInput>,
) -> impl IntoResponse {
    Json(state.settings.window_moved(input.x, input.y))
}

#[derive(Debug, Deserialize)]
pub struct ResizedInput {
    pub width: u32,
    pub height: u32,
}

// -----------------------------
// POST /api/window/resized
// -----------------------------
pub async fn window_resized(
    State(state): State<AppState>,
    Json(input): Json<ResizedInput>,
) -> impl IntoResponse {
    if input.width == 0 || input.height == 0 {
        return (StatusCode::BAD_REQUEST, "width and height must be positive").into_response();
    }
    Json(state.settings.window_resized(input.width, input.height)).into_response()
}
