use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::logic::{self, QueryContext, TaskStatistics, TaskView};
use crate::models::FilterOptions;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub search: String,
    pub filters: FilterOptions,
    pub focus_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub now: String,
    #[serde(flatten)]
    pub view: TaskView,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub now: String,
    #[serde(flatten)]
    pub stats: TaskStatistics,
}

// POST /api/tasks/query
// Filter -> sort -> focus -> group over the current collection
pub async fn query_tasks(
    State(state): State<AppState>,
    Json(q): Json<QueryRequest>,
) -> impl IntoResponse {
    let ctx = QueryContext {
        now: logic::now_fixed_offset(),
        focus_mode: q.focus_mode,
    };

    let view = {
        let tasks = state.tasks.lock();
        logic::query(tasks.tasks(), &q.search, &q.filters, &ctx)
    };

    Json(QueryResponse {
        now: ctx.now.to_rfc3339(),
        view,
    })
}

// GET /api/tasks/stats
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let ctx = QueryContext {
        now: logic::now_fixed_offset(),
        focus_mode: false,
    };

    let stats = logic::statistics(state.tasks.lock().tasks(), &ctx);

    Json(StatsResponse {
        now: ctx.now.to_rfc3339(),
        stats,
    })
}
