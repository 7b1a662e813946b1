//! Memory endpoints: per-user JSON files under `/memories` and the
//! single-file MCP store under `/mcp`

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{McpAddRequest, McpSearchRequest, MemorySearchRequest, UserQuery};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};
use teamgate_plugin_memory::NewMemory;
use tracing::info;

/// `POST /memories/`
pub async fn create_memory(
    State(state): State<AppState>,
    Json(request): Json<NewMemory>,
) -> ApiResult<Json<Value>> {
    let entry = state.memories.create(request).await?;
    info!(user_id = %entry.user_id, "memory created");
    Ok(Json(json!({ "status": "success", "results": [entry] })))
}

/// `GET /memories/?user_id=`
pub async fn list_memories(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    let results = state.memories.list(&query.user_id).await?;
    Ok(Json(json!({ "status": "success", "results": results })))
}

/// `POST /memories/search`
pub async fn search_memories(
    State(state): State<AppState>,
    Json(request): Json<MemorySearchRequest>,
) -> ApiResult<Json<Value>> {
    let results = state
        .memories
        .search(&request.user_id, &request.query, request.limit)
        .await?;
    Ok(Json(json!({ "status": "success", "results": results })))
}

/// `DELETE /memories/?user_id=`
pub async fn delete_memories(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    state.memories.delete(&query.user_id).await?;
    Ok(Json(
        json!({ "status": "success", "message": "Memories deleted" }),
    ))
}

/// `POST /mcp/add_memory`
pub async fn mcp_add_memory(
    State(state): State<AppState>,
    Json(request): Json<McpAddRequest>,
) -> ApiResult<Json<Value>> {
    state.mcp.add(&request.user_id, &request.content).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Memory added successfully",
        "user_id": request.user_id,
    })))
}

/// `POST /mcp/search_memory`
pub async fn mcp_search_memory(
    State(state): State<AppState>,
    Json(request): Json<McpSearchRequest>,
) -> ApiResult<Json<Value>> {
    let results = state
        .mcp
        .search(&request.user_id, &request.query, request.limit)
        .await?;
    Ok(Json(json!({
        "status": "success",
        "results": results,
        "user_id": request.user_id,
    })))
}

/// `GET /mcp/memories/:user_id`
pub async fn mcp_list_memories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let memories = state.mcp.list(&user_id).await?;
    Ok(Json(json!({
        "status": "success",
        "count": memories.len(),
        "memories": memories,
        "user_id": user_id,
    })))
}

/// `DELETE /mcp/memories/:user_id`
pub async fn mcp_delete_memories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let message = if state.mcp.delete(&user_id).await? {
        format!("All memories deleted for user {}", user_id)
    } else {
        format!("No memories found for user {}", user_id)
    };
    Ok(Json(json!({
        "status": "success",
        "message": message,
        "user_id": user_id,
    })))
}
