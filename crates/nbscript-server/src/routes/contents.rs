//! Contents API: read, save, list, and delete documents.
//!
//! Saving a notebook triggers whatever post-save hooks the manager carries;
//! a hook failure is reported as the save's failure, so a client sees the
//! script-export error on its PUT.

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use nbscript_core::{ApiPath, Notebook};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use nbscript_store::{Content, ContentType, ContentsModel, FileContentsManager, StoreResult};

/// Request body for PUT /api/contents/{path}.
#[derive(Debug, Deserialize)]
struct SaveRequest {
    /// Entry kind being saved.
    #[serde(rename = "type")]
    content_type: ContentType,
    /// Content matching the declared kind; absent for directories.
    #[serde(default)]
    content: Option<serde_json::Value>,
}

/// Build contents routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contents", get(get_root))
        .route(
            "/api/contents/{*path}",
            get(get_contents).put(save_contents).delete(delete_contents),
        )
}

/// GET /api/contents - List the serving root.
async fn get_root(State(state): State<AppState>) -> ApiResult<Json<ContentsModel>> {
    let model = run_contents(state.manager().clone(), move |m| m.get(&ApiPath::root())).await?;
    Ok(Json(model))
}

/// GET /api/contents/{path} - Read a document or list a directory.
async fn get_contents(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> ApiResult<Json<ContentsModel>> {
    let api_path = parse_path(&path)?;
    let model = run_contents(state.manager().clone(), move |m| m.get(&api_path)).await?;
    Ok(Json(model))
}

/// PUT /api/contents/{path} - Save a document, then run post-save hooks.
async fn save_contents(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
    Json(request): Json<SaveRequest>,
) -> ApiResult<Json<ContentsModel>> {
    let api_path = parse_path(&path)?;
    let content = decode_content(&api_path, request.content_type, request.content)?;
    let model = ContentsModel::for_save(request.content_type, api_path, content);
    let saved = run_contents(state.manager().clone(), move |m| m.save(&model)).await?;
    Ok(Json(saved))
}

/// DELETE /api/contents/{path} - Remove a document or directory.
async fn delete_contents(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> ApiResult<StatusCode> {
    let api_path = parse_path(&path)?;
    run_contents(state.manager().clone(), move |m| m.delete(&api_path)).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_path(raw: &str) -> ApiResult<ApiPath> {
    ApiPath::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn decode_content(
    path: &ApiPath,
    content_type: ContentType,
    content: Option<serde_json::Value>,
) -> ApiResult<Content> {
    match content_type {
        ContentType::Directory => Ok(Content::Listing(Vec::new())),
        ContentType::Notebook => {
            let value = require_content(path, content)?;
            let notebook: Notebook = serde_json::from_value(value)
                .map_err(|e| ApiError::BadRequest(format!("malformed notebook {path}: {e}")))?;
            Ok(Content::Notebook(notebook))
        }
        ContentType::File => {
            let value = require_content(path, content)?;
            let text = value
                .as_str()
                .ok_or_else(|| ApiError::BadRequest(format!("file content for {path} must be a string")))?;
            Ok(Content::Text(text.to_string()))
        }
    }
}

fn require_content(path: &ApiPath, content: Option<serde_json::Value>) -> ApiResult<serde_json::Value> {
    content.ok_or_else(|| ApiError::BadRequest(format!("save of {path} requires content")))
}

/// Run a blocking contents operation off the async runtime.
async fn run_contents<T, F>(manager: Arc<FileContentsManager>, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&FileContentsManager) -> StoreResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&manager))
        .await
        .map_err(|_| ApiError::Internal("contents task failed".to_string()))?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_notebook_content() {
        let path = ApiPath::new("nb.ipynb").unwrap();
        let value = serde_json::json!({
            "cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5
        });
        let content = decode_content(&path, ContentType::Notebook, Some(value)).unwrap();
        assert!(matches!(content, Content::Notebook(_)));
    }

    #[test]
    fn test_decode_rejects_missing_content() {
        let path = ApiPath::new("nb.ipynb").unwrap();
        let err = decode_content(&path, ContentType::Notebook, None).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_decode_rejects_non_string_file_content() {
        let path = ApiPath::new("notes.txt").unwrap();
        let err =
            decode_content(&path, ContentType::File, Some(serde_json::json!(42))).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
