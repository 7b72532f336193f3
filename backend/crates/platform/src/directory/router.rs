//! Directory Router
//!
//! Exposes any [`Directory`] over HTTP so that nodes in other processes
//! can register and resolve names through [`super::HttpDirectory`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use kernel::error::app_error::{AppError, OptionExt};
use serde::{Deserialize, Serialize};

use super::{Directory, Endpoint};

/// GET /names response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameListResponse {
    pub names: Vec<String>,
}

/// Body of GET /names/{name} and PUT /names/{name}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointBody {
    pub endpoint: Endpoint,
}

/// Create the directory router for any Directory implementation
pub fn directory_router<D>(directory: Arc<D>) -> Router
where
    D: Directory + Send + Sync + 'static,
{
    Router::new()
        .route("/names", get(list_names::<D>))
        .route(
            "/names/{name}",
            get(lookup_name::<D>)
                .put(register_name::<D>)
                .delete(unbind_name::<D>),
        )
        .with_state(directory)
}

/// GET /names
async fn list_names<D>(State(directory): State<Arc<D>>) -> Result<Json<NameListResponse>, AppError>
where
    D: Directory + Send + Sync + 'static,
{
    let names = directory.list().await?;
    Ok(Json(NameListResponse { names }))
}

/// GET /names/{name}
async fn lookup_name<D>(
    State(directory): State<Arc<D>>,
    Path(name): Path<String>,
) -> Result<Json<EndpointBody>, AppError>
where
    D: Directory + Send + Sync + 'static,
{
    let endpoint = directory
        .lookup(&name)
        .await?
        .ok_or_not_found(format!("No binding for {}", name))?;
    Ok(Json(EndpointBody { endpoint }))
}

/// PUT /names/{name}
async fn register_name<D>(
    State(directory): State<Arc<D>>,
    Path(name): Path<String>,
    Json(body): Json<EndpointBody>,
) -> Result<StatusCode, AppError>
where
    D: Directory + Send + Sync + 'static,
{
    directory.register(&name, &body.endpoint).await?;
    tracing::info!(name = %name, endpoint = %body.endpoint, "Name registered");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /names/{name}
async fn unbind_name<D>(
    State(directory): State<Arc<D>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError>
where
    D: Directory + Send + Sync + 'static,
{
    directory.unbind(&name).await?;
    tracing::info!(name = %name, "Name unbound");
    Ok(StatusCode::NO_CONTENT)
}
