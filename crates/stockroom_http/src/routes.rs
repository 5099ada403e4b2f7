//! Route table and handlers.
//!
//! | route | operation |
//! |---|---|
//! | `GET /api/products?name=` | list or search |
//! | `GET /api/inventory/status?name=` | list or search (alias) |
//! | `GET /api/products/{product}` | get by ID |
//! | `POST /api/products` | create |
//! | `PATCH /api/products/{product}/stock?quantity_change=` | adjust by name |
//! | `DELETE /api/products/{product}` | remove by name |
//! | `GET /api/health` | health |

use crate::error::ApiError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{MatchedPath, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch};
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use stockroom_core::{
    InventoryHealth, InventoryResult, InventoryService, NewProductRequest, Product,
    ProductRepository,
};

type SharedInventory<R> = Arc<InventoryService<R>>;

#[derive(Debug, Deserialize)]
struct NameQuery {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StockQuery {
    quantity_change: i64,
}

/// Builds the API router over one shared service.
pub fn router<R>(service: SharedInventory<R>) -> Router
where
    R: ProductRepository + Send + 'static,
{
    // `{product}` is an ID for GET and a name for PATCH/DELETE; one parameter
    // name keeps the two routes from conflicting.
    Router::new()
        .route(
            "/api/products",
            get(list_products::<R>).post(create_product::<R>),
        )
        .route("/api/inventory/status", get(list_products::<R>))
        .route(
            "/api/products/{product}",
            get(get_product::<R>).delete(delete_product::<R>),
        )
        .route("/api/products/{product}/stock", patch(adjust_stock::<R>))
        .route("/api/health", get(health::<R>))
        .route_layer(middleware::from_fn(log_request))
        .with_state(service)
}

async fn list_products<R>(
    State(service): State<SharedInventory<R>>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    R: ProductRepository + Send + 'static,
{
    let Query(query) = query?;
    let products =
        run_blocking(&service, move |svc| svc.list_or_search(query.name.as_deref())).await?;
    Ok(Json(products))
}

async fn get_product<R>(
    State(service): State<SharedInventory<R>>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError>
where
    R: ProductRepository + Send + 'static,
{
    let product = run_blocking(&service, move |svc| svc.get_product(&product_id)).await?;
    Ok(Json(product))
}

async fn create_product<R>(
    State(service): State<SharedInventory<R>>,
    request: Result<Json<NewProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError>
where
    R: ProductRepository + Send + 'static,
{
    let Json(request) = request?;
    let product = run_blocking(&service, move |svc| svc.create_from_request(&request)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn adjust_stock<R>(
    State(service): State<SharedInventory<R>>,
    Path(product_name): Path<String>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> Result<Json<Product>, ApiError>
where
    R: ProductRepository + Send + 'static,
{
    let Query(query) = query?;
    let product = run_blocking(&service, move |svc| {
        svc.adjust(&product_name, query.quantity_change)
    })
    .await?;
    Ok(Json(product))
}

async fn delete_product<R>(
    State(service): State<SharedInventory<R>>,
    Path(product_name): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: ProductRepository + Send + 'static,
{
    run_blocking(&service, move |svc| svc.remove(&product_name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health<R>(
    State(service): State<SharedInventory<R>>,
) -> Result<Json<InventoryHealth>, ApiError>
where
    R: ProductRepository + Send + 'static,
{
    let health = run_blocking(&service, |svc| svc.health()).await?;
    Ok(Json(health))
}

async fn run_blocking<R, T, F>(service: &SharedInventory<R>, op: F) -> Result<T, ApiError>
where
    R: ProductRepository + Send + 'static,
    T: Send + 'static,
    F: FnOnce(&InventoryService<R>) -> InventoryResult<T> + Send + 'static,
{
    let service = Arc::clone(service);
    let result = tokio::task::spawn_blocking(move || op(service.as_ref()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(result?)
}

// Logs the route template, not the raw path: paths carry product names.
async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    info!(
        "event=http_request module=http status=done method={} route={} http_status={} duration_ms={}",
        method,
        route,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
