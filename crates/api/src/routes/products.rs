//! Product listing and reservation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ItemId;
use counter_store::CounterStore;
use domain::{Product, ReservationError, ReservationOutcome};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

pub const STATUS_NOT_FOUND: &str = "Product not found";
pub const STATUS_OUT_OF_STOCK: &str = "Not enough stock available";
pub const STATUS_CONFIRMED: &str = "Reservation confirmed";

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub item_id: ItemId,
    pub item_name: String,
    pub price: u32,
    pub initial_available_quantity: u32,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            item_id: product.id,
            item_name: product.name.clone(),
            price: product.price,
            initial_available_quantity: product.initial_stock,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub current_quantity: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
}

impl StatusResponse {
    fn not_found() -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            item_id: None,
        }
    }
}

impl From<ReservationOutcome> for StatusResponse {
    fn from(outcome: ReservationOutcome) -> Self {
        let status = match outcome {
            ReservationOutcome::Reserved { .. } => STATUS_CONFIRMED,
            ReservationOutcome::OutOfStock { .. } => STATUS_OUT_OF_STOCK,
        };
        Self {
            status,
            item_id: Some(outcome.item_id()),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ProductLookupResponse {
    Found(ProductDetailResponse),
    Missing(StatusResponse),
}

// -- Handlers --

/// GET /list_products: list every catalog product.
#[tracing::instrument(skip(state))]
pub async fn list<S: CounterStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<ProductResponse>> {
    let products = state
        .engine
        .list_catalog()
        .iter()
        .map(ProductResponse::from)
        .collect();
    Json(products)
}

/// GET /list_products/{item_id}: a product with its live quantity.
#[tracing::instrument(skip(state))]
pub async fn get<S: CounterStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(item_id): Path<String>,
) -> Result<Json<ProductLookupResponse>, ApiError> {
    let Some(item_id) = parse_item_id(&item_id) else {
        return Ok(Json(ProductLookupResponse::Missing(StatusResponse::not_found())));
    };

    match state.engine.product_with_quantity(item_id).await {
        Ok((product, current_quantity)) => {
            Ok(Json(ProductLookupResponse::Found(ProductDetailResponse {
                product: ProductResponse::from(product),
                current_quantity,
            })))
        }
        Err(ReservationError::ProductNotFound(_)) => {
            Ok(Json(ProductLookupResponse::Missing(StatusResponse::not_found())))
        }
        Err(ReservationError::Store(err)) => Err(err.into()),
    }
}

/// GET /reserve_product/{item_id}: reserve one unit of a product.
#[tracing::instrument(skip(state))]
pub async fn reserve<S: CounterStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(item_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Some(item_id) = parse_item_id(&item_id) else {
        return Ok(Json(StatusResponse::not_found()));
    };

    match state.engine.reserve(item_id).await {
        Ok(outcome) => Ok(Json(StatusResponse::from(outcome))),
        Err(ReservationError::ProductNotFound(_)) => Ok(Json(StatusResponse::not_found())),
        Err(ReservationError::Store(err)) => Err(err.into()),
    }
}

/// Ids that are not base-10 integers cannot name a product.
fn parse_item_id(raw: &str) -> Option<ItemId> {
    raw.parse::<ItemId>().ok()
}
