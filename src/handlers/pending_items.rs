use std::collections::BTreeMap;
use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::pending_item::{PendingItem, PendingItemChanges};
use crate::reconciliation::{self, CreatePendingItem, RefundDetails};
use crate::stats;

// ── Request / response DTOs ──────────────────────────────────────────────────
// Bodies are camelCase to match the web client.

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePendingItemRequest {
    pub original_purchase_id: Uuid,
    pub car_id: String,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub condition: String,
    pub brand: Option<String>,
    pub piece_type: Option<String>,
    #[serde(default)]
    pub is_treasure_hunt: bool,
    #[serde(default)]
    pub is_super_treasure_hunt: bool,
    #[serde(default)]
    pub is_chase: bool,
    pub photos: Option<Vec<String>>,
    pub notes: Option<String>,
    /// Explicit initial status; defaults to "pending-reshipment".
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePendingItemRequest {
    pub car_id: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<String>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub piece_type: Option<String>,
    pub is_treasure_hunt: Option<bool>,
    pub is_super_treasure_hunt: Option<bool>,
    pub is_chase: Option<bool>,
    pub photos: Option<Vec<String>>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub refund_amount: Option<String>,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_method: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkToPurchaseRequest {
    pub purchase_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkRefundedRequest {
    /// Decimal amount as a string, e.g. "24.99"
    pub refund_amount: String,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingItemResponse {
    pub id: Uuid,
    pub original_purchase_id: Uuid,
    pub linked_to_purchase_id: Option<Uuid>,
    pub car_id: String,
    pub quantity: i32,
    pub unit_price: String,
    pub condition: String,
    pub brand: Option<String>,
    pub piece_type: Option<String>,
    pub is_treasure_hunt: bool,
    pub is_super_treasure_hunt: bool,
    pub is_chase: bool,
    pub photos: Option<Vec<String>>,
    pub status: String,
    pub reported_date: String,
    pub notes: Option<String>,
    pub refund_amount: Option<String>,
    pub refund_date: Option<String>,
    pub refund_method: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PendingItem> for PendingItemResponse {
    fn from(item: PendingItem) -> Self {
        PendingItemResponse {
            id: item.id,
            original_purchase_id: item.original_purchase_id,
            linked_to_purchase_id: item.linked_to_purchase_id,
            car_id: item.car_id,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            condition: item.condition,
            brand: item.brand,
            piece_type: item.piece_type,
            is_treasure_hunt: item.is_treasure_hunt,
            is_super_treasure_hunt: item.is_super_treasure_hunt,
            is_chase: item.is_chase,
            photos: item.photos,
            status: item.status,
            reported_date: item.reported_date.to_rfc3339(),
            notes: item.notes,
            refund_amount: item.refund_amount.map(|a| a.to_string()),
            refund_date: item.refund_date.map(|d| d.to_rfc3339()),
            refund_method: item.refund_method,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPendingItemsParams {
    pub status: Option<String>,
    pub overdue: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPendingItemsResponse {
    pub items: Vec<PendingItemResponse>,
    pub count: i64,
    pub total_value: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingItemStatsResponse {
    pub total_count: i64,
    pub total_value: String,
    pub by_status: BTreeMap<String, i64>,
    pub overdue_count: i64,
}

fn parse_price(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|e| AppError::Validation(format!("invalid {field} '{raw}': {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /pending-items
#[utoipa::path(
    get,
    path = "/pending-items",
    params(
        ("status" = Option<String>, Query, description = "Exact status filter"),
        ("overdue" = Option<bool>, Query, description = "Only items reported more than 15 days ago"),
    ),
    responses(
        (status = 200, description = "Filtered pending items", body = ListPendingItemsResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn list_pending_items(
    pool: web::Data<DbPool>,
    query: web::Query<ListPendingItemsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let result = web::block(move || {
        let mut conn = pool.get()?;
        stats::get_filtered(
            &mut conn,
            params.status.as_deref(),
            params.overdue.unwrap_or(false),
            Utc::now(),
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let count = result.items.len() as i64;
    Ok(HttpResponse::Ok().json(ListPendingItemsResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        count,
        total_value: result.total_value.to_string(),
    }))
}

/// GET /pending-items/stats
#[utoipa::path(
    get,
    path = "/pending-items/stats",
    responses(
        (status = 200, description = "Rollups over all pending items", body = PendingItemStatsResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn get_pending_item_stats(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let result = web::block(move || {
        let mut conn = pool.get()?;
        stats::get_stats(&mut conn, Utc::now())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PendingItemStatsResponse {
        total_count: result.total_count,
        total_value: result.total_value.to_string(),
        by_status: result.by_status,
        overdue_count: result.overdue_count,
    }))
}

/// POST /pending-items
#[utoipa::path(
    post,
    path = "/pending-items",
    request_body = CreatePendingItemRequest,
    responses(
        (status = 201, description = "Pending item created", body = PendingItemResponse),
        (status = 400, description = "Invalid line fields"),
        (status = 404, description = "Original purchase not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn create_pending_item(
    pool: web::Data<DbPool>,
    body: web::Json<CreatePendingItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let unit_price = parse_price("unitPrice", &body.unit_price)?;

    let item = web::block(move || {
        let mut conn = pool.get()?;
        reconciliation::create_pending_item(
            &mut conn,
            CreatePendingItem {
                original_purchase_id: body.original_purchase_id,
                car_id: body.car_id,
                quantity: body.quantity,
                unit_price,
                condition: body.condition,
                brand: body.brand,
                piece_type: body.piece_type,
                is_treasure_hunt: body.is_treasure_hunt,
                is_super_treasure_hunt: body.is_super_treasure_hunt,
                is_chase: body.is_chase,
                photos: body.photos,
                notes: body.notes,
                status: body.status,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PendingItemResponse::from(item)))
}

/// PUT /pending-items/{id}
#[utoipa::path(
    put,
    path = "/pending-items/{id}",
    params(("id" = Uuid, Path, description = "Pending item UUID")),
    request_body = UpdatePendingItemRequest,
    responses(
        (status = 200, description = "Pending item updated", body = PendingItemResponse),
        (status = 400, description = "Invalid fields"),
        (status = 404, description = "Pending item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn update_pending_item(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePendingItemRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    let unit_price = body
        .unit_price
        .as_deref()
        .map(|raw| parse_price("unitPrice", raw))
        .transpose()?;
    let refund_amount = body
        .refund_amount
        .as_deref()
        .map(|raw| parse_price("refundAmount", raw))
        .transpose()?;

    let item = web::block(move || {
        let mut conn = pool.get()?;
        reconciliation::update_pending_item(
            &mut conn,
            id,
            PendingItemChanges {
                car_id: body.car_id,
                quantity: body.quantity,
                unit_price,
                condition: body.condition,
                brand: body.brand,
                piece_type: body.piece_type,
                is_treasure_hunt: body.is_treasure_hunt,
                is_super_treasure_hunt: body.is_super_treasure_hunt,
                is_chase: body.is_chase,
                photos: body.photos,
                status: body.status,
                notes: body.notes,
                refund_amount,
                refund_date: body.refund_date,
                refund_method: body.refund_method,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PendingItemResponse::from(item)))
}

/// PUT /pending-items/{id}/link-to-purchase
#[utoipa::path(
    put,
    path = "/pending-items/{id}/link-to-purchase",
    params(("id" = Uuid, Path, description = "Pending item UUID")),
    request_body = LinkToPurchaseRequest,
    responses(
        (status = 200, description = "Item linked to replacement purchase", body = PendingItemResponse),
        (status = 400, description = "Linking rule violated"),
        (status = 404, description = "Item or purchase not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn link_to_purchase(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<LinkToPurchaseRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let purchase_id = body.into_inner().purchase_id;

    let item = web::block(move || {
        let mut conn = pool.get()?;
        reconciliation::link_to_purchase(&mut conn, id, purchase_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PendingItemResponse::from(item)))
}

/// PUT /pending-items/{id}/mark-refunded
#[utoipa::path(
    put,
    path = "/pending-items/{id}/mark-refunded",
    params(("id" = Uuid, Path, description = "Pending item UUID")),
    request_body = MarkRefundedRequest,
    responses(
        (status = 200, description = "Item marked as refunded", body = PendingItemResponse),
        (status = 400, description = "Invalid refund amount"),
        (status = 404, description = "Pending item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn mark_refunded(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<MarkRefundedRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let refund_amount = parse_price("refundAmount", &body.refund_amount)?;

    let item = web::block(move || {
        let mut conn = pool.get()?;
        reconciliation::mark_refunded(
            &mut conn,
            id,
            RefundDetails {
                refund_amount,
                refund_date: body.refund_date,
                refund_method: body.refund_method,
                notes: body.notes,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PendingItemResponse::from(item)))
}

/// DELETE /pending-items/{id}
#[utoipa::path(
    delete,
    path = "/pending-items/{id}",
    params(("id" = Uuid, Path, description = "Pending item UUID")),
    responses(
        (status = 200, description = "Pending item deleted"),
        (status = 404, description = "Pending item not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "pending-items"
)]
pub async fn delete_pending_item(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        reconciliation::delete_pending_item(&mut conn, id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({ "data": null })))
}
