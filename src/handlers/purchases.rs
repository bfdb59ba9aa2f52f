use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::reconciliation;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReceivedResponse {
    pub processed_count: usize,
}

/// POST /purchases/{id}/process-received
///
/// Callback for the receiving flow: once a replacement purchase arrives,
/// close out the links of every pending item that was chasing it.
#[utoipa::path(
    post,
    path = "/purchases/{id}/process-received",
    params(("id" = Uuid, Path, description = "Purchase UUID")),
    responses(
        (status = 200, description = "Linked pending items processed", body = ProcessReceivedResponse),
        (status = 404, description = "Purchase not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "purchases"
)]
pub async fn process_received(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let purchase_id = path.into_inner();

    let processed_count = web::block(move || {
        let mut conn = pool.get()?;
        reconciliation::process_purchase_received(&mut conn, purchase_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProcessReceivedResponse { processed_count }))
}
