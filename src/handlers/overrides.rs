use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{
    OverrideQuery, OverrideRequestInput, RejectOverrideInput, ValidateOverrideInput, entity_type,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::telework::Actor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuery {
    pub approver_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupSummary {
    pub deleted: u64,
}

pub async fn request_override(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<OverrideRequestInput>,
) -> Result<HttpResponse, AppError> {
    let override_row = state
        .telework_service
        .request_override(input.into_inner(), Some(Actor::from(&claims)))
        .await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::OVERRIDE,
            &override_row.id,
            "requested",
            format!(
                "Override requested: {} on {}",
                override_row.mode, override_row.date
            ),
            Some(serde_json::json!({
                "mode": override_row.mode,
                "approvalStatus": override_row.approval_status,
            })),
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(override_row)))
}

/// Dry-run validation; always 200, the result carries the outcome.
pub async fn validate_override(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<ValidateOverrideInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    if !claims.is_manager_or_admin() && input.user_id != claims.sub {
        return Err(AppError::PermissionDenied(
            "Cannot validate requests for other users".to_string(),
        ));
    }

    let result = state
        .telework_service
        .validate_override_request(input.user_id, input.date, input.requested_mode)
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

pub async fn get_overrides(
    claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<OverrideQuery>,
) -> Result<HttpResponse, AppError> {
    let mut query = query.into_inner();

    // Employees only see their own declarations
    if !claims.is_manager_or_admin() {
        query.user_id = Some(claims.sub);
    }

    let overrides = state.telework_service.get_overrides(&query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(overrides)))
}

pub async fn get_user_overrides(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    if !claims.is_manager_or_admin() && user_id != claims.sub {
        return Err(AppError::PermissionDenied(
            "Cannot view other users' overrides".to_string(),
        ));
    }

    let overrides = state
        .telework_service
        .get_user_overrides(user_id, query.start_date, query.end_date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(overrides)))
}

pub async fn get_pending_overrides(
    claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<PendingQuery>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::PermissionDenied(
            "Insufficient permissions to review overrides".to_string(),
        ));
    }

    let overrides = state
        .telework_service
        .get_pending_overrides(query.approver_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(overrides)))
}

pub async fn approve_override(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::PermissionDenied(
            "Insufficient permissions to approve overrides".to_string(),
        ));
    }

    let id = path.into_inner();
    let override_row = state
        .telework_service
        .approve_override(&id, claims.sub)
        .await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::OVERRIDE,
            &override_row.id,
            "approved",
            format!(
                "Override approved for {} on {}",
                override_row.user_id, override_row.date
            ),
            None,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(override_row)))
}

pub async fn reject_override(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<RejectOverrideInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::PermissionDenied(
            "Insufficient permissions to reject overrides".to_string(),
        ));
    }

    let id = path.into_inner();
    let override_row = state
        .telework_service
        .reject_override(&id, claims.sub, input.into_inner().rejection_reason)
        .await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::OVERRIDE,
            &override_row.id,
            "rejected",
            format!(
                "Override rejected for {} on {}",
                override_row.user_id, override_row.date
            ),
            None,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(override_row)))
}

pub async fn delete_override(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    state
        .telework_service
        .delete_override(&id, Some(Actor::from(&claims)))
        .await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::OVERRIDE,
            &id,
            "deleted",
            format!("Override {} deleted", id),
            None,
        )
        .await;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn cleanup_expired(
    claims: Claims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::PermissionDenied(
            "Insufficient permissions to purge overrides".to_string(),
        ));
    }

    let deleted = state.telework_service.cleanup_expired_overrides().await?;
    log::info!("Purged {} expired telework overrides", deleted);

    Ok(HttpResponse::Ok().json(ApiResponse::success(CleanupSummary { deleted })))
}
