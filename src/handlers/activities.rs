use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::database::repositories::ActivityRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ActivityListQuery {
    pub limit: Option<i64>,
}

pub async fn get_activities(
    claims: Claims,
    repo: web::Data<ActivityRepository>,
    query: web::Query<ActivityListQuery>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::PermissionDenied(
            "Insufficient permissions to read the audit trail".to_string(),
        ));
    }

    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).clamp(1, 500);
    let activities = repo.list_recent(limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(activities)))
}
