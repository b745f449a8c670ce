use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{CreateProfileInput, UpdateProfileInput, entity_type};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::telework::Actor;

pub async fn create_profile(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<CreateProfileInput>,
) -> Result<HttpResponse, AppError> {
    let profile = state
        .telework_service
        .create_profile(input.into_inner(), Some(Actor::from(&claims)))
        .await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::PROFILE,
            &profile.user_id.to_string(),
            "created",
            format!("Telework profile created for {}", profile.display_name),
            None,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(profile)))
}

/// Reading a profile creates it lazily with stock defaults when the user
/// exists but has never been configured.
pub async fn get_profile(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    if !claims.is_manager_or_admin() && user_id != claims.sub {
        return Err(AppError::PermissionDenied(
            "Cannot view other users' telework profiles".to_string(),
        ));
    }

    let profile = state
        .telework_service
        .get_or_create_profile(user_id, Some(Actor::from(&claims)))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

pub async fn update_profile(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateProfileInput>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let profile = state
        .telework_service
        .update_profile(user_id, input.into_inner(), Some(Actor::from(&claims)))
        .await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::PROFILE,
            &user_id.to_string(),
            "updated",
            format!("Telework profile updated for {}", profile.display_name),
            None,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}
