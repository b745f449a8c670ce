use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{CreateUserInput, LoginInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .auth_service
        .register(input.into_inner())
        .await
        .map_err(|err| {
            log::warn!("Registration failed: {}", err);
            AppError::BadRequest(err.to_string())
        })?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .auth_service
        .login(input.into_inner())
        .await
        .map_err(|err| {
            log::warn!("Login failed: {}", err);
            AppError::Unauthorized
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(claims: Claims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let user = state
        .auth_service
        .current_user(&claims)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}
