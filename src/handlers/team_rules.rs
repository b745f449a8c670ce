use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{TeamRuleInput, entity_type};
use crate::database::repositories::TeamRuleRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

fn require_manager(claims: &Claims) -> Result<(), AppError> {
    if !claims.is_manager_or_admin() {
        return Err(AppError::PermissionDenied(
            "Insufficient permissions to manage team rules".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_rule(
    claims: Claims,
    state: web::Data<AppState>,
    repo: web::Data<TeamRuleRepository>,
    input: web::Json<TeamRuleInput>,
) -> Result<HttpResponse, AppError> {
    require_manager(&claims)?;

    let rule = repo.create(&input.into_inner()).await?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::TEAM_RULE,
            &rule.id.to_string(),
            "created",
            format!("Team rule '{}' created", rule.name),
            None,
        )
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::success(rule)))
}

pub async fn get_rules(
    _claims: Claims,
    repo: web::Data<TeamRuleRepository>,
) -> Result<HttpResponse, AppError> {
    let rules = repo.list().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rules)))
}

pub async fn get_rule(
    _claims: Claims,
    repo: web::Data<TeamRuleRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let rule = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team rule {} not found", id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rule)))
}

pub async fn update_rule(
    claims: Claims,
    state: web::Data<AppState>,
    repo: web::Data<TeamRuleRepository>,
    path: web::Path<Uuid>,
    input: web::Json<TeamRuleInput>,
) -> Result<HttpResponse, AppError> {
    require_manager(&claims)?;

    let id = path.into_inner();
    let rule = repo
        .update(id, &input.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team rule {} not found", id)))?;

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::TEAM_RULE,
            &rule.id.to_string(),
            "updated",
            format!("Team rule '{}' updated", rule.name),
            None,
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rule)))
}

pub async fn delete_rule(
    claims: Claims,
    state: web::Data<AppState>,
    repo: web::Data<TeamRuleRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_manager(&claims)?;

    let id = path.into_inner();
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("Team rule {} not found", id)));
    }

    state
        .activity_logger
        .log_activity(
            Some(claims.sub),
            entity_type::TEAM_RULE,
            &id.to_string(),
            "deleted",
            format!("Team rule {} deleted", id),
            None,
        )
        .await;

    Ok(HttpResponse::NoContent().finish())
}
