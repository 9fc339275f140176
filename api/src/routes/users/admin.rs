//! Staff/admin account management handlers
//!
//! Authorization is expressed through the core policy primitives:
//! listings need the `member:view` permission, maintenance needs
//! manager-level rank, deletion is admin-only, and single-user reads are
//! owner-or-elevated.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use sgms_core::domain::entities::user::UserRole;
use sgms_core::errors::AuthError;
use sgms_core::repositories::{OtpRepository, UserFilter, UserRepository};
use sgms_core::services::auth::policy;
use sgms_shared::types::pagination::{PageQuery, PaginatedResponse};
use sgms_shared::types::ApiResponse;

use crate::dto::user::{AdminUpdateUserRequest, ListUsersQuery, UserResponse};
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/users
pub async fn list_users<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    policy::require_permission(context.role, &["member:view"])?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .normalized();
    let filter = UserFilter {
        role: query.role,
        status: query.status,
        search: query.search.clone(),
    };

    let (users, total) = state
        .user_service
        .list_users(&filter, page.offset(), page.limit)
        .await?;

    let items: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Users retrieved",
        PaginatedResponse::new(items, page, total),
    )))
}

/// Handler for GET /api/v1/users/{id}
///
/// A user may read their own record; staff from manager up may read any.
pub async fn get_user<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    let user_id = path.into_inner();
    policy::require_owner_or_admin(context.user_id, context.role, user_id)?;

    let user = state.user_service.get_profile(user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "User retrieved",
        UserResponse::from(&user),
    )))
}

/// Handler for PATCH /api/v1/users/{id}
///
/// Role and status maintenance. Granting manager rank or above is
/// reserved for admins.
pub async fn admin_update_user<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
    path: web::Path<Uuid>,
    request: web::Json<AdminUpdateUserRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    policy::require_min_role(context.role, UserRole::Manager)?;

    let request = request.into_inner();
    if let Some(new_role) = request.role {
        if new_role.level() >= UserRole::Manager.level() && context.role != UserRole::Admin {
            return Err(AuthError::InsufficientRole {
                required: UserRole::Admin.as_str().to_string(),
            }
            .into());
        }
    }

    let user = state
        .user_service
        .admin_update(path.into_inner(), request.role, request.status)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "User updated",
        UserResponse::from(&user),
    )))
}

/// Handler for DELETE /api/v1/users/{id}
pub async fn delete_user<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    policy::require_role(context.role, &[UserRole::Admin])?;

    state.user_service.delete_account(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted")))
}
