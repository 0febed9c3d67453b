use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct ProfileResponse {
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@company.com")]
    pub email: String,
    /// 1 = Staff, 2 = Director
    #[schema(example = 1)]
    pub role_id: u8,
    #[schema(example = "IT")]
    pub department: String,
    #[schema(example = "EMP-1024")]
    pub employee_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployeeId {
    #[schema(example = "EMP-1024")]
    pub employee_id: String,
}

/// Current account's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile of the authenticated account", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, ProfileResponse>(
        r#"
        SELECT id, name, email, role_id, department, employee_id
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    match profile {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(ApiError::NotFound("profile").into()),
    }
}

/// Set or update the employee id on the profile
#[utoipa::path(
    put,
    path = "/api/profile/employee-id",
    request_body = UpdateEmployeeId,
    responses(
        (status = 200, description = "Employee id updated", body = Object, example = json!({
            "message": "Employee ID updated"
        })),
        (status = 400, description = "Empty employee id"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_employee_id(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateEmployeeId>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id.trim();

    if employee_id.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Employee ID must not be empty"
        })));
    }

    sqlx::query("UPDATE users SET employee_id = ? WHERE id = ?")
        .bind(employee_id)
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Employee ID updated"
    })))
}
