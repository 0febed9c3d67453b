use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::request::{
    normalized_to_date, LeaveRequest, LeaveType, RequestStatus, RequestType,
};
use crate::model::role::Role;
use crate::utils::duration;
use crate::utils::name_cache;
use crate::utils::validation::{validate_remark, validate_submission, SubmissionForm, ValidationError};
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateRequest {
    #[schema(example = "EMP-1024")]
    pub emp_id: String,
    #[schema(example = "IT")]
    pub department: String,
    #[schema(example = "Leave")]
    pub request_type: RequestType,
    /// Required for Leave; one of the fixed catalogue.
    #[schema(example = "Sick")]
    pub leave_type: Option<LeaveType>,
    /// Required for Permission; free-text label.
    #[schema(example = "Bank errand")]
    pub permission_type: Option<String>,
    /// Leave only: whether the request spans more than one day.
    #[serde(default)]
    pub multi_day: bool,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub from_date: Option<NaiveDate>,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub to_date: Option<NaiveDate>,
    /// Permission only, HH:MM 24-hour.
    #[schema(example = "09:00")]
    pub from_time: Option<String>,
    #[schema(example = "09:45")]
    pub to_time: Option<String>,
    pub reason: String,
    /// URL returned by the document upload, if the submitter attached one.
    pub file_url: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RequestFilter {
    #[schema(example = "Pending")]
    /// Filter by request status
    pub status: Option<String>,
    #[schema(example = "Leave")]
    /// Filter by request type
    pub request_type: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Listing entry: the persisted row enriched with the submitter's display
/// name and a rendered duration label.
#[derive(Serialize, ToSchema)]
pub struct RequestResponse {
    #[serde(flatten)]
    pub request: LeaveRequest,
    #[schema(example = "Jane Doe")]
    pub user_name: String,
    #[schema(example = "3 days")]
    pub duration: String,
}

#[derive(Serialize, ToSchema)]
pub struct RequestListResponse {
    pub data: Vec<RequestResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectRequest {
    #[schema(example = "Quota exhausted for this quarter")]
    pub remark: Option<String>,
}

fn missing(field: &'static str) -> ApiError {
    ApiError::Validation(ValidationError {
        field,
        message: format!("{field} is required"),
    })
}

/// Move a pending request into a terminal state. The `status = 'Pending'`
/// condition makes the store enforce the same machine
/// `RequestStatus::can_transition_to` describes: a request already decided
/// is never transitioned again, whichever director got there first wins.
/// Returns whether a row was actually transitioned.
async fn transition(
    pool: &MySqlPool,
    request_id: u64,
    new_status: RequestStatus,
    remark: Option<&str>,
) -> Result<bool, ApiError> {
    if !RequestStatus::Pending.can_transition_to(new_status) {
        return Err(ApiError::Validation(ValidationError {
            field: "status",
            message: format!("Cannot transition to {new_status}"),
        }));
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, remark = COALESCE(?, remark)
        WHERE id = ?
        AND status = ?
        "#,
    )
    .bind(new_status.to_string())
    .bind(remark)
    .bind(request_id)
    .bind(RequestStatus::Pending.to_string())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, status = %new_status, "Transition failed");
        ApiError::Persistence
    })?;

    Ok(result.rows_affected() > 0)
}

async fn enrich(pool: &MySqlPool, request: LeaveRequest) -> RequestResponse {
    let user_name = name_cache::resolve(pool, request.user_id).await;
    let duration = duration::describe(
        request.request_type == RequestType::Permission.to_string(),
        request.from_date,
        Some(request.to_date),
        request.from_time.as_deref(),
        request.to_time.as_deref(),
    );

    RequestResponse {
        request,
        user_name,
        duration,
    }
}

/* =========================
Submit request (Staff)
========================= */
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body(
        content = CreateRequest,
        description = "Leave or permission request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Request submitted successfully",
         body = Object,
         example = json!({
            "id": 42,
            "message": "Request submitted",
            "status": "Pending"
         })
        ),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn create_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRequest>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let form = SubmissionForm {
        emp_id: payload.emp_id.clone(),
        department: payload.department.clone(),
        request_type: Some(payload.request_type),
        leave_type: payload.leave_type,
        permission_type: payload.permission_type.clone().unwrap_or_default(),
        multi_day: payload.multi_day,
        from_date: payload.from_date,
        to_date: payload.to_date,
        from_time: payload.from_time.clone(),
        to_time: payload.to_time.clone(),
        reason: payload.reason.clone(),
    };

    validate_submission(auth.role, &form).map_err(ApiError::from)?;

    // Everything below holds after validation; re-extract without unwraps.
    let from_date = payload.from_date.ok_or_else(|| missing("from_date"))?;
    let leave_type_label = match payload.request_type {
        RequestType::Leave => payload
            .leave_type
            .ok_or_else(|| missing("leave_type"))?
            .to_string(),
        RequestType::Permission => form.permission_type.trim().to_string(),
    };

    let to_date = normalized_to_date(
        payload.request_type,
        payload.multi_day,
        from_date,
        payload.to_date,
    );

    let (from_time, to_time) = match payload.request_type {
        RequestType::Permission => (payload.from_time.as_deref(), payload.to_time.as_deref()),
        RequestType::Leave => (None, None),
    };

    // First submission fills in a profile without an employee id. Best
    // effort; the submission itself must not fail on this.
    if let Err(e) = sqlx::query(
        r#"
        UPDATE users
        SET employee_id = ?
        WHERE id = ? AND (employee_id IS NULL OR employee_id = '')
        "#,
    )
    .bind(payload.emp_id.trim())
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to persist employee id");
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (user_id, emp_id, department, request_type, leave_type,
             from_date, to_date, from_time, to_time, reason, file_url, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.emp_id.trim())
    .bind(payload.department.trim())
    .bind(payload.request_type.to_string())
    .bind(&leave_type_label)
    .bind(from_date)
    .bind(to_date)
    .bind(from_time)
    .bind(to_time)
    .bind(payload.reason.trim())
    .bind(payload.file_url.as_deref())
    .bind(RequestStatus::Pending.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to create request");
        ApiError::Persistence
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": result.last_insert_id(),
        "message": "Request submitted",
        "status": RequestStatus::Pending.to_string()
    })))
}

/* =========================
List requests (Staff: own, Director: all)
========================= */
#[utoipa::path(
    get,
    path = "/api/requests",
    params(RequestFilter),
    responses(
        (status = 200, description = "Paginated request list, newest first", body = RequestListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn request_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RequestFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    // Staff only ever see their own requests; directors see everyone's.
    if auth.is_staff() {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::U64(auth.user_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(request_type) = query.request_type.as_deref() {
        where_sql.push_str(" AND request_type = ?");
        args.push(FilterValue::Str(request_type));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, user_id, emp_id, department, request_type, leave_type,
               from_date, to_date, from_time, to_time, reason, file_url,
               status, remark, created_at
        FROM leave_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(ApiError::from)?;

    // -------------------------
    // Enrichment (name + duration); a missing profile degrades to a
    // placeholder instead of failing the listing
    // -------------------------
    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        data.push(enrich(pool.get_ref(), row).await);
    }

    let response = RequestListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Request details
========================= */
#[utoipa::path(
    get,
    path = "/api/requests/{request_id}",
    params(
        ("request_id" = u64, Path, description = "ID of the request to fetch")
    ),
    responses(
        (status = 200, description = "Request found", body = RequestResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn get_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let row = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, user_id, emp_id, department, request_type, leave_type,
               from_date, to_date, from_time, to_time, reason, file_url,
               status, remark, created_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    match row {
        // Staff may only see their own; a foreign id reads as absent.
        Some(row) if auth.role == Role::Director || row.user_id == auth.user_id => {
            Ok(HttpResponse::Ok().json(enrich(pool.get_ref(), row).await))
        }
        _ => Err(ApiError::NotFound("request").into()),
    }
}

/* =========================
Approve request (Director)
========================= */
#[utoipa::path(
    put,
    path = "/api/requests/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the request to approve")
    ),
    responses(
        (status = 200, description = "Request approved", body = Object, example = json!({
            "message": "Request approved"
        })),
        (status = 400, description = "Request not found or already processed", body = Object, example = json!({
            "message": "Request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn approve_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_director()?;

    let request_id = path.into_inner();

    if !transition(pool.get_ref(), request_id, RequestStatus::Approved, None).await? {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request approved"
    })))
}

/* =========================
Reject request (Director)
========================= */
#[utoipa::path(
    put,
    path = "/api/requests/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the request to reject")
    ),
    request_body(
        content = RejectRequest,
        description = "Rejection remark (required, non-empty)",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Request rejected", body = Object, example = json!({
            "message": "Request rejected"
        })),
        (status = 400, description = "Missing remark, or request not found / already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn reject_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<RejectRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_director()?;

    let request_id = path.into_inner();

    // Remark is checked before the store is touched.
    validate_remark(payload.remark.as_deref()).map_err(ApiError::from)?;
    let remark = payload.remark.as_deref().unwrap_or_default().trim();

    if !transition(
        pool.get_ref(),
        request_id,
        RequestStatus::Rejected,
        Some(remark),
    )
    .await?
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request rejected"
    })))
}
