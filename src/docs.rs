use crate::api::document::UploadParams;
use crate::api::profile::{ProfileResponse, UpdateEmployeeId};
use crate::api::request::{
    CreateRequest, RejectRequest, RequestFilter, RequestListResponse, RequestResponse,
};
use crate::model::department::Department;
use crate::model::request::{LeaveRequest, LeaveType, RequestStatus, RequestType};
use crate::models::{LoginReqDto, RegisterReq};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave & Permission Management API",
        version = "1.0.0",
        description = r#"
## Leave & Permission Management Service

Staff submit leave or short-permission requests; directors approve or reject
them.

### Key Features
- **Requests**
  - Submit a leave (single or multi-day, fixed catalogue of types) or a
    permission (same-day, at most 60 minutes)
  - Staff list their own requests, directors list everyone's, newest first
  - Approve, or reject with a mandatory remark; decisions are final
- **Profile**
  - View profile; employee id is persisted lazily on first submission
- **Documents**
  - Optional supporting document upload referenced by the request

### Security
Endpoints are protected using **JWT Bearer authentication** with refresh
token rotation. Only **Director** accounts may approve or reject.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::request::request_list,
        crate::api::request::get_request,
        crate::api::request::create_request,
        crate::api::request::approve_request,
        crate::api::request::reject_request,

        crate::api::profile::get_profile,
        crate::api::profile::update_employee_id,

        crate::api::document::upload_document,
        crate::api::document::download_document
    ),
    components(
        schemas(
            CreateRequest,
            RequestFilter,
            RequestResponse,
            RequestListResponse,
            RejectRequest,
            LeaveRequest,
            RequestType,
            LeaveType,
            RequestStatus,
            Department,
            ProfileResponse,
            UpdateEmployeeId,
            UploadParams,
            RegisterReq,
            LoginReqDto
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Requests", description = "Leave/permission request APIs"),
        (name = "Profile", description = "Account profile APIs"),
        (name = "Documents", description = "Supporting document APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
