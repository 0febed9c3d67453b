use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "jane@company.com", format = "email")]
    pub email: String,
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// 1 = Staff, 2 = Director
    #[schema(example = 1)]
    pub role_id: u8,
    #[schema(example = "IT")]
    pub department: String,
    #[schema(example = "EMP-1024")]
    pub employee_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane@company.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Account email.
    pub sub: String,
    pub name: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
