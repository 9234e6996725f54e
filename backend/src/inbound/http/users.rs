//! User registration, profiles, passwords and avatars.
//!
//! ```text
//! POST   /api/users/
//! GET    /api/users/?page=2&limit=10
//! GET    /api/users/me/
//! GET    /api/users/{id}/
//! POST   /api/users/set_password/
//! PUT    /api/users/me/avatar/
//! DELETE /api/users/me/avatar/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Password, UserId, UserRegistration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, MaybeUser};
use crate::inbound::http::paging::{QueryParams, into_page};
use crate::inbound::http::schemas::{UserBody, UserPageSchema, UserProfileBody};
use crate::inbound::http::state::HttpState;

/// Sign-up request body.
///
/// Absent fields deserialise as blank so validation reports them per field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "cook")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Avatar upload body carrying a base64 data URI.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct AvatarRequest {
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub avatar: String,
}

/// Stored avatar location.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvatarResponse {
    #[schema(example = "https://foodgram.example/media/users/3f2a.png")]
    pub avatar: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserBody),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        username,
        first_name,
        last_name,
        password,
    } = payload.into_inner();
    let registration =
        UserRegistration::try_from_parts(&email, &username, &first_name, &last_name, &password)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(UserBody::from(user)))
}

/// List user profiles, one page at a time.
#[utoipa::path(
    get,
    path = "/api/users/",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, 1 to 100")
    ),
    responses(
        (status = 200, description = "Users", body = UserPageSchema),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Page out of range", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users/")]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: MaybeUser,
) -> ApiResult<web::Json<Page<UserProfileBody>>> {
    let page = QueryParams::from_request(&req).page_request()?;
    let listing = state.users.list_users(viewer.id(), page).await?;
    into_page(&req, page, listing, UserProfileBody::from).map(web::Json)
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Current user", body = UserProfileBody),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserProfileBody>> {
    let id = user.id();
    let profile = state.users.get_user(Some(id), id).await?;
    Ok(web::Json(profile.into()))
}

/// Profile of any user.
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserProfileBody),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}/")]
pub async fn get_user(
    state: web::Data<HttpState>,
    viewer: MaybeUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserProfileBody>> {
    let profile = state
        .users
        .get_user(viewer.id(), UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(profile.into()))
}

/// Change the caller's password after checking the current one.
#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "setPassword"
)]
#[post("/users/set_password/")]
pub async fn set_password(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let SetPasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    if current_password.is_empty() {
        return Err(Error::invalid_field(
            "current_password",
            "blank",
            "current_password must not be empty",
        ));
    }
    let new_password = Password::new(new_password)
        .map_err(|err| Error::invalid_field("new_password", "invalid", err.to_string()))?;
    state
        .accounts
        .set_password(user.id(), Password::unchecked(current_password), new_password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Upload or replace the caller's avatar.
#[utoipa::path(
    put,
    path = "/api/users/me/avatar/",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Invalid image", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "setAvatar"
)]
#[put("/users/me/avatar/")]
pub async fn set_avatar(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<AvatarResponse>> {
    let avatar = payload.into_inner().avatar;
    if avatar.trim().is_empty() {
        return Err(Error::invalid_field("avatar", "required", "avatar is required"));
    }
    let url = state.accounts.set_avatar(user.id(), avatar).await?;
    Ok(web::Json(AvatarResponse { avatar: url }))
}

/// Remove the caller's avatar.
#[utoipa::path(
    delete,
    path = "/api/users/me/avatar/",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "removeAvatar"
)]
#[delete("/users/me/avatar/")]
pub async fn remove_avatar(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    state.accounts.remove_avatar(user.id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
