//! Short link redirects.
//!
//! ```text
//! GET /s/{slug}/  ->  302 Location: <site_url>/recipes/{id}/
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Redirect a short link to the recipe page on the frontend.
#[utoipa::path(
    get,
    path = "/s/{slug}/",
    params(("slug" = String, Path, description = "Short link slug")),
    responses(
        (status = 302, description = "Redirect to the recipe page", headers(("Location" = String, description = "Recipe page URL"))),
        (status = 404, description = "Unknown short link", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "followShortLink",
    security([])
)]
#[get("/s/{slug}/")]
pub async fn follow_short_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = state
        .recipes_query
        .resolve_short_link(path.into_inner())
        .await?;
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, state.urls.recipe_page_url(id)))
        .finish())
}
