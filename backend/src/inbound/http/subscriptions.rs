//! Author subscriptions.
//!
//! ```text
//! GET    /api/users/subscriptions/?recipes_limit=3
//! POST   /api/users/{id}/subscribe/
//! DELETE /api/users/{id}/subscribe/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::Page;

use crate::domain::{Error, RecipesLimit, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::paging::{QueryParams, into_page};
use crate::inbound::http::schemas::{SubscriptionBody, SubscriptionPageSchema};
use crate::inbound::http::state::HttpState;

const RECIPES_LIMIT_PARAM: &str = "recipes_limit";

/// Authors the caller follows, each with a preview of their recipes.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, 1 to 100"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes shown per author")
    ),
    responses(
        (status = 200, description = "Subscriptions", body = SubscriptionPageSchema),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Page out of range", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions/")]
pub async fn list_subscriptions(
    req: HttpRequest,
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Page<SubscriptionBody>>> {
    let params = QueryParams::from_request(&req);
    let page = params.page_request()?;
    let recipes_limit = RecipesLimit::parse(params.get(RECIPES_LIMIT_PARAM));
    let listing = state
        .subscriptions_query
        .list_subscriptions(user.id(), page, recipes_limit)
        .await?;
    into_page(&req, page, listing, SubscriptionBody::from).map(web::Json)
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    params(
        ("id" = i64, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes shown in the response")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionBody),
        (status = 400, description = "Already subscribed or self-subscription", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe/")]
pub async fn subscribe(
    req: HttpRequest,
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let recipes_limit =
        RecipesLimit::parse(QueryParams::from_request(&req).get(RECIPES_LIMIT_PARAM));
    let author = state
        .subscriptions
        .subscribe(user.id(), UserId::new(path.into_inner()), recipes_limit)
        .await?;
    Ok(HttpResponse::Created().json(SubscriptionBody::from(author)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe/")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .subscriptions
        .unsubscribe(user.id(), UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::domain::ports::Listing;
    use crate::inbound::http::test_utils::{MockPorts, auth_header, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("/api/users/subscriptions/", None)]
    #[case("/api/users/subscriptions/?recipes_limit=1", Some(1))]
    #[case("/api/users/subscriptions/?recipes_limit=-1", None)]
    #[actix_web::test]
    async fn list_forwards_recipes_limit(#[case] uri: &str, #[case] expected: Option<u32>) {
        let mut ports = MockPorts::default().with_token(UserId::new(1));
        ports
            .subscriptions_query
            .expect_list_subscriptions()
            .withf(move |follower, _, limit| *follower == UserId::new(1) && limit.get() == expected)
            .times(1)
            .return_once(|_, _, _| {
                Ok(Listing::new(
                    vec![fixtures::sample_subscribed_author(5, "baker")],
                    1,
                ))
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(auth_header())
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], json!(1));
        assert_eq!(body["results"][0]["username"], json!("baker"));
        assert_eq!(body["results"][0]["recipes_count"], json!(2));
    }

    #[actix_web::test]
    async fn list_is_not_routed_as_a_user_id() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/users/subscriptions/")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn subscribe_returns_created_view() {
        let mut ports = MockPorts::default().with_token(UserId::new(1));
        ports
            .subscriptions
            .expect_subscribe()
            .withf(|follower, author, limit| {
                *follower == UserId::new(1) && *author == UserId::new(5) && limit.get() == Some(1)
            })
            .times(1)
            .return_once(|_, _, _| Ok(fixtures::sample_subscribed_author(5, "baker")));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/users/5/subscribe/?recipes_limit=1")
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["is_subscribed"], json!(true));
    }

    #[actix_web::test]
    async fn self_subscription_is_a_bad_request() {
        let mut ports = MockPorts::default().with_token(UserId::new(1));
        ports
            .subscriptions
            .expect_subscribe()
            .return_once(|_, _, _| Err(Error::invalid_request("cannot subscribe to yourself")));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/users/1/subscribe/")
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unsubscribe_returns_no_content() {
        let mut ports = MockPorts::default().with_token(UserId::new(1));
        ports
            .subscriptions
            .expect_unsubscribe()
            .with(eq(UserId::new(1)), eq(UserId::new(5)))
            .times(1)
            .return_once(|_, _| Ok(()));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::delete()
            .uri("/api/users/5/subscribe/")
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
