//! Test helpers for inbound HTTP components.
//!
//! [`MockPorts`] starts every port as a fresh mockall mock, so any call a test
//! did not expect fails loudly. Tests configure only the ports they exercise
//! and then build an app with [`test_app`].

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use url::Url;

use crate::domain::ports::{
    MockCatalogueQuery, MockLoginService, MockRecipeCommand, MockRecipeQuery,
    MockRecipeRelationCommand, MockShoppingListQuery, MockSubscriptionCommand,
    MockSubscriptionQuery, MockUserAccountCommand, MockUsersQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts, PublicUrls};

/// Token accepted by [`MockPorts::with_token`].
pub const VALID_TOKEN: &str = "0123456789abcdef0123456789abcdef01234567";

/// `Authorization` header value carrying [`VALID_TOKEN`].
pub fn auth_header() -> (&'static str, String) {
    ("Authorization", format!("Token {VALID_TOKEN}"))
}

/// Mutable bundle of port mocks.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub users: MockUsersQuery,
    pub accounts: MockUserAccountCommand,
    pub catalogue: MockCatalogueQuery,
    pub recipes: MockRecipeCommand,
    pub recipes_query: MockRecipeQuery,
    pub relations: MockRecipeRelationCommand,
    pub shopping_list: MockShoppingListQuery,
    pub subscriptions: MockSubscriptionCommand,
    pub subscriptions_query: MockSubscriptionQuery,
}

impl MockPorts {
    /// Resolve [`VALID_TOKEN`] to `user`; any other token is rejected.
    pub fn with_token(mut self, user: UserId) -> Self {
        self.login.expect_authenticate().returning(move |token| {
            if token.expose() == VALID_TOKEN {
                Ok(user)
            } else {
                Err(Error::unauthorized("invalid token"))
            }
        });
        self
    }

    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                users: Arc::new(self.users),
                accounts: Arc::new(self.accounts),
                catalogue: Arc::new(self.catalogue),
                recipes: Arc::new(self.recipes),
                recipes_query: Arc::new(self.recipes_query),
                relations: Arc::new(self.relations),
                shopping_list: Arc::new(self.shopping_list),
                subscriptions: Arc::new(self.subscriptions),
                subscriptions_query: Arc::new(self.subscriptions_query),
            },
            test_urls(),
        )
    }
}

/// Link bases used by handler tests.
pub fn test_urls() -> PublicUrls {
    PublicUrls::new(
        Url::parse("https://foodgram.test").expect("public url"),
        Url::parse("https://app.foodgram.test").expect("site url"),
    )
}

/// Build an app serving every API route over the given mocks.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .configure(configure_api)
}
