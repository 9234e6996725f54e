//! Wiring of Diesel repositories, adapters and domain services into HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::{
    CatalogueService, RecipeRelationService, RecipeService, SubscriptionService,
    TokenLoginService, UserAccountService, UsersQueryService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::media::FilesystemMediaStore;
use backend::outbound::persistence::{
    DieselAuthTokenRepository, DieselCatalogueRepository, DieselRecipeRelationRepository,
    DieselRecipeRepository, DieselSubscriptionRepository, DieselUserRepository,
};
use backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the handler state from the resolved configuration.
///
/// # Errors
/// Returns [`io::Error`] when the media root cannot be opened.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let pool = &config.db_pool;
    let media_store = Arc::new(
        FilesystemMediaStore::open(&config.media_root, config.media_url.clone())
            .map_err(io::Error::other)?,
    );
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let token_repo = Arc::new(DieselAuthTokenRepository::new(pool.clone()));
    let catalogue_repo = Arc::new(DieselCatalogueRepository::new(pool.clone()));
    let recipe_repo = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let relation_repo = Arc::new(DieselRecipeRelationRepository::new(pool.clone()));
    let subscription_repo = Arc::new(DieselSubscriptionRepository::new(pool.clone()));

    let recipes = Arc::new(RecipeService::new(
        recipe_repo.clone(),
        media_store.clone(),
        clock,
    ));
    let relations = Arc::new(RecipeRelationService::new(relation_repo, recipe_repo));
    let subscriptions = Arc::new(SubscriptionService::new(
        subscription_repo,
        user_repo.clone(),
    ));

    let ports = HttpStatePorts {
        login: Arc::new(TokenLoginService::new(
            user_repo.clone(),
            token_repo,
            hasher.clone(),
        )),
        users: Arc::new(UsersQueryService::new(user_repo.clone())),
        accounts: Arc::new(UserAccountService::new(user_repo, hasher, media_store)),
        catalogue: Arc::new(CatalogueService::new(catalogue_repo)),
        recipes: recipes.clone(),
        recipes_query: recipes,
        relations: relations.clone(),
        shopping_list: relations,
        subscriptions: subscriptions.clone(),
        subscriptions_query: subscriptions,
    };

    Ok(web::Data::new(HttpState::new(ports, config.urls.clone())))
}
