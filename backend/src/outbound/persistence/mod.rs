//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each `Diesel*Repository` implements one driven port from
//! [`crate::domain::ports`] on top of a shared [`DbPool`]. Row structs
//! (`models.rs`) and the table definitions (`schema.rs`) stay private to this
//! module; adapters convert rows into domain types before returning, and map
//! database failures into the port's error enum.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! let recipes = DieselRecipeRepository::new(pool.clone());
//! ```

mod diesel_auth_token_repository;
mod diesel_basic_error_mapping;
mod diesel_catalogue_repository;
mod diesel_read_models;
mod diesel_recipe_relation_repository;
mod diesel_recipe_repository;
mod diesel_subscription_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_recipe_relation_repository::DieselRecipeRelationRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
