//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Public URL of the avatar image.
        avatar -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One API token digest per user.
    auth_tokens (user_id) {
        user_id -> Int8,
        /// Hex SHA-256 digest of the issued token.
        digest -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        image -> Text,
        text -> Text,
        cooking_time -> Int4,
        pub_date -> Timestamptz,
        short_link -> Nullable<Varchar>,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int4,
    }
}

diesel::table! {
    favorites (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    shopping_carts (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Follower (`user_id`) to author relation.
    subscriptions (user_id, author_id) {
        user_id -> Int8,
        author_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_carts -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
    favorites,
    shopping_carts,
    subscriptions,
);
