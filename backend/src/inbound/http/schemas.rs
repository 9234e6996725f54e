//! Response bodies shared by several endpoints.
//!
//! Domain types stay free of serialisation concerns; these DTOs mirror them
//! with the snake_case JSON shape clients expect and carry the `ToSchema`
//! derives used by the OpenAPI document.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Ingredient, Recipe, RecipeCard, RecipeIngredient, SubscribedAuthor, Tag, User, UserProfile,
};

/// Tag as exposed by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagBody {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagBody {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// Ingredient as exposed by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientBody {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientBody {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Account fields returned right after registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBody {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "cook")]
    pub username: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            email: user.email.into(),
            id: user.id.get(),
            username: user.username.into(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
        }
    }
}

/// User profile as seen by the requesting user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfileBody {
    #[serde(flatten)]
    pub user: UserBody,
    /// Whether the viewer subscribes to this user; false when anonymous.
    pub is_subscribed: bool,
    #[schema(example = "https://foodgram.example/media/users/3f2a.png")]
    pub avatar: Option<String>,
}

impl From<UserProfile> for UserProfileBody {
    fn from(profile: UserProfile) -> Self {
        let avatar = profile.user.avatar.clone();
        Self {
            user: UserBody::from(profile.user),
            is_subscribed: profile.is_subscribed,
            avatar,
        }
    }
}

/// Short recipe representation used by relation toggles and subscriptions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeCardBody {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Pancakes")]
    pub name: String,
    #[schema(example = "https://foodgram.example/media/recipes/images/9c1e.jpg")]
    pub image: String,
    #[schema(example = 20)]
    pub cooking_time: i32,
}

impl From<RecipeCard> for RecipeCardBody {
    fn from(card: RecipeCard) -> Self {
        Self {
            id: card.id.get(),
            name: card.name,
            image: card.image,
            cooking_time: card.cooking_time,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientBody {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    #[schema(example = 200)]
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientBody {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.id.get(),
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeBody {
    pub id: i64,
    pub tags: Vec<TagBody>,
    pub author: UserProfileBody,
    pub ingredients: Vec<RecipeIngredientBody>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeBody {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.get(),
            tags: recipe.tags.into_iter().map(TagBody::from).collect(),
            author: UserProfileBody::from(recipe.author),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientBody::from)
                .collect(),
            is_favorited: recipe.is_favorited,
            is_in_shopping_cart: recipe.is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Followed author with a preview of their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionBody {
    #[serde(flatten)]
    pub profile: UserProfileBody,
    pub recipes: Vec<RecipeCardBody>,
    pub recipes_count: u64,
}

impl From<SubscribedAuthor> for SubscriptionBody {
    fn from(author: SubscribedAuthor) -> Self {
        Self {
            profile: UserProfileBody::from(author.profile),
            recipes: author
                .recipes
                .into_iter()
                .map(RecipeCardBody::from)
                .collect(),
            recipes_count: author.recipes_count,
        }
    }
}

macro_rules! page_schema {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(ToSchema)]
        #[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
        pub struct $name {
            #[schema(example = 123)]
            count: u64,
            #[schema(example = "http://foodgram.example/api/recipes/?page=4")]
            next: Option<String>,
            #[schema(example = "http://foodgram.example/api/recipes/?page=2")]
            previous: Option<String>,
            results: Vec<$item>,
        }
    };
}

page_schema! {
    /// Page of user profiles.
    UserPageSchema, UserProfileBody
}

page_schema! {
    /// Page of recipes.
    RecipePageSchema, RecipeBody
}

page_schema! {
    /// Page of subscriptions.
    SubscriptionPageSchema, SubscriptionBody
}
