//! Sample domain values shared by unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    EmailAddress, IngredientId, PersonName, Recipe, RecipeCard, RecipeId, RecipeIngredient,
    SubscribedAuthor, Tag, TagId, User, UserId, UserProfile, Username,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn sample_user(id: i64, username: &str) -> User {
    User {
        id: UserId::new(id),
        email: EmailAddress::new(format!("{username}@example.com")).expect("fixture email"),
        username: Username::new(username).expect("fixture username"),
        first_name: PersonName::new("first_name", "Sample").expect("fixture first name"),
        last_name: PersonName::new("last_name", "Cook").expect("fixture last name"),
        avatar: None,
    }
}

pub(crate) fn sample_profile(id: i64, username: &str) -> UserProfile {
    UserProfile {
        user: sample_user(id, username),
        is_subscribed: false,
    }
}

pub(crate) fn sample_recipe(id: i64, author: i64) -> Recipe {
    Recipe {
        id: RecipeId::new(id),
        author: sample_profile(author, "author"),
        name: "Shakshuka".into(),
        image: "http://localhost/media/recipes/images/sample.png".into(),
        text: "Simmer tomatoes, crack eggs, cover.".into(),
        cooking_time: 25,
        pub_date: fixture_timestamp(),
        short_link: base62::encode(u64::try_from(id).expect("positive fixture id")),
        tags: vec![Tag {
            id: TagId::new(1),
            name: "Breakfast".into(),
            slug: "breakfast".into(),
        }],
        ingredients: vec![RecipeIngredient {
            id: IngredientId::new(7),
            name: "eggs".into(),
            measurement_unit: "pcs".into(),
            amount: 3,
        }],
        is_favorited: false,
        is_in_shopping_cart: false,
    }
}

pub(crate) fn sample_card(id: i64) -> RecipeCard {
    RecipeCard::from(&sample_recipe(id, 1))
}

pub(crate) fn sample_subscribed_author(id: i64, username: &str) -> SubscribedAuthor {
    let mut profile = sample_profile(id, username);
    profile.is_subscribed = true;
    SubscribedAuthor {
        profile,
        recipes: vec![sample_card(10), sample_card(11)],
        recipes_count: 2,
    }
}
