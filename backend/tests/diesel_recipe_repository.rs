//! Integration tests for the Diesel catalogue and recipe repositories against
//! embedded PostgreSQL.

use backend::domain::ports::{
    CatalogueRepository, RecipeRelationRepository, RecipeRepository, RecipeRepositoryError,
};
use backend::domain::{
    IngredientAmount, IngredientId, IngredientSeed, NewRecipe, RecipeContent, RecipeId,
    RecipeListFilter, RecipeRelation, RecipeUpdate, ShortLink, TagId, TagSlug, UserId,
};
use backend::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselRecipeRelationRepository, DieselRecipeRepository,
    PoolConfig,
};
use chrono::{Duration, TimeZone, Utc};
use pagination::PageRequest;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::embedded_postgres::{seed_ingredient, seed_tag, seed_user};
use support::pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, migrate_schema, reset_database};

const TEST_DB: &str = "diesel_recipe_repository_test";

struct Seeded {
    author: UserId,
    reader: UserId,
    breakfast: TagId,
    dinner: TagId,
    eggs: IngredientId,
    flour: IngredientId,
}

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    catalogue: DieselCatalogueRepository,
    recipes: DieselRecipeRepository,
    relations: DieselRecipeRelationRepository,
    seeded: Seeded,
}

fn seed(url: &str) -> Result<Seeded, String> {
    Ok(Seeded {
        author: UserId::new(seed_user(url, "author")?),
        reader: UserId::new(seed_user(url, "reader")?),
        breakfast: TagId::new(seed_tag(url, "Breakfast", "breakfast")?),
        dinner: TagId::new(seed_tag(url, "Dinner", "dinner")?),
        eggs: IngredientId::new(seed_ingredient(url, "eggs", "pcs")?),
        flour: IngredientId::new(seed_ingredient(url, "flour", "g")?),
    })
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;
    let seeded = seed(&database_url)?;

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        catalogue: DieselCatalogueRepository::new(pool.clone()),
        recipes: DieselRecipeRepository::new(pool.clone()),
        relations: DieselRecipeRelationRepository::new(pool),
        seeded,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn content(name: &str, tags: Vec<TagId>, ingredients: &[(IngredientId, i32)]) -> RecipeContent {
    RecipeContent {
        name: name.to_owned(),
        text: "Mix and cook.".to_owned(),
        cooking_time: 15,
        tag_ids: tags,
        ingredients: ingredients
            .iter()
            .map(|&(ingredient_id, amount)| IngredientAmount {
                ingredient_id,
                amount,
            })
            .collect(),
    }
}

fn new_recipe(author: UserId, content: RecipeContent, minutes: i64) -> NewRecipe {
    NewRecipe {
        author,
        content,
        image: "http://media.test/recipes/a.png".to_owned(),
        pub_date: Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(minutes),
    }
}

fn page(limit: u32) -> PageRequest {
    PageRequest::new(None, Some(limit)).expect("page request")
}

#[rstest]
fn catalogue_lists_and_seeds_ingredients(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: catalogue_lists_and_seeds_ingredients skipped");
        return;
    };
    let catalogue = &context.catalogue;

    context.runtime.block_on(async {
        let tags = catalogue.list_tags().await.expect("tags");
        let slugs: Vec<&str> = tags.iter().map(|tag| tag.slug.as_str()).collect();
        assert_eq!(slugs, ["breakfast", "dinner"]);

        let seeds = [
            IngredientSeed::new("flour", "g").expect("seed"),
            IngredientSeed::new("Fennel", "g").expect("seed"),
            IngredientSeed::new("salt", "g").expect("seed"),
        ];
        let inserted = catalogue.insert_ingredients(&seeds).await.expect("insert");
        assert_eq!(inserted, 2, "existing flour/g pair is skipped");

        let matching = catalogue
            .list_ingredients(Some("f".to_owned()))
            .await
            .expect("name search");
        let names: Vec<&str> = matching.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Fennel", "flour"]);

        let inner = catalogue
            .list_ingredients(Some("LOU".to_owned()))
            .await
            .expect("substring search");
        let names: Vec<&str> = inner.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["flour"], "match may start mid-name, ignoring case");

        let literal = catalogue
            .list_ingredients(Some("%".to_owned()))
            .await
            .expect("wildcard is literal");
        assert!(literal.is_empty());

        let eggs = catalogue
            .find_ingredient(context.seeded.eggs)
            .await
            .expect("lookup")
            .expect("eggs exist");
        assert_eq!(eggs.measurement_unit, "pcs");
        assert!(
            catalogue
                .find_tag(TagId::new(9_999))
                .await
                .expect("lookup")
                .is_none()
        );
    });
}

#[rstest]
fn created_recipe_is_hydrated_with_short_link(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: created_recipe_is_hydrated_with_short_link skipped");
        return;
    };
    let seeded = &context.seeded;
    let recipes = &context.recipes;

    context.runtime.block_on(async {
        let id = recipes
            .create(&new_recipe(
                seeded.author,
                content(
                    "Pancakes",
                    vec![seeded.dinner, seeded.breakfast],
                    &[(seeded.flour, 250), (seeded.eggs, 2)],
                ),
                0,
            ))
            .await
            .expect("create");

        let recipe = recipes
            .find(id, Some(seeded.reader))
            .await
            .expect("lookup")
            .expect("recipe exists");
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.author.user.id, seeded.author);
        let tag_names: Vec<&str> = recipe.tags.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(tag_names, ["Breakfast", "Dinner"]);
        let amounts: Vec<(&str, i32)> = recipe
            .ingredients
            .iter()
            .map(|item| (item.name.as_str(), item.amount))
            .collect();
        assert_eq!(amounts, [("eggs", 2), ("flour", 250)]);
        assert!(!recipe.is_favorited);

        let link = recipes
            .find_short_link(id)
            .await
            .expect("lookup")
            .expect("link assigned");
        assert_eq!(link, ShortLink::for_recipe(id).expect("encodable id"));
        assert_eq!(recipe.short_link, link.as_ref());
        assert_eq!(
            recipes.resolve_short_link(&link).await.expect("resolve"),
            Some(id)
        );

        let ownership = recipes
            .find_ownership(id)
            .await
            .expect("lookup")
            .expect("ownership");
        assert_eq!(ownership.author, seeded.author);
    });
}

#[rstest]
fn short_links_resolve_only_by_stored_slug(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: short_links_resolve_only_by_stored_slug skipped");
        return;
    };
    let seeded = &context.seeded;
    let recipes = &context.recipes;

    context.runtime.block_on(async {
        let id = recipes
            .create(&new_recipe(
                seeded.author,
                content("Toast", vec![seeded.breakfast], &[(seeded.flour, 50)]),
                0,
            ))
            .await
            .expect("create");
        let link = recipes
            .find_short_link(id)
            .await
            .expect("lookup")
            .expect("link assigned");

        assert_eq!(
            recipes.resolve_short_link(&link).await.expect("resolve"),
            Some(id)
        );
        for alias in [format!("0{link}"), format!("000{link}")] {
            let alias = ShortLink::parse(alias).expect("well formed");
            assert_eq!(alias.decode(), Ok(id), "alias decodes to the same id");
            assert_eq!(
                recipes.resolve_short_link(&alias).await.expect("resolve"),
                None,
                "only the stored slug resolves"
            );
        }
        let unknown = ShortLink::for_recipe(RecipeId::new(id.get() + 1)).expect("positive id");
        assert_eq!(
            recipes.resolve_short_link(&unknown).await.expect("resolve"),
            None
        );
        assert_eq!(
            recipes
                .find_short_link(RecipeId::new(id.get() + 1))
                .await
                .expect("lookup"),
            None
        );
    });
}

#[rstest]
fn unknown_references_are_reported(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_references_are_reported skipped");
        return;
    };
    let seeded = &context.seeded;
    let recipes = &context.recipes;

    context.runtime.block_on(async {
        let bad_tag = recipes
            .create(&new_recipe(
                seeded.author,
                content("Ghost", vec![TagId::new(9_999)], &[(seeded.eggs, 1)]),
                0,
            ))
            .await;
        assert!(matches!(
            bad_tag,
            Err(RecipeRepositoryError::UnknownTag { .. })
        ));

        let bad_ingredient = recipes
            .create(&new_recipe(
                seeded.author,
                content(
                    "Ghost",
                    vec![seeded.breakfast],
                    &[(IngredientId::new(9_999), 1)],
                ),
                0,
            ))
            .await;
        assert!(matches!(
            bad_ingredient,
            Err(RecipeRepositoryError::UnknownIngredient { .. })
        ));

        let listing = recipes
            .list(&RecipeListFilter::default(), None, page(10))
            .await
            .expect("list");
        assert_eq!(listing.total, 0, "failed writes leave no partial rows");
    });
}

#[rstest]
fn update_replaces_links_and_keeps_image_when_absent(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: update_replaces_links_and_keeps_image_when_absent skipped");
        return;
    };
    let seeded = &context.seeded;
    let recipes = &context.recipes;

    context.runtime.block_on(async {
        let id = recipes
            .create(&new_recipe(
                seeded.author,
                content("Pancakes", vec![seeded.breakfast], &[(seeded.flour, 250)]),
                0,
            ))
            .await
            .expect("create");

        recipes
            .update(
                id,
                &RecipeUpdate {
                    content: content("Omelette", vec![seeded.dinner], &[(seeded.eggs, 3)]),
                    image: None,
                },
            )
            .await
            .expect("update");

        let recipe = recipes
            .find(id, None)
            .await
            .expect("lookup")
            .expect("recipe");
        assert_eq!(recipe.name, "Omelette");
        assert_eq!(recipe.image, "http://media.test/recipes/a.png");
        assert_eq!(recipe.tags.len(), 1);
        assert_eq!(recipe.tags[0].id, seeded.dinner);
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].id, seeded.eggs);

        assert!(recipes.delete(id).await.expect("delete"));
        assert!(!recipes.delete(id).await.expect("second delete"));
        assert!(recipes.find_card(id).await.expect("lookup").is_none());
    });
}

#[rstest]
fn listing_filters_and_orders_newest_first(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: listing_filters_and_orders_newest_first skipped");
        return;
    };
    let seeded = &context.seeded;
    let (recipes, relations) = (&context.recipes, &context.relations);

    context.runtime.block_on(async {
        let older = recipes
            .create(&new_recipe(
                seeded.author,
                content("Porridge", vec![seeded.breakfast], &[(seeded.flour, 50)]),
                0,
            ))
            .await
            .expect("older");
        let newer = recipes
            .create(&new_recipe(
                seeded.reader,
                content("Stew", vec![seeded.dinner], &[(seeded.eggs, 1)]),
                10,
            ))
            .await
            .expect("newer");
        relations
            .add(seeded.reader, older, RecipeRelation::Favorite)
            .await
            .expect("favorite");

        let ids = |listing: backend::domain::ports::Listing<backend::domain::Recipe>| {
            listing
                .items
                .into_iter()
                .map(|recipe| recipe.id)
                .collect::<Vec<RecipeId>>()
        };

        let all = recipes
            .list(&RecipeListFilter::default(), None, page(10))
            .await
            .expect("all");
        assert_eq!(all.total, 2);
        assert_eq!(ids(all), [newer, older]);

        let by_tag = RecipeListFilter {
            tags: vec![TagSlug::new("dinner").expect("slug")],
            ..RecipeListFilter::default()
        };
        let tagged = recipes.list(&by_tag, None, page(10)).await.expect("tagged");
        assert_eq!(ids(tagged), [newer]);

        let by_author = RecipeListFilter {
            author: Some(seeded.author),
            ..RecipeListFilter::default()
        };
        let authored = recipes
            .list(&by_author, None, page(10))
            .await
            .expect("authored");
        assert_eq!(ids(authored), [older]);

        let favorites = RecipeListFilter {
            is_favorited: Some(true),
            ..RecipeListFilter::default()
        };
        let favorited = recipes
            .list(&favorites, Some(seeded.reader), page(10))
            .await
            .expect("favorites");
        assert_eq!(favorited.total, 1);
        assert!(favorited.items[0].is_favorited);

        let first_page = recipes
            .list(&RecipeListFilter::default(), None, page(1))
            .await
            .expect("first page");
        assert_eq!(first_page.total, 2, "total counts every match");
        assert_eq!(ids(first_page), [newer]);
    });
}
