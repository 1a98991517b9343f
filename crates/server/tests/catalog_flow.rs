//! End-to-end catalog flows on the file backend.
//!
//! Exercises the repository and registry the way the admin panel does,
//! against JSON files in a temp directory.

use std::collections::BTreeMap;

use luxury_market_core::{NewProduct, ProductPatch, Universe};
use luxury_market_server::catalog::{CatalogError, CategoryRegistry, ProductRepository};
use luxury_market_server::store::{FileStore, Store};

fn setup() -> (tempfile::TempDir, ProductRepository, CategoryRegistry) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Store::File(FileStore::open(dir.path()).expect("open store"));
    let products = ProductRepository::new(store.clone());
    let registry = CategoryRegistry::new(store, products.clone());
    (dir, products, registry)
}

fn new_product(name: &str, category: &str, universe: Universe) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: 12_500,
        category: category.to_string(),
        universe,
        image: Some("https://cdn.example/a.jpg".to_string()),
        images: vec!["https://cdn.example/b.jpg".to_string()],
        description: "Description".to_string(),
        color: None,
        color_images: BTreeMap::new(),
        sizes: vec![],
    }
}

#[tokio::test]
async fn add_assigns_id_slug_and_primary_image() {
    let (_dir, products, _registry) = setup();

    let created = products
        .add(new_product("Chemise Bleue", "Chemise", Universe::Mode))
        .await
        .expect("add");

    assert!(!created.id.is_empty());
    assert_eq!(created.slug, "chemise-bleue");
    // Legacy single field first, explicit list after.
    assert_eq!(
        created.images,
        vec!["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"]
    );
    assert_eq!(created.image, created.images[0]);

    let fetched = products
        .get_by_id(&created.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn slug_collisions_get_numeric_suffixes() {
    let (_dir, products, _registry) = setup();

    let first = products
        .add(new_product("Chemise Bleue", "Chemise", Universe::Mode))
        .await
        .expect("add first");
    let second = products
        .add(new_product("Chemise Bleue", "Chemise", Universe::Mode))
        .await
        .expect("add second");
    let third = products
        .add(new_product("Chemise Bleue", "Chemise", Universe::Mode))
        .await
        .expect("add third");

    assert_eq!(first.slug, "chemise-bleue");
    assert_eq!(second.slug, "chemise-bleue-1");
    assert_eq!(third.slug, "chemise-bleue-2");
}

#[tokio::test]
async fn add_without_any_image_is_a_validation_error() {
    let (_dir, products, _registry) = setup();

    let mut input = new_product("Chemise", "Chemise", Universe::Mode);
    input.image = None;
    input.images = vec!["   ".to_string()];

    let err = products.add(input).await.expect_err("must fail");
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn rename_regenerates_slug_excluding_self() {
    let (_dir, products, _registry) = setup();

    let created = products
        .add(new_product("Chemise Bleue", "Chemise", Universe::Mode))
        .await
        .expect("add");

    // Renaming to its own name keeps the slug stable.
    let same = products
        .update(
            &created.id,
            ProductPatch {
                name: Some("Chemise Bleue".to_string()),
                ..ProductPatch::default()
            },
        )
        .await
        .expect("update")
        .expect("present");
    assert_eq!(same.slug, "chemise-bleue");

    let renamed = products
        .update(
            &created.id,
            ProductPatch {
                name: Some("Chemise Verte".to_string()),
                ..ProductPatch::default()
            },
        )
        .await
        .expect("update")
        .expect("present");
    assert_eq!(renamed.slug, "chemise-verte");
    assert_eq!(renamed.name, "Chemise Verte");
}

#[tokio::test]
async fn update_unknown_id_returns_none_and_delete_reports_absence() {
    let (_dir, products, _registry) = setup();

    let missing = products
        .update("nope", ProductPatch::default())
        .await
        .expect("update");
    assert!(missing.is_none());

    assert!(!products.delete("nope").await.expect("delete"));

    let created = products
        .add(new_product("Sac", "Maroquinerie", Universe::Mode))
        .await
        .expect("add");
    assert!(products.delete(&created.id).await.expect("delete"));
    assert!(products.get_by_id(&created.id).await.expect("get").is_none());
}

#[tokio::test]
async fn categories_union_registered_observed_and_builtins() {
    let (_dir, products, registry) = setup();

    registry
        .create_category("Parfums")
        .await
        .expect("create category");
    products
        .add(new_product("Lampe", "Luminaire salon", Universe::Tout))
        .await
        .expect("add");

    let categories = registry.categories().await.expect("categories");
    assert!(categories.contains(&"Parfums".to_string())); // registered
    assert!(categories.contains(&"Luminaire salon".to_string())); // observed
    assert!(categories.contains(&"Vêtements".to_string())); // built-in mode
    assert!(categories.contains(&"Electromenager".to_string())); // built-in universe
    assert!(categories.contains(&"Tshirt".to_string())); // built-in subcategory

    // Deduped and sorted.
    let mut deduped = categories.clone();
    deduped.dedup();
    assert_eq!(categories, deduped);
}

#[tokio::test]
async fn create_category_is_idempotent() {
    let (_dir, _products, registry) = setup();

    let first = registry.create_category("Parfums").await.expect("create");
    assert!(first.created);
    let second = registry.create_category("Parfums").await.expect("create");
    assert!(!second.created);

    let err = registry.create_category("   ").await.expect_err("empty");
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn delete_unused_category_succeeds_without_replacement() {
    let (_dir, _products, registry) = setup();

    registry.create_category("Parfums").await.expect("create");
    let outcome = registry
        .delete_category("Parfums", None)
        .await
        .expect("delete");
    assert_eq!(outcome.reassigned, 0);
    assert!(
        !registry
            .categories()
            .await
            .expect("categories")
            .contains(&"Parfums".to_string())
    );
}

#[tokio::test]
async fn delete_used_category_requires_replacement() {
    let (_dir, products, registry) = setup();

    products
        .add(new_product("Lampe", "Luminaire", Universe::Tout))
        .await
        .expect("add");
    products
        .add(new_product("Lustre", "Luminaire", Universe::Tout))
        .await
        .expect("add");

    let err = registry
        .delete_category("Luminaire", None)
        .await
        .expect_err("blocked");
    assert!(matches!(err, CatalogError::NeedsReplacement(_)));

    let outcome = registry
        .delete_category("Luminaire", Some("Electronique"))
        .await
        .expect("delete with replacement");
    assert_eq!(outcome.reassigned, 2);

    assert_eq!(
        products
            .count_by_category("Luminaire")
            .await
            .expect("count"),
        0
    );
    assert_eq!(
        products
            .count_by_category("Electronique")
            .await
            .expect("count"),
        2
    );
}

#[tokio::test]
async fn delete_rejects_replacement_equal_to_name() {
    let (_dir, _products, registry) = setup();

    let err = registry
        .delete_category("Parfums", Some("Parfums"))
        .await
        .expect_err("same replacement");
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn rename_into_existing_category_merges() {
    let (_dir, products, registry) = setup();

    products
        .add(new_product("Lampe", "Luminaire", Universe::Tout))
        .await
        .expect("add");
    registry.create_category("Eclairage").await.expect("create");

    let outcome = registry
        .rename_category("Luminaire", "Eclairage")
        .await
        .expect("rename");
    assert!(outcome.merged);
    assert_eq!(outcome.reassigned, 1);

    let categories = registry.categories().await.expect("categories");
    assert!(!categories.contains(&"Luminaire".to_string()));
    assert!(categories.contains(&"Eclairage".to_string()));
}

#[tokio::test]
async fn rename_to_fresh_name_does_not_merge() {
    let (_dir, _products, registry) = setup();

    registry.create_category("Parfums").await.expect("create");
    let outcome = registry
        .rename_category("Parfums", "Senteurs")
        .await
        .expect("rename");
    assert!(!outcome.merged);
    assert_eq!(outcome.reassigned, 0);
}

#[tokio::test]
async fn rename_unknown_category_fails() {
    let (_dir, _products, registry) = setup();

    let err = registry
        .rename_category("Inconnue", "Ailleurs")
        .await
        .expect_err("unknown");
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn rename_to_same_name_is_a_noop() {
    let (_dir, _products, registry) = setup();

    registry.create_category("Parfums").await.expect("create");
    let outcome = registry
        .rename_category("Parfums", "Parfums")
        .await
        .expect("rename");
    assert_eq!(outcome.reassigned, 0);
    assert!(!outcome.merged);
    assert!(
        registry
            .categories()
            .await
            .expect("categories")
            .contains(&"Parfums".to_string())
    );
}

#[tokio::test]
async fn subcategory_delete_falls_back_to_vetements() {
    let (_dir, products, registry) = setup();

    registry
        .create_mode_subcategory("Boubou")
        .await
        .expect("create");
    products
        .add(new_product("Boubou brodé", "Boubou", Universe::Mode))
        .await
        .expect("add");

    // No replacement: products land in the top-level bucket instead of
    // blocking the deletion.
    let outcome = registry
        .delete_mode_subcategory("Boubou", None)
        .await
        .expect("delete");
    assert_eq!(outcome.reassigned, 1);
    assert_eq!(
        products
            .count_by_category("Vêtements")
            .await
            .expect("count"),
        1
    );
    assert!(
        !registry
            .mode_subcategories()
            .await
            .expect("subcategories")
            .contains(&"Boubou".to_string())
    );
}

#[tokio::test]
async fn subcategory_delete_with_replacement_reassigns_to_it() {
    let (_dir, products, registry) = setup();

    registry
        .create_mode_subcategory("Boubou")
        .await
        .expect("create");
    products
        .add(new_product("Boubou brodé", "Boubou", Universe::Mode))
        .await
        .expect("add");

    let outcome = registry
        .delete_mode_subcategory("Boubou", Some("Tshirt"))
        .await
        .expect("delete");
    assert_eq!(outcome.reassigned, 1);
    assert_eq!(
        products.count_by_category("Tshirt").await.expect("count"),
        1
    );
}

#[tokio::test]
async fn subcategory_names_cannot_shadow_top_level_mode_categories() {
    let (_dir, _products, registry) = setup();

    let err = registry
        .create_mode_subcategory("Chaussures")
        .await
        .expect_err("reserved");
    assert!(matches!(err, CatalogError::Validation(_)));

    registry
        .create_mode_subcategory("Boubou")
        .await
        .expect("create");
    let err = registry
        .rename_mode_subcategory("Boubou", "Maroquinerie")
        .await
        .expect_err("reserved rename");
    assert!(matches!(err, CatalogError::Conflict(_)));
}

#[tokio::test]
async fn subcategory_listing_includes_observed_names() {
    let (_dir, products, registry) = setup();

    products
        .add(new_product("Chemise lin", "chemise homme", Universe::Mode))
        .await
        .expect("add");

    let subcategories = registry.mode_subcategories().await.expect("list");
    // "chemise homme" resolves onto the built-in "Chemise" bucket.
    assert!(subcategories.contains(&"Chemise".to_string()));
    assert!(subcategories.contains(&"Tshirt".to_string()));

    let infos = registry
        .mode_subcategory_infos()
        .await
        .expect("infos");
    let chemise = infos
        .iter()
        .find(|i| i.name == "Chemise")
        .expect("chemise info");
    // Counts are exact-match: "chemise homme" is not literally "Chemise".
    assert_eq!(chemise.count, 0);
}

#[tokio::test]
async fn category_infos_count_exact_usage() {
    let (_dir, products, registry) = setup();

    products
        .add(new_product("Lampe", "Luminaire", Universe::Tout))
        .await
        .expect("add");
    products
        .add(new_product("Lustre", "Luminaire", Universe::Tout))
        .await
        .expect("add");

    let infos = registry.category_infos().await.expect("infos");
    let luminaire = infos
        .iter()
        .find(|i| i.name == "Luminaire")
        .expect("luminaire info");
    assert_eq!(luminaire.count, 2);

    let vetements = infos
        .iter()
        .find(|i| i.name == "Vêtements")
        .expect("vetements info");
    assert_eq!(vetements.count, 0);
}
