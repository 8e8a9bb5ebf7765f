//! Integration tests for the Listing repository using in-memory SurrealDB.

use portico_core::error::PorticoError;
use portico_core::models::listing::{CreateListing, ListingFilter};
use portico_core::models::user::{CreateUser, UserRole};
use portico_core::repository::{ListingRepository, UserRepository};
use portico_db::repository::{SurrealListingRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create an agent.
async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    portico_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let agent = user_repo
        .create(CreateUser {
            email: "agent@agency.com".into(),
            password: "Password123!".into(),
            role: UserRole::Agent,
            phone: Some("+15550009999".into()),
        })
        .await
        .unwrap();

    (db, agent.id)
}

async fn seed_listing(
    repo: &SurrealListingRepository<surrealdb::engine::local::Db>,
    agent_id: Uuid,
    title: &str,
    price: f64,
    location: &str,
) -> Uuid {
    repo.create(CreateListing {
        title: title.into(),
        price,
        location: location.into(),
        description: format!("{title} description"),
        agent_id,
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn create_and_get_listing() {
    let (db, agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    let listing = repo
        .create(CreateListing {
            title: "Lakeside cottage".into(),
            price: 250_000.0,
            location: "Lake Tahoe".into(),
            description: "Two bedrooms, private dock".into(),
            agent_id,
        })
        .await
        .unwrap();

    assert_eq!(listing.title, "Lakeside cottage");
    assert_eq!(listing.agent_id, agent_id);

    let fetched = repo.get_by_id(listing.id).await.unwrap();
    assert_eq!(fetched.id, listing.id);
    assert_eq!(fetched.price, 250_000.0);
    assert_eq!(fetched.location, "Lake Tahoe");
}

#[tokio::test]
async fn get_missing_listing_is_not_found() {
    let (db, _agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    let result = repo.get_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(PorticoError::NotFound { .. })));
}

#[tokio::test]
async fn empty_filter_returns_everything() {
    let (db, agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    seed_listing(&repo, agent_id, "A", 100.0, "Springfield").await;
    seed_listing(&repo, agent_id, "B", 200.0, "Shelbyville").await;

    let all = repo.list(ListingFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn price_filter_is_inclusive_upper_bound() {
    let (db, agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    seed_listing(&repo, agent_id, "Cheap", 90.0, "Springfield").await;
    seed_listing(&repo, agent_id, "Exact", 100.0, "Springfield").await;
    seed_listing(&repo, agent_id, "Pricey", 110.0, "Springfield").await;

    let filtered = repo
        .list(ListingFilter {
            price_max: Some(100.0),
            location: None,
        })
        .await
        .unwrap();

    let mut titles: Vec<_> = filtered.iter().map(|l| l.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, ["Cheap", "Exact"]);
}

#[tokio::test]
async fn location_filter_is_case_insensitive_substring() {
    let (db, agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    seed_listing(&repo, agent_id, "One", 100.0, "Lakeview Heights").await;
    seed_listing(&repo, agent_id, "Two", 100.0, "SALT LAKE CITY").await;
    seed_listing(&repo, agent_id, "Three", 100.0, "Downtown").await;

    let filtered = repo
        .list(ListingFilter {
            price_max: None,
            location: Some("lake".into()),
        })
        .await
        .unwrap();

    let mut titles: Vec<_> = filtered.iter().map(|l| l.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, ["One", "Two"]);
}

#[tokio::test]
async fn filters_compose_with_and() {
    let (db, agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    seed_listing(&repo, agent_id, "Match", 80.0, "Lakeside").await;
    seed_listing(&repo, agent_id, "TooExpensive", 180.0, "Lakeside").await;
    seed_listing(&repo, agent_id, "WrongPlace", 80.0, "Hillside").await;

    let filtered = repo
        .list(ListingFilter {
            price_max: Some(100.0),
            location: Some("lake".into()),
        })
        .await
        .unwrap();

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Match");
}

#[tokio::test]
async fn no_match_returns_empty_not_error() {
    let (db, agent_id) = setup().await;
    let repo = SurrealListingRepository::new(db);

    seed_listing(&repo, agent_id, "Only", 500.0, "Metropolis").await;

    let filtered = repo
        .list(ListingFilter {
            price_max: Some(10.0),
            location: Some("gotham".into()),
        })
        .await
        .unwrap();

    assert!(filtered.is_empty());
}
