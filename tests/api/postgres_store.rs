use crate::helpers::{configure_database, spawn_app_with_postgres};
use chrono::{Duration, Utc};
use rate_newsletter::configuration::get_configuration;
use rate_newsletter::domain::SubscriberEmail;
use rate_newsletter::subscriber_store::{PgSubscriberStore, StoreError, SubscriberStore};
use uuid::Uuid;

async fn fresh_store() -> PgSubscriberStore {
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = Uuid::new_v4().to_string();
    PgSubscriberStore::new(configure_database(&configuration.database).await)
}

fn email(address: &str) -> SubscriberEmail {
    SubscriberEmail::parse(address.to_string()).unwrap()
}

#[tokio::test]
async fn registering_twice_answers_200_then_409_and_keeps_one_row() {
    let test_app = spawn_app_with_postgres().await;

    let first = test_app
        .post_subscriptions("email=ursula%40domain.com".into())
        .await;
    let second = test_app
        .post_subscriptions("email=ursula%40domain.com".into())
        .await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(409, second.status().as_u16());

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE email = $1")
        .bind("ursula@domain.com")
        .fetch_one(test_app.db_pool.as_ref().unwrap())
        .await
        .expect("Failed to count saved subscriptions.");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn subscribe_persists_the_address_in_postgres() {
    let test_app = spawn_app_with_postgres().await;

    let response = test_app
        .post_subscriptions("email=le_guin%40gmail.com".into())
        .await;

    assert_eq!(200, response.status().as_u16());
    let saved: String = sqlx::query_scalar("SELECT email FROM subscriptions")
        .fetch_one(test_app.db_pool.as_ref().unwrap())
        .await
        .expect("Failed to fetch saved subscription.");
    assert_eq!(saved, "le_guin@gmail.com");
}

#[tokio::test]
async fn a_duplicate_insert_is_reported_as_already_exists() {
    let store = fresh_store().await;
    let address = email("a@test.com");

    store.insert(&address, Utc::now()).await.unwrap();
    let outcome = store.insert(&address, Utc::now()).await;

    assert!(matches!(outcome, Err(StoreError::AlreadyExists)));
    assert_eq!(store.list_all().await.unwrap(), vec!["a@test.com"]);
}

#[tokio::test]
async fn exists_reports_only_stored_addresses() {
    let store = fresh_store().await;
    store.insert(&email("a@test.com"), Utc::now()).await.unwrap();

    assert!(store.exists(&email("a@test.com")).await.unwrap());
    assert!(!store.exists(&email("b@test.com")).await.unwrap());
}

#[tokio::test]
async fn list_all_is_ordered_by_subscription_time() {
    let store = fresh_store().await;
    let now = Utc::now();

    store.insert(&email("late@test.com"), now).await.unwrap();
    store
        .insert(&email("early@test.com"), now - Duration::hours(2))
        .await
        .unwrap();
    store
        .insert(&email("middle@test.com"), now - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(
        store.list_all().await.unwrap(),
        vec!["early@test.com", "middle@test.com", "late@test.com"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_of_one_address_are_settled_by_the_unique_constraint() {
    let test_app = spawn_app_with_postgres().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let address = test_app.address.clone();
            tokio::spawn(async move {
                reqwest::Client::new()
                    .post(format!("http://{}/subscribe", address))
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body("email=race%40test.com")
                    .send()
                    .await
                    .expect("Failed to execute request.")
                    .status()
                    .as_u16()
            })
        })
        .collect();
    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == 409).count(), 7);
    assert_eq!(test_app.stored_emails().await, vec!["race@test.com"]);
}
