use crate::helpers::spawn_app;

#[tokio::test]
async fn subscribe_returns_a_200_for_a_valid_email() {
    let test_app = spawn_app().await;

    let response = test_app
        .post_subscriptions("email=ursula_le_guin%40gmail.com".into())
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["details"], "email address added");

    let saved = test_app.stored_emails().await;
    assert_eq!(saved, vec!["ursula_le_guin@gmail.com".to_string()]);
}

#[tokio::test]
async fn subscribe_returns_a_400_for_invalid_or_missing_email() {
    let test_app = spawn_app().await;
    let test_cases = vec![
        ("", "missing the email"),
        ("email=", "empty email"),
        ("email=%20%20", "whitespace only"),
        ("email=definitely-not-an-email", "invalid email"),
        ("email=ursula%40domain.museum", "top-level label too long"),
    ];

    for (body, message) in test_cases {
        let response = test_app.post_subscriptions(body.into()).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["details"], "invalid argument value");
    }
    assert!(test_app.stored_emails().await.is_empty());
}

#[tokio::test]
async fn subscribe_returns_a_409_for_an_already_added_email() {
    let test_app = spawn_app().await;
    let body = "email=ursula_le_guin%40gmail.com";

    let first = test_app.post_subscriptions(body.into()).await;
    let second = test_app.post_subscriptions(body.into()).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(409, second.status().as_u16());
    let details: serde_json::Value = second.json().await.unwrap();
    assert_eq!(details["details"], "email address already added");
    assert_eq!(test_app.stored_emails().await.len(), 1);
}

#[tokio::test]
async fn subscribe_treats_addresses_case_sensitively() {
    let test_app = spawn_app().await;

    let lower = test_app.post_subscriptions("email=a%40test.com".into()).await;
    let upper = test_app.post_subscriptions("email=A%40test.com".into()).await;

    assert_eq!(200, lower.status().as_u16());
    assert_eq!(200, upper.status().as_u16());
    assert_eq!(test_app.stored_emails().await.len(), 2);
}
