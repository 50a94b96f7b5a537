use reqwest::StatusCode;

use uuid::Uuid;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    in_stock_variant, out_of_stock_variant, Identity, NewSubscription, TestApp,
};

fn guest_subscription(email: &str, variant_code: &str) -> NewSubscription {
    NewSubscription {
        email: Some(email.into()),
        product_variant_code: Some(variant_code.into()),
        ..NewSubscription::default()
    }
}

async fn mount_mail_ok(app: &TestApp) {
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;
}

#[tokio::test]
async fn subscribe_returns_created_for_valid_request() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;
    mount_mail_ok(&app).await;

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response body");
    assert_eq!("a@example.com", body["email"]);
    assert_eq!("VAR-1", body["product_variant_code"]);

    let token = body["token"].as_str().expect("Expected a token");
    assert!(!token.is_empty());
    assert!(!token.contains('+'));
    assert!(!token.contains('/'));

    assert_eq!(1, app.store.len().await);
}

#[tokio::test]
async fn subscribe_returns_bad_request_for_missing_or_malformed_data() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;

    let test_cases: Vec<(&str, NewSubscription)> = vec![
        (
            "missing email",
            NewSubscription {
                product_variant_code: Some("VAR-1".into()),
                ..NewSubscription::default()
            },
        ),
        (
            "malformed email",
            guest_subscription("definitely not an email", "VAR-1"),
        ),
        ("missing variant code", {
            NewSubscription {
                email: Some("a@example.com".into()),
                ..NewSubscription::default()
            }
        }),
    ];

    for (desc, new_subscription) in test_cases {
        let res = app
            .subscription_create(&new_subscription, None)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail when payload was {}",
            desc
        );
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn subscribe_returns_not_found_for_unknown_variant() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "DOES-NOT-EXIST"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::NOT_FOUND, res.status());
}

#[tokio::test]
async fn subscribe_returns_conflict_for_in_stock_variant() {
    let app = TestApp::spawn(vec![in_stock_variant("VAR-1")]).await;

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CONFLICT, res.status());
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn subscribe_returns_conflict_for_duplicate_pair() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;
    mount_mail_ok(&app).await;

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CONFLICT, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response body");
    assert_eq!("a@example.com", body["email"]);

    assert_eq!(1, app.store.len().await);
}

#[tokio::test]
async fn subscribe_sends_a_confirmation_email_with_deletion_link() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        // Expect a send-email request
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();

    assert_eq!("a@example.com", body["To"]);

    let html_link = extract_email_link(body["HtmlBody"].as_str().unwrap());
    let text_link = extract_email_link(body["TextBody"].as_str().unwrap());
    assert_eq!(html_link, text_link);
    assert!(html_link.contains("/subscriptions/delete/"));
}

#[tokio::test]
async fn clicking_the_deletion_link_removes_the_subscription() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;
    mount_mail_ok(&app).await;

    let _ = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&email_request.body).unwrap();
    let link = extract_email_link(body["TextBody"].as_str().unwrap());

    let res = app
        .client
        .get(&link)
        .send()
        .await
        .expect("Failed to follow deletion link");

    assert_eq!(StatusCode::OK, res.status());
    assert!(app.store.is_empty().await);

    // A second click on the same, now stale, link is not an error
    let res = app
        .client
        .get(&link)
        .send()
        .await
        .expect("Failed to follow deletion link");

    assert_eq!(StatusCode::OK, res.status());
    let body: serde_json::Value = res.json().await.expect("Failed to parse response body");
    assert_eq!("nothing to delete", body["message"]);
}

#[tokio::test]
async fn deleting_an_unknown_token_is_informational() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;
    mount_mail_ok(&app).await;

    let _ = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");

    let res = app
        .subscription_delete("unknown-token")
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    // The store is untouched
    assert_eq!(1, app.store.len().await);
}

#[tokio::test]
async fn subscription_stands_even_if_email_send_fails() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        // Ensure that send-email fails
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .subscription_create(&guest_subscription("a@example.com", "VAR-1"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(1, app.store.len().await);
}

#[tokio::test]
async fn authenticated_customer_subscribes_without_supplying_an_email() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1")]).await;
    mount_mail_ok(&app).await;

    let identity = Identity {
        customer_id: Uuid::new_v4(),
        email: Some("account@example.com".into()),
    };
    let new_subscription = NewSubscription {
        product_variant_code: Some("VAR-1".into()),
        ..NewSubscription::default()
    };

    let res = app
        .subscription_create(&new_subscription, Some(&identity))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response body");
    assert_eq!("account@example.com", body["email"]);
    assert_eq!(identity.customer_id.to_string(), body["customer_id"]);
}

#[tokio::test]
async fn account_list_requires_an_authenticated_customer() {
    let app = TestApp::spawn(Vec::new()).await;

    let res = app
        .account_list(None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}

#[tokio::test]
async fn account_list_returns_only_the_customers_subscriptions() {
    let app = TestApp::spawn(vec![out_of_stock_variant("VAR-1"), out_of_stock_variant("VAR-2")])
        .await;
    mount_mail_ok(&app).await;

    let identity = Identity {
        customer_id: Uuid::new_v4(),
        email: Some("account@example.com".into()),
    };

    let res = app
        .subscription_create(
            &NewSubscription {
                product_variant_code: Some("VAR-1".into()),
                ..NewSubscription::default()
            },
            Some(&identity),
        )
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    // A guest subscription that must not show up in the account list
    let res = app
        .subscription_create(&guest_subscription("guest@example.com", "VAR-2"), None)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .account_list(Some(&identity))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response body");
    let listed = body.as_array().expect("Expected a JSON array");
    assert_eq!(1, listed.len());
    assert_eq!("account@example.com", listed[0]["email"]);
    assert_eq!("VAR-1", listed[0]["product_variant_code"]);
}

fn extract_email_link(body: &str) -> String {
    let links: Vec<_> = linkify::LinkFinder::new()
        .links(body)
        .filter(|l| *l.kind() == linkify::LinkKind::Url)
        .collect();
    assert_eq!(1, links.len());
    links[0].as_str().to_string()
}
