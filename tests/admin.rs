pub mod common;

use reqwest::StatusCode;

#[tokio::test]
#[ignore = "needs a running server over a seeded database"]
async fn admin_routes_require_token() {
    let (status, _) = common::Client::new().admin_vouchers().await.unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "needs a running server over a seeded database"]
async fn customer_token_is_not_enough() {
    let (status, _) = common::Client::new()
        .login_customer("customer@example.com", "password")
        .await
        .admin_vouchers()
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "needs a running server over a seeded database"]
async fn admin_lists_vouchers() {
    let vouchers = common::Client::new()
        .login_admin("admin@example.com", "password")
        .await
        .admin_vouchers()
        .await
        .unwrap();
    assert!(vouchers.iter().all(|v| v.expiration.len() == 10));
}
