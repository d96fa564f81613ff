pub mod common;

use cinema_backend::api;

#[tokio::test]
#[ignore = "needs a running server over a seeded database"]
async fn filters_movies_by_language() {
    let movies = common::Client::new()
        .movies(&api::movie::Filter {
            language: Some("English".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!movies.is_empty());
    assert!(movies.iter().all(|m| m.language == "English"));
}

#[tokio::test]
#[ignore = "needs a running server over a seeded database"]
async fn unknown_customer_has_no_membership() {
    let (status, detail) =
        common::Client::new().membership(-1).await.unwrap_err();
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert_eq!(detail, "Customer not found");
}
