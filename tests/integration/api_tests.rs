//! Service layer against the REST envelope

use library_admin::{
    models::{librarian::LibrarianInput, user::LoginRequest, Category, Librarian},
    services::{books::BookFilter, ListQuery},
    AppError,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::services_for;

#[tokio::test]
async fn test_categories_use_limit_and_keyword() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(query_param("keyword", "sci"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "data": [{"id": 4, "name": "Science"}],
                "current_page": 2,
                "per_page": 5,
                "total": 6,
                "last_page": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let query = ListQuery::new(2, 5).with_search("sci");
    let page = services.categories.list(&query).await.unwrap();

    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].name, "Science");
    assert_eq!(page.meta.page, 2);
    assert_eq!(page.meta.total, 6);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_librarians_use_per_page_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/librarians"))
        .and(query_param("per_page", "10"))
        .and(query_param("search", "rina"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{"id": 1, "name": "Rina", "email": "rina@school.test"}],
            "meta": {"page": 1, "per_page": 10, "total": 11, "last_page": 2}
        })))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let page = services
        .librarians
        .list(&ListQuery::new(1, 10).with_search(" rina "))
        .await
        .unwrap();

    assert_eq!(page.rows[0].email.as_deref(), Some("rina@school.test"));
    assert!(page.has_more());
}

#[tokio::test]
async fn test_book_filter_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book-masters"))
        .and(query_param("category_id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let query = ListQuery::new(1, 10).with_filter(BookFilter { category_id: Some(3) });
    let page = services.books.list_masters(&query).await.unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.meta.total_pages(), 1);
}

#[tokio::test]
async fn test_login_attaches_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"token": "tok-123", "user": {"id": 1, "name": "Admin"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"id": 1, "name": "Admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let session = services
        .auth
        .login(&LoginRequest {
            username: "admin".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.token, "tok-123");
    assert!(services.api.has_token());

    let me = services.auth.me().await.unwrap();
    assert_eq!(me.name, "Admin");
}

#[tokio::test]
async fn test_empty_credentials_are_rejected_locally() {
    let server = MockServer::start().await;
    let services = services_for(&server);

    let err = services
        .auth
        .login(&LoginRequest {
            username: String::new(),
            password: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_validation_errors_one_message_per_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/librarians"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "error",
            "message": "The given data was invalid.",
            "errors": {
                "email": ["The email has already been taken.", "The email is too long."],
                "phone": ["The phone format is invalid."]
            }
        })))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let input = LibrarianInput {
        name: "Rina".to_string(),
        email: "rina@school.test".to_string(),
        phone: None,
        password: Some("password123".to_string()),
    };
    let err = services.librarians.create(&input).await.unwrap_err();

    let messages = err.user_messages("Failed to save librarian");
    assert_eq!(
        messages,
        vec![
            "The email has already been taken. The email is too long.".to_string(),
            "The phone format is invalid.".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_unauthorized_and_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "message": "Unauthenticated."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let services = services_for(&server);
    assert!(matches!(services.auth.me().await, Err(AppError::Unauthorized(_))));

    let err = services.categories.get(99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.user_message("Category not found"), "Category not found");
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/librarians/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    tokio_test::assert_ok!(services.librarians.delete(3).await);
}

#[test]
fn test_models_accept_alternate_keys() {
    let category: Category = serde_json::from_value(json!({"id": 1, "name": "Fiction"})).unwrap();
    assert_eq!(category.description, None);

    let librarian: Librarian = serde_json::from_value(json!({"id": 2, "name": "Budi"})).unwrap();
    assert_eq!(librarian.role, None);
}
