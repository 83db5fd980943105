//! Page, form and import flows end to end against the mocked backend

use std::sync::Arc;

use chrono::NaiveDate;
use library_admin::{
    config::UiConfig,
    forms::{borrow::SUBMIT_FALLBACK, returns, BorrowForm, ReturnForm},
    import::{books::BookImport, students::StudentImport},
    models::{user::LoginRequest, BookItem, ItemCondition, ItemStatus, Student},
    pages::{
        books::{AvailableItemOptions, BookDetailPage},
        categories::{category_list_page, category_option},
        dashboard::DashboardPage,
        students::StudentOptions,
    },
    session::{MemorySessionStore, SessionStore},
    widgets::NoticeLevel,
    AppConfig, AppContext, AppError,
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::services_for;

fn student() -> Student {
    serde_json::from_value(json!({
        "id": 5,
        "nis": "1001",
        "name": "Ana",
        "class": "7A"
    }))
    .unwrap()
}

fn item_json(id: i64) -> Value {
    json!({
        "id": id,
        "code": format!("BK-{:04}", id),
        "condition": "good",
        "status": "available",
        "book": {"id": 1, "title": "Laskar Pelangi"}
    })
}

fn item(id: i64) -> BookItem {
    serde_json::from_value(item_json(id)).unwrap()
}

fn borrow_form(server: &MockServer) -> BorrowForm {
    let services = services_for(server);
    let ui = UiConfig::default();
    BorrowForm::new(
        Arc::new(StudentOptions::new(&services, &ui)),
        Arc::new(AvailableItemOptions::new(&services, &ui)),
        &ui,
        NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(),
    )
}

#[tokio::test]
async fn test_book_import_sends_only_valid_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/book-masters/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"created": 1, "skipped": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let csv = "Title,Author,Publisher,Year,ISBN,Good,Fair,Poor\n\
               Laskar Pelangi,Andrea Hirata,Bentang,2005,979-3062-79-7,3,1,0\n\
               Bumi Manusia,Pramoedya,Hasta Mitra,1980,,0,0,0\n";
    let mut import = BookImport::parse(csv);
    assert_eq!(import.rows().len(), 2);

    let category = services_category();
    import.apply_category_to_all(&category_option(category));
    assert_eq!(import.valid_count(), 1);

    let summary = import.commit(&services.books).await.unwrap();
    assert_eq!(summary.imported, 1);
    assert!(import.rows().is_empty());
    assert_eq!(import.notices.drain()[0].level, NoticeLevel::Success);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Laskar Pelangi");
    assert_eq!(books[0]["category_id"], 3);
    assert_eq!(books[0]["good_qty"], 3);
}

fn services_category() -> library_admin::models::Category {
    serde_json::from_value(json!({"id": 3, "name": "Novel"})).unwrap()
}

#[tokio::test]
async fn test_book_import_failure_keeps_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/book-masters/import"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "error",
            "errors": {"books.0.isbn": ["The isbn has already been taken."]}
        })))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut import = BookImport::parse("Dune,Herbert,Chilton,1965,123,1,0,0");
    import.apply_category_to_all(&category_option(services_category()));

    let err = import.commit(&services.books).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(import.rows().len(), 1);
    let notices = import.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "The isbn has already been taken.");
}

#[tokio::test]
async fn test_borrow_submit_sends_due_date() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/borrow-transactions"))
        .and(body_json(json!({
            "student_id": 5,
            "book_item_ids": [1, 2],
            "borrow_date": "2024-03-28",
            "due_date": "2024-04-11"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": {
                "id": 77,
                "student": {"id": 5, "nis": "1001", "name": "Ana"},
                "items": [{"book_item": item_json(1)}, {"book_item": item_json(2)}],
                "borrow_date": "2024-03-28",
                "due_date": "2024-04-11",
                "status": "borrowed"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut form = borrow_form(&server);
    form.set_student(student());
    assert!(form.add_item(item(1)));
    assert!(form.add_item(item(2)));
    assert!(!form.add_item(item(1)));
    form.set_duration_days(14);

    let transaction = form.submit(&services.transactions).await.unwrap();
    assert_eq!(transaction.id, 77);
    assert_eq!(transaction.outstanding_items().count(), 2);
    assert!(form.items().is_empty());
    assert!(form.error_message().is_none());
}

#[tokio::test]
async fn test_borrow_submit_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/borrow-transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "message": "Student has reached the borrowing limit"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/borrow-transactions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut form = borrow_form(&server);
    form.set_student(student());
    form.add_item(item(1));

    assert!(form.submit(&services.transactions).await.is_err());
    assert_eq!(form.error_message(), Some("Student has reached the borrowing limit"));
    assert_eq!(form.items().len(), 1);

    assert!(form.submit(&services.transactions).await.is_err());
    assert_eq!(form.error_message(), Some(SUBMIT_FALLBACK));
}

#[tokio::test]
async fn test_available_item_picker_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book-items"))
        .and(query_param("status", "available"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [item_json(1), item_json(2)],
            "meta": {"page": 1, "per_page": 10, "total": 3, "last_page": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/book-items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [item_json(3)],
            "meta": {"page": 2, "per_page": 10, "total": 3, "last_page": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = borrow_form(&server);
    form.item_picker.click().await;
    assert!(form.pick_item(0));
    assert_eq!(form.item_picker.state().options().len(), 1);
    assert!(form.item_picker.state().has_more());

    form.item_picker.click().await;
    form.item_picker.scroll(400, 200, 600).await;
    let values: Vec<&str> = form
        .item_picker
        .state()
        .options()
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(values, vec!["2", "3"]);
    assert!(!form.item_picker.state().has_more());
    assert_eq!(form.items()[0].condition, ItemCondition::Good);
    assert_eq!(form.items()[0].status, ItemStatus::Available);
}

#[tokio::test]
async fn test_student_picker_skips_inactive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [
                {"id": 1, "nis": "1001", "name": "Ana"},
                {"id": 2, "nis": "1002", "name": "Budi", "is_active": false}
            ]
        })))
        .mount(&server)
        .await;

    let mut form = borrow_form(&server);
    form.student_picker.click().await;
    let labels: Vec<&str> = form
        .student_picker
        .state()
        .options()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["1001 - Ana"]);
    assert!(form.pick_student(0));
    assert_eq!(form.student().map(|s| s.data.id), Some(1));
}

#[tokio::test]
async fn test_delete_confirmation_reloads_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{"id": 4, "name": "Poetry"}]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Category deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut page = category_list_page(&services, &UiConfig::default());
    page.list.refresh().await;

    page.request_delete(4, "Poetry");
    assert!(page.delete_dialog.is_open());
    assert!(page.confirm_delete().await);
    assert!(!page.delete_dialog.is_open());

    let notices = page.list.notices.drain();
    assert_eq!(notices[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_dashboard_panels_fail_independently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"total_books": 120, "overdue_borrows": 4}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports/overdue"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports/popular-books"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{"id": 1, "title": "Laskar Pelangi", "borrow_count": 31}]
        })))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut page = DashboardPage::new(services.reports.clone());
    page.load().await;

    assert_eq!(page.summary.as_ref().map(|s| s.total_books), Some(120));
    assert!(page.overdue.is_empty());
    assert_eq!(page.popular[0].borrows, 31);
    let notices = page.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Failed to load overdue transactions");
}

#[tokio::test]
async fn test_session_survives_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"access_token": "tok-9", "user": {"id": 3, "name": "Sari"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    let store = Arc::new(MemorySessionStore::new());

    let mut ctx = AppContext::new(config.clone(), store.clone()).unwrap();
    let credentials = LoginRequest {
        username: "sari".to_string(),
        password: "secret".to_string(),
    };
    let user = ctx.sign_in(&credentials).await.unwrap();
    assert_eq!(user.name, "Sari");
    assert_eq!(store.load().unwrap().map(|s| s.token), Some("tok-9".to_string()));

    let mut restarted = AppContext::new(config, store.clone()).unwrap();
    assert_eq!(restarted.current_user().map(|u| u.id), Some(3));
    assert!(restarted.services.api.has_token());

    restarted.sign_out().await.unwrap();
    assert!(!restarted.is_signed_in());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn test_student_import_sends_every_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/students/import"))
        .and(body_json(json!({
            "students": [
                {"student_number": "1001", "name": "Ana", "class": "7A"},
                {"student_number": "", "name": "Budi", "email": "not-an-email"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"created": 2, "skipped": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut import = StudentImport::parse("NIS,Name,Class\n1001,Ana,7A\n,Budi,,,,not-an-email\n");
    assert_eq!(import.rows().len(), 2);

    let summary = import.commit(&services.students).await.unwrap();
    assert_eq!(summary.imported, 2);
    assert!(import.rows().is_empty());
    assert_eq!(import.notices.drain()[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_student_import_failure_one_notice_per_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/students/import"))
        .respond_with(ResponseTemplate::new(422).set_body_raw(
            r#"{"status": "error", "errors": {
                "students.1.student_number": ["The student number field is required."],
                "students.1.email": ["The email must be a valid email address.", "The email is too long."]
            }}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut import = StudentImport::parse("1001,Ana\n,Budi,,,,not-an-email");

    let err = import.commit(&services.students).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!import.is_processing());
    assert_eq!(import.rows().len(), 2);

    let messages: Vec<String> = import.notices.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        vec![
            "The student number field is required.".to_string(),
            "The email must be a valid email address. The email is too long.".to_string(),
        ]
    );
}

fn borrow_json() -> Value {
    json!({
        "id": 42,
        "student": {"id": 5, "nis": "1001", "name": "Ana"},
        "items": [
            {"book_item": item_json(1)},
            {"book_item": item_json(2), "returned_at": "2024-03-30"},
            {"book_item": item_json(3)}
        ],
        "borrow_date": "2024-03-28",
        "due_date": "2024-04-11",
        "status": "borrowed"
    })
}

async fn return_form(server: &MockServer) -> ReturnForm {
    Mock::given(method("GET"))
        .and(path("/api/borrow-transactions/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": borrow_json()
        })))
        .mount(server)
        .await;
    let services = services_for(server);
    ReturnForm::load(&services.transactions, 42, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_return_submit_prunes_returned_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/return-transactions"))
        .and(body_json(json!({
            "borrow_transaction_id": 42,
            "return_date": "2024-04-02",
            "items": [{"book_item_id": 3, "condition": "poor", "status": "damaged"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": {
                "id": 9,
                "borrow_transaction_id": 42,
                "return_date": "2024-04-02",
                "items": [{"book_item_id": 3, "condition": "poor", "status": "damaged"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut form = return_form(&server).await;
    let ids: Vec<i64> = form.lines().iter().map(|l| l.book_item_id).collect();
    assert_eq!(ids, vec![1, 3]);

    form.toggle(0);
    form.set_condition(1, ItemCondition::Poor);
    form.set_status(1, Some(ItemStatus::Damaged));

    let transaction = form.submit(&services.transactions).await.unwrap();
    assert_eq!(transaction.id, 9);
    let remaining: Vec<i64> = form.lines().iter().map(|l| l.book_item_id).collect();
    assert_eq!(remaining, vec![1]);
    assert!(form.error_message().is_none());
    assert!(!form.is_submitting());
    assert_eq!(form.notices.drain()[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_return_submit_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/return-transactions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "message": "Item BK-0003 is not on loan"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/return-transactions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut form = return_form(&server).await;

    assert!(form.submit(&services.transactions).await.is_err());
    assert_eq!(form.error_message(), Some("Item BK-0003 is not on loan"));
    assert_eq!(form.lines().len(), 2);

    assert!(form.submit(&services.transactions).await.is_err());
    assert_eq!(form.error_message(), Some(returns::SUBMIT_FALLBACK));
    assert_eq!(form.lines().len(), 2);
}

#[tokio::test]
async fn test_book_detail_loads_master_and_copies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book-masters/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"id": 1, "title": "Laskar Pelangi", "author": "Andrea Hirata"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/book-items"))
        .and(query_param("book_master_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [item_json(1), item_json(2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut page = BookDetailPage::new(&services, &UiConfig::default());
    page.load(1).await;

    assert!(!page.loading);
    assert_eq!(page.master.as_ref().map(|m| m.title.as_str()), Some("Laskar Pelangi"));
    let codes: Vec<&str> = page.items.list.rows().iter().map(|i| i.code.as_str()).collect();
    assert_eq!(codes, vec!["BK-0001", "BK-0002"]);
    assert!(page.notices.is_empty());
}

#[tokio::test]
async fn test_book_detail_missing_book() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book-masters/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "Book not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/book-items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let services = services_for(&server);
    let mut page = BookDetailPage::new(&services, &UiConfig::default());
    page.load(99).await;

    assert!(page.master.is_none());
    assert!(!page.loading);
    let notices = page.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Book not found");
}
