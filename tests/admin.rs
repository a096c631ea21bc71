mod common;

use axum::http::{header, HeaderValue, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{spawn, student_form, table_rows};
use student_results::auth::create_superuser;

fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn add_redirects_to_changelist() {
    let app = spawn(false).await;
    let response = app
        .server
        .post("/admin/students/add")
        .form(&student_form("CS101", "Asha Rao", "CSE", "87"))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/students/");

    let html = app.server.get("/admin/students/").await.text();
    assert_eq!(table_rows(&html, "record-row"), vec![vec!["CS101", "Asha Rao", "CSE", "87"]]);
    assert!(html.contains("1 student"));
}

#[tokio::test]
async fn duplicate_roll_no_is_rejected_inline() {
    let app = spawn(false).await;
    app.server
        .post("/admin/students/add")
        .form(&student_form("CS101", "Asha Rao", "CSE", "87"))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = app
        .server
        .post("/admin/students/add")
        .form(&student_form("CS101", "Other", "ME", "40"))
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Student with this Roll no already exists."));
    assert!(html.contains("value=\"Other\""));

    let students = app.students().await;
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "Asha Rao");
}

#[tokio::test]
async fn validation_messages_leave_store_untouched() {
    let app = spawn(false).await;
    let response = app
        .server
        .post("/admin/students/add")
        .form(&student_form("CS10123456X", "", "CSE", "eighty"))
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Ensure this value has at most 10 characters (it has 11)."));
    assert!(html.contains("This field is required."));
    assert!(html.contains("Enter a whole number."));
    assert!(app.students().await.is_empty());
}

#[tokio::test]
async fn negative_marks_are_accepted() {
    let app = spawn(false).await;
    app.server
        .post("/admin/students/add")
        .form(&student_form("N1", "Neg", "CSE", "-5"))
        .await
        .assert_status(StatusCode::SEE_OTHER);
    assert_eq!(app.students().await[0].marks, -5);
}

#[tokio::test]
async fn change_keeps_own_roll_no() {
    let app = spawn(false).await;
    app.server
        .post("/admin/students/add")
        .form(&student_form("CS101", "Asha Rao", "CSE", "87"))
        .await;
    let id = app.students().await[0].id;

    let form = app.server.get(&format!("/admin/students/{}/change", id)).await;
    form.assert_status_ok();
    assert!(form.text().contains("value=\"Asha Rao\""));

    let response = app
        .server
        .post(&format!("/admin/students/{}/change", id))
        .form(&student_form("CS101", "Asha R.", "CSE", "90"))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let students = app.students().await;
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "Asha R.");
    assert_eq!(students[0].marks, 90);
}

#[tokio::test]
async fn change_to_taken_roll_no_is_rejected() {
    let app = spawn(false).await;
    for (roll, name) in [("A1", "Arun"), ("B2", "Bela")] {
        app.server
            .post("/admin/students/add")
            .form(&student_form(roll, name, "CSE", "50"))
            .await;
    }
    let bela = app.students().await[1].id;
    let response = app
        .server
        .post(&format!("/admin/students/{}/change", bela))
        .form(&student_form("A1", "Bela", "CSE", "50"))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Student with this Roll no already exists."));
    assert_eq!(app.students().await[1].roll_no, "B2");
}

#[tokio::test]
async fn delete_removes_row_from_listing() {
    let app = spawn(false).await;
    app.server
        .post("/admin/students/add")
        .form(&student_form("CS101", "Asha Rao", "CSE", "87"))
        .await;
    let id = app.students().await[0].id;

    let confirm = app.server.get(&format!("/admin/students/{}/delete", id)).await;
    confirm.assert_status_ok();
    assert!(confirm.text().contains("Asha Rao"));

    let response = app.server.post(&format!("/admin/students/{}/delete", id)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/students/");

    let html = app.server.get("/").await.text();
    assert!(table_rows(&html, "student-row").is_empty());
    app.server
        .post(&format!("/admin/students/{}/delete", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_entity_and_row_are_not_found() {
    let app = spawn(false).await;
    app.server.get("/admin/teachers/").await.assert_status(StatusCode::NOT_FOUND);
    app.server.get("/admin/students/42/change").await.assert_status(StatusCode::NOT_FOUND);
    app.server
        .post("/admin/students/42/change")
        .form(&student_form("Z9", "Zed", "CSE", "1"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(app.students().await.is_empty());
}

#[tokio::test]
async fn malformed_ids_are_not_found_pages() {
    let app = spawn(false).await;
    for path in [
        "/admin/students/abc/change",
        "/admin/students/99999999999999999999/delete",
        "/admin/students/1.5/change",
    ] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"), "{} served {}", path, content_type);
    }
    app.server
        .post("/admin/students/abc/change")
        .form(&student_form("Z9", "Zed", "CSE", "1"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .post("/admin/students/99999999999999999999/delete")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(app.students().await.is_empty());
}

#[tokio::test]
async fn index_lists_entities_with_counts() {
    let app = spawn(false).await;
    let html = app.server.get("/admin/").await.text();
    assert!(html.contains("/admin/students/"));
    assert!(html.contains("Students"));
    app.server.get("/admin").await.assert_status_ok();
    app.server.get("/admin/students").await.assert_status_ok();
    app.server.get("/admin/students/add").await.assert_status_ok();
}

#[tokio::test]
async fn admin_requires_credentials_when_enabled() {
    let app = spawn(true).await;
    create_superuser(&app.db, "admin", "correct-horse").await.unwrap();

    let response = app.server.get("/admin/").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let bad = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode("admin:wrong-horse"))).unwrap();
    app.server
        .get("/admin/")
        .add_header(header::AUTHORIZATION, bad)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let good = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode("admin:correct-horse"))).unwrap();
    let response = app.server.get("/admin/").add_header(header::AUTHORIZATION, good).await;
    response.assert_status_ok();
    assert!(response.text().contains("Signed in as admin"));

    app.server.get("/").await.assert_status_ok();
}
