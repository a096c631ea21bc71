#![allow(dead_code)]

use axum_test::TestServer;
use student_results::model::{student, Student};
use student_results::{apply_migrations, app, AppState, DatabaseConnection, ResolvedEntity};

pub struct TestApp {
    pub server: TestServer,
    pub db: DatabaseConnection,
    pub entity: ResolvedEntity,
}

/// Router over a fresh in-memory SQLite store with migrations applied.
pub async fn spawn(admin_auth: bool) -> TestApp {
    let db = DatabaseConnection::connect("sqlite::memory:", 1).await.unwrap();
    let model = student::registry().resolve().unwrap();
    apply_migrations(&db, &model).await.unwrap();
    let entity = model.entity_by_id(student::ENTITY_ID).unwrap().clone();
    let server = TestServer::new(app(AppState::new(db.clone(), model, admin_auth))).unwrap();
    TestApp { server, db, entity }
}

impl TestApp {
    pub async fn students(&self) -> Vec<Student> {
        Student::all(&self.db, &self.entity).await.unwrap()
    }
}

pub fn student_form(roll_no: &str, name: &str, branch: &str, marks: &str) -> Vec<(&'static str, String)> {
    vec![
        ("roll_no", roll_no.to_string()),
        ("name", name.to_string()),
        ("branch", branch.to_string()),
        ("marks", marks.to_string()),
    ]
}

/// Cell text of every `<tr class="{class}">` row, in document order.
pub fn table_rows(html: &str, class: &str) -> Vec<Vec<String>> {
    let marker = format!("<tr class=\"{}\">", class);
    html.split(marker.as_str())
        .skip(1)
        .map(|chunk| {
            let row = chunk.split("</tr>").next().unwrap_or_default();
            row.split("<td>")
                .skip(1)
                .map(|cell| cell.split("</td>").next().unwrap_or_default().trim().to_string())
                .collect()
        })
        .collect()
}
