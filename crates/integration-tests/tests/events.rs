//! Integration tests for the event approval workflow and listings.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::Value;

use campus_events_integration_tests::{
    ADMIN_EMAIL, FACULTY_EMAIL, STUDENT_EMAIL, TestApp, assert_status,
};

async fn get_json(client: &Client, url: String) -> Value {
    client.get(url).send().await.unwrap().json().await.unwrap()
}

fn titles(events: &Value) -> Vec<String> {
    events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_owned())
        .collect()
}

/// Create a Technical event with capacity 200 as the demo faculty member.
async fn create_event(app: &TestApp, faculty: &Client, title: &str) -> Value {
    let resp = faculty
        .post(app.url("/dashboard/faculty/events"))
        .form(&[
            ("title", title),
            ("description", "Hands-on robotics workshop"),
            ("date", "2030-04-10"),
            ("time", "2:00 PM"),
            ("location", "Lab 3"),
            ("category", "Technical"),
            ("capacity", "200"),
        ])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::CREATED);
    resp.json().await.unwrap()
}

async fn decide(app: &TestApp, admin: &Client, event_id: &str, status: &str) -> reqwest::Response {
    admin
        .post(app.url(&format!("/dashboard/admin/events/{event_id}/status")))
        .form(&[("status", status), ("comment", "Reviewed")])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_created_event_waits_for_approval() {
    let app = TestApp::spawn().await;
    let faculty = app.sign_in(FACULTY_EMAIL).await;
    let admin = app.sign_in(ADMIN_EMAIL).await;

    let event = create_event(&app, &faculty, "Robotics Workshop").await;
    assert_eq!(event["status"], "pending");
    assert_eq!(event["capacity"], 200);
    assert_eq!(event["category"], "Technical");
    assert_eq!(event["price"], "Free");
    assert_eq!(event["organizer_name"], "Jane Faculty");
    assert!(event["created_at"].is_string());
    let id = event["id"].as_str().unwrap();

    let dashboard = get_json(&faculty, app.url("/dashboard/faculty")).await;
    assert!(titles(&dashboard["events"]).contains(&"Robotics Workshop".to_owned()));
    assert_eq!(dashboard["counts"]["pending"], 1);

    let pending = get_json(&admin, app.url("/dashboard/admin/events?status=pending")).await;
    assert!(titles(&pending).contains(&"Robotics Workshop".to_owned()));

    let public = get_json(&TestApp::client(), app.url("/events")).await;
    assert!(!titles(&public["events"]).contains(&"Robotics Workshop".to_owned()));

    // Hidden from the public until approved, visible to its organizer
    let resp = TestApp::client()
        .get(app.url(&format!("/events/{id}")))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::NOT_FOUND);
    let resp = faculty
        .get(app.url(&format!("/events/{id}")))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::OK);
}

#[tokio::test]
async fn test_approve_then_reject() {
    let app = TestApp::spawn().await;
    let faculty = app.sign_in(FACULTY_EMAIL).await;
    let admin = app.sign_in(ADMIN_EMAIL).await;

    let event = create_event(&app, &faculty, "Robotics Workshop").await;
    let id = event["id"].as_str().unwrap();

    let resp = decide(&app, &admin, id, "approved").await;
    assert_status(&resp, StatusCode::OK);
    let approved: Value = resp.json().await.unwrap();
    assert_eq!(approved["status"], "approved");

    let public = get_json(&TestApp::client(), app.url("/events")).await;
    assert!(titles(&public["events"]).contains(&"Robotics Workshop".to_owned()));

    let resp = decide(&app, &admin, id, "rejected").await;
    assert_status(&resp, StatusCode::OK);

    let public = get_json(&TestApp::client(), app.url("/events")).await;
    assert!(!titles(&public["events"]).contains(&"Robotics Workshop".to_owned()));

    let trail = get_json(
        &admin,
        app.url(&format!("/dashboard/admin/events/{id}/approvals")),
    )
    .await;
    let statuses: Vec<&str> = trail
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, ["pending", "approved", "rejected"]);
    assert_eq!(trail[2]["comment"], "Reviewed");
}

#[tokio::test]
async fn test_nothing_returns_to_pending() {
    let app = TestApp::spawn().await;
    let faculty = app.sign_in(FACULTY_EMAIL).await;
    let admin = app.sign_in(ADMIN_EMAIL).await;

    let event = create_event(&app, &faculty, "Robotics Workshop").await;
    let id = event["id"].as_str().unwrap();
    assert_status(&decide(&app, &admin, id, "approved").await, StatusCode::OK);

    let resp = decide(&app, &admin, id, "pending").await;
    assert_status(&resp, StatusCode::CONFLICT);

    // Re-applying the current decision is accepted
    let resp = decide(&app, &admin, id, "approved").await;
    assert_status(&resp, StatusCode::OK);
}

#[tokio::test]
async fn test_only_admins_decide() {
    let app = TestApp::spawn().await;
    let faculty = app.sign_in(FACULTY_EMAIL).await;

    let event = create_event(&app, &faculty, "Robotics Workshop").await;
    let id = event["id"].as_str().unwrap();

    let resp = decide(&app, &faculty, id, "approved").await;
    assert!(resp.status().is_redirection());

    let event = get_json(&faculty, app.url(&format!("/events/{id}"))).await;
    assert_eq!(event["status"], "pending");
}

#[tokio::test]
async fn test_faculty_edits_only_own_events() {
    let app = TestApp::spawn().await;
    let faculty = app.sign_in(FACULTY_EMAIL).await;

    let event = create_event(&app, &faculty, "Robotics Workshop").await;
    let id = event["id"].as_str().unwrap();

    let updated: Value = faculty
        .post(app.url(&format!("/dashboard/faculty/events/{id}")))
        .form(&[("location", "Lab 4"), ("capacity", "150")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["location"], "Lab 4");
    assert_eq!(updated["capacity"], 150);
    assert_eq!(updated["status"], "pending");

    // Another faculty member may not touch it
    let resp = TestApp::client()
        .post(app.url("/signup"))
        .form(&[
            ("email", "other.faculty@example.com"),
            ("password", "longenough"),
            ("name", "Other Faculty"),
            ("role", "faculty"),
            ("contact", "9000000002"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    let other = app
        .sign_in_with("other.faculty@example.com", "longenough")
        .await;

    let resp = other
        .post(app.url(&format!("/dashboard/faculty/events/{id}")))
        .form(&[("location", "Elsewhere")])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::FORBIDDEN);

    let resp = other
        .get(app.url(&format!("/dashboard/faculty/events/{id}/registrations")))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::FORBIDDEN);

    let resp = faculty
        .post(app.url(&format!("/dashboard/faculty/events/{id}")))
        .form(&[("capacity", "0")])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["field"], "capacity");
}

#[tokio::test]
async fn test_admin_edits_and_inspects_any_event() {
    let app = TestApp::spawn().await;
    let faculty = app.sign_in(FACULTY_EMAIL).await;
    let admin = app.sign_in(ADMIN_EMAIL).await;
    let student = app.sign_in(STUDENT_EMAIL).await;

    let event = create_event(&app, &faculty, "Robotics Workshop").await;
    let id = event["id"].as_str().unwrap();

    let resp = admin
        .post(app.url(&format!("/dashboard/admin/events/{id}")))
        .form(&[("capacity", "150"), ("location", "Lab 4")])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["capacity"], 150);
    assert_eq!(updated["location"], "Lab 4");
    assert_eq!(updated["status"], "pending");

    let resp = student
        .post(app.url(&format!("/dashboard/admin/events/{id}")))
        .form(&[("capacity", "1")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());

    let seeded = app.approved_event_id("Career Fair").await;
    let resp = student
        .post(app.url(&format!("/events/register/{seeded}")))
        .form(&[
            ("name", "John Student"),
            ("email", STUDENT_EMAIL),
            ("phone", "9876543210"),
            ("roll_number", "CS2023-042"),
            ("department", "Computer Science"),
            ("year", "Third Year"),
            ("accept_terms", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::CREATED);

    let registrations = get_json(
        &admin,
        app.url(&format!("/dashboard/admin/events/{seeded}/registrations")),
    )
    .await;
    let registrations = registrations.as_array().unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0]["roll_number"], "CS2023-042");
}

#[tokio::test]
async fn test_delete_cascades_registrations() {
    let app = TestApp::spawn().await;
    let admin = app.sign_in(ADMIN_EMAIL).await;
    let student = app.sign_in(STUDENT_EMAIL).await;

    let id = app.approved_event_id("Tech Symposium 2025").await;
    let resp = student
        .post(app.url(&format!("/events/register/{id}")))
        .form(&[
            ("name", "John Student"),
            ("email", STUDENT_EMAIL),
            ("phone", "9876543210"),
            ("roll_number", "CS2023-042"),
            ("department", "Computer Science"),
            ("year", "Third Year"),
            ("accept_terms", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::CREATED);

    let resp = admin
        .delete(app.url(&format!("/dashboard/admin/events/{id}")))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::NO_CONTENT);

    let all = get_json(&admin, app.url("/dashboard/admin/events")).await;
    assert!(!titles(&all).contains(&"Tech Symposium 2025".to_owned()));

    let registered = get_json(&student, app.url("/events/registered")).await;
    assert!(registered.as_array().unwrap().is_empty());

    let resp = admin
        .delete(app.url(&format!("/dashboard/admin/events/{id}")))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_browse_filters() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    let all = get_json(&client, app.url("/events")).await;
    assert_eq!(all["events"].as_array().unwrap().len(), 3);

    let cultural = get_json(&client, app.url("/events?category=Cultural")).await;
    assert_eq!(titles(&cultural["events"]), ["Cultural Fest"]);

    let everything = get_json(&client, app.url("/events?category=All%20Events")).await;
    assert_eq!(everything["events"].as_array().unwrap().len(), 3);

    let search = get_json(&client, app.url("/events?q=EMPLOYERS")).await;
    assert_eq!(titles(&search["events"]), ["Career Fair"]);

    let paid = &cultural["events"][0];
    assert!(paid["tags"].as_array().unwrap().iter().all(|t| t != "Free"));
}

#[tokio::test]
async fn test_reset_empties_the_store() {
    let app = TestApp::spawn().await;
    app.store.reset().await;

    let all = get_json(&TestApp::client(), app.url("/events")).await;
    assert!(all["events"].as_array().unwrap().is_empty());

    // Demo accounts are gone too
    let resp = TestApp::client()
        .post(app.url("/login"))
        .form(&[("email", STUDENT_EMAIL), ("password", "password")])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::UNAUTHORIZED);
}
