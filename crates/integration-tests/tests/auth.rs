//! Integration tests for sign-in, sign-up, sign-out and the role guard.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;

use campus_events_integration_tests::{
    ADMIN_EMAIL, FACULTY_EMAIL, STUDENT_EMAIL, TestApp, assert_redirects_to, assert_status,
    location,
};

#[tokio::test]
async fn test_unauthenticated_dashboard_redirects_to_login() {
    let app = TestApp::spawn().await;
    let client = TestApp::client();

    for path in ["/dashboard/admin", "/dashboard/faculty", "/dashboard/student"] {
        let resp = client.get(app.url(path)).send().await.unwrap();
        assert_redirects_to(&resp, "/login");
    }
}

#[tokio::test]
async fn test_wrong_role_redirects_home() {
    let app = TestApp::spawn().await;
    let student = app.sign_in(STUDENT_EMAIL).await;

    let resp = student
        .get(app.url("/dashboard/admin"))
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/");

    let resp = student
        .get(app.url("/dashboard/faculty"))
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/");

    let resp = student
        .get(app.url("/dashboard/student"))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::OK);
}

#[tokio::test]
async fn test_login_redirects_to_role_dashboard() {
    let app = TestApp::spawn().await;

    for (email, dashboard) in [
        (STUDENT_EMAIL, "/dashboard/student"),
        (FACULTY_EMAIL, "/dashboard/faculty"),
        (ADMIN_EMAIL, "/dashboard/admin"),
    ] {
        let resp = TestApp::client()
            .post(app.url("/login"))
            .form(&[("email", email), ("password", "password")])
            .send()
            .await
            .unwrap();
        assert_redirects_to(&resp, dashboard);
    }
}

#[tokio::test]
async fn test_login_follows_local_return_to_only() {
    let app = TestApp::spawn().await;

    let resp = TestApp::client()
        .post(app.url("/login"))
        .form(&[
            ("email", STUDENT_EMAIL),
            ("password", "password"),
            ("return_to", "/events/registered"),
        ])
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/events/registered");

    let resp = TestApp::client()
        .post(app.url("/login"))
        .form(&[
            ("email", STUDENT_EMAIL),
            ("password", "password"),
            ("return_to", "//evil.example.com"),
        ])
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/dashboard/student");
}

#[tokio::test]
async fn test_bad_credentials_rejected() {
    let app = TestApp::spawn().await;

    let resp = TestApp::client()
        .post(app.url("/login"))
        .form(&[("email", STUDENT_EMAIL), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email or password");

    let resp = TestApp::client()
        .post(app.url("/login"))
        .form(&[("email", "nobody@example.com"), ("password", "password")])
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_twice_leaves_no_session() {
    let app = TestApp::spawn().await;
    let client = app.sign_in(ADMIN_EMAIL).await;

    let session: Value = client
        .get(app.url("/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["is_authenticated"], true);
    assert_eq!(session["role"], "admin");

    for _ in 0..2 {
        let resp = client.post(app.url("/logout")).send().await.unwrap();
        assert_redirects_to(&resp, "/");
    }

    let session: Value = client
        .get(app.url("/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["is_authenticated"], false);
    assert_eq!(session["is_loading"], false);
    assert!(session["role"].is_null());

    let resp = client
        .get(app.url("/dashboard/admin"))
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/login");
}

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let app = TestApp::spawn().await;

    let resp = TestApp::client()
        .post(app.url("/signup"))
        .form(&[
            ("email", "new.student@example.com"),
            ("password", "longenough"),
            ("name", "New Student"),
            ("role", "student"),
            ("contact", "9000000000"),
            ("department", "Physics"),
            ("year", "First Year"),
        ])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert!(location(&resp).unwrap().starts_with("/login?message="));

    let client = app
        .sign_in_with("new.student@example.com", "longenough")
        .await;
    let profile: Value = client
        .get(app.url("/profile"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["name"], "New Student");
    assert_eq!(profile["role"], "student");
    assert_eq!(profile["department"], "Physics");
}

#[tokio::test]
async fn test_sign_up_rejections() {
    let app = TestApp::spawn().await;
    let signup = |email: &'static str, password: &'static str, role: &'static str| {
        let url = app.url("/signup");
        async move {
            TestApp::client()
                .post(url)
                .form(&[
                    ("email", email),
                    ("password", password),
                    ("name", "Someone"),
                    ("role", role),
                    ("contact", "9000000001"),
                ])
                .send()
                .await
                .unwrap()
        }
    };

    let resp = signup(STUDENT_EMAIL, "longenough", "student").await;
    assert_status(&resp, StatusCode::CONFLICT);

    let resp = signup("short@example.com", "short", "student").await;
    assert_status(&resp, StatusCode::BAD_REQUEST);

    let resp = signup("not-an-email", "longenough", "faculty").await;
    assert_status(&resp, StatusCode::BAD_REQUEST);

    let resp = signup("boss@example.com", "longenough", "admin").await;
    assert_status(&resp, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_cannot_be_self_promoted() {
    let app = TestApp::spawn().await;
    let student = app.sign_in(STUDENT_EMAIL).await;

    let profile: Value = student
        .post(app.url("/profile"))
        .form(&[("contact", "9111111111"), ("role", "admin")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["contact"], "9111111111");
    assert_eq!(profile["role"], "student");

    let resp = student
        .get(app.url("/dashboard/admin"))
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/");
}

#[tokio::test]
async fn test_unknown_path_redirects_home() {
    let app = TestApp::spawn().await;

    let resp = TestApp::client()
        .get(app.url("/no/such/page"))
        .send()
        .await
        .unwrap();
    assert_redirects_to(&resp, "/");

    let resp = TestApp::client().get(app.url("/health")).send().await.unwrap();
    assert_status(&resp, StatusCode::OK);
    let resp = TestApp::client()
        .get(app.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_status(&resp, StatusCode::OK);
}
