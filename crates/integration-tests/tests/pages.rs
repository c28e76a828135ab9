//! Static pages, contact form and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use takshashil_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_home_page() {
    let mut app = TestApp::new();
    let page = app.get("/").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Books Available"));
    assert!(page.body.contains("Dr. B.R. Ambedkar"));
    assert!(page.body.contains("Ambedkar Portrait T-Shirt"));
}

#[tokio::test]
async fn test_content_pages() {
    let mut app = TestApp::new();
    for (path, heading) in [
        ("/about", "About Takshashil Foundation"),
        ("/education", "Education Programs"),
        ("/volunteer", "Become a Volunteer"),
    ] {
        let page = app.get(path).await;
        assert_eq!(page.status, StatusCode::OK, "{path}");
        assert!(page.body.contains(heading), "{path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut app = TestApp::new();
    let response = app.get("/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_stylesheet() {
    let mut app = TestApp::new();
    let response = app.get("/static/css/main.css").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("--blue"));
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let mut app = TestApp::new();
    let response = app.get("/").await;

    assert!(
        response
            .header("content-security-policy")
            .unwrap()
            .contains("default-src 'none'")
    );
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_contact_form_validation() {
    let mut app = TestApp::new();
    let response = app
        .post_form("/contact", &[("first_name", "Asha"), ("email", "asha@")])
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Last name is required."));
    assert!(response.body.contains("Please enter a valid email."));
    assert!(response.body.contains("Message is required."));
}

#[tokio::test]
async fn test_contact_form_success() {
    let mut app = TestApp::new();
    let page = app
        .submit(
            "/contact",
            &[
                ("first_name", "Asha"),
                ("last_name", "Rao"),
                ("email", "asha@example.org"),
                ("subject", "Library hours"),
                ("message", "Are you open on Sundays?"),
            ],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Thank you for contacting us. We will get back to you soon."));
    // The form comes back empty.
    assert!(!page.body.contains("Library hours"));
}

#[tokio::test]
async fn test_volunteer_page_has_application_form() {
    let mut app = TestApp::new();
    let page = app.get("/volunteer").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("action=\"/volunteer\""));
    assert!(page.body.contains("Select your preferred role"));
    assert!(page.body.contains("Both Weekdays and Weekends"));
    assert!(page.body.contains("Be Educated, Be Organized, Be Agitated."));

    // Other content pages carry no form.
    let about = app.get("/about").await;
    assert!(!about.body.contains("action=\"/volunteer\""));
}

#[tokio::test]
async fn test_volunteer_form_validation_keeps_input() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/volunteer",
            &[
                ("first_name", "Priya"),
                ("email", "priya@example.org"),
                ("role", "mentor"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Last name is required."));
    assert!(response.body.contains("Please select your availability."));
    assert!(response.body.contains("value=\"mentor\" selected"));
    assert!(response.body.contains("Become a Volunteer"));
}

#[tokio::test]
async fn test_volunteer_application_success() {
    let mut app = TestApp::new();
    let page = app
        .submit(
            "/volunteer",
            &[
                ("first_name", "Rahul"),
                ("last_name", "Patel"),
                ("email", "rahul@example.org"),
                ("phone", "+91 98765 43210"),
                ("role", "library"),
                ("availability", "weekends"),
                ("message", "I love organising books."),
            ],
        )
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Thank you for applying to volunteer. Our team will contact you soon."));
    assert!(!page.body.contains("I love organising books."));
}
