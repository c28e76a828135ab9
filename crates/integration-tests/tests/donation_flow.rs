//! Donations, receipts and one-shot certificate downloads.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use takshashil_integration_tests::{TestApp, test_config};
use uuid::Uuid;

/// Pull the download token out of a receipt page.
fn download_token(body: &str) -> Uuid {
    let (_, rest) = body.split_once("/downloads/").unwrap();
    Uuid::parse_str(rest.get(..36).unwrap()).unwrap()
}

#[tokio::test]
async fn test_donation_form_renders() {
    let mut app = TestApp::new();
    let page = app.get("/donate").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Credit Card"));
    assert!(page.body.contains("Debit Card"));
    assert!(page.body.contains("UPI"));
    assert!(page.body.contains("value=\"credit\" checked"));
}

#[tokio::test]
async fn test_invalid_donation_shows_field_errors() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/donate",
            &[
                ("name", "A"),
                ("email", ""),
                ("amount", "0"),
                ("payment_method", "upi"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Name must be at least 2 characters."));
    assert!(response.body.contains("Email is required."));
    assert!(response.body.contains("Amount must be a whole number of at least 1."));
    // The chosen method survives the re-render.
    assert!(response.body.contains("value=\"upi\" checked"));
}

#[tokio::test]
async fn test_unknown_payment_method_is_rejected() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/donate",
            &[
                ("name", "Asha Rao"),
                ("email", "asha@example.org"),
                ("amount", "500"),
                ("payment_method", "cheque"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please select a payment method."));
}

#[tokio::test]
async fn test_donation_issues_certificate_once() {
    let mut app = TestApp::new();
    let receipt = app
        .submit(
            "/donate",
            &[
                ("name", "Asha Rao"),
                ("email", "asha@example.org"),
                ("amount", "2500"),
                ("payment_method", "debit"),
            ],
        )
        .await;

    assert_eq!(receipt.status, StatusCode::OK);
    assert!(receipt.body.contains("Donation successful! Thank you for your generosity."));
    assert!(receipt.body.contains("Asha Rao"));
    assert!(receipt.body.contains("₹2,500"));
    assert!(receipt.body.contains("Debit Card"));
    assert!(receipt.body.contains("TF-"));

    let token = download_token(&receipt.body);
    let certificate = app.get(&format!("/downloads/{token}")).await;
    assert_eq!(certificate.status, StatusCode::OK);
    assert_eq!(
        certificate.header("content-type"),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(
        certificate.header("content-disposition"),
        Some("attachment; filename=\"Takshashil_Foundation_Donation_Certificate_Asha_Rao.html\"")
    );
    assert!(certificate.body.contains("Certificate of Donation"));
    assert!(certificate.body.contains("Asha Rao"));
    assert!(certificate.body.contains("₹2,500"));

    // Tokens are single use.
    let again = app.get(&format!("/downloads/{token}")).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    // The receipt is shown once; the next visit gets a fresh form.
    let page = app.get("/donate").await;
    assert!(page.body.contains("Donate Now"));
}

#[tokio::test]
async fn test_donor_name_is_escaped_in_certificate() {
    let mut app = TestApp::new();
    let receipt = app
        .submit(
            "/donate",
            &[
                ("name", "<script>alert(1)</script>"),
                ("email", "x@example.org"),
                ("amount", "10"),
                ("payment_method", "credit"),
            ],
        )
        .await;
    assert!(!receipt.body.contains("<script>"));

    let token = download_token(&receipt.body);
    let certificate = app.get(&format!("/downloads/{token}")).await;
    assert!(!certificate.body.contains("<script>"));
}

#[tokio::test]
async fn test_unknown_downloads_are_not_found() {
    let mut app = TestApp::new();

    let response = app.get("/downloads/not-a-token").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get(&format!("/downloads/{}", Uuid::new_v4())).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unclaimed_certificate_expires() {
    let mut app = TestApp::with_config(takshashil_storefront::config::StorefrontConfig {
        download_ttl: Duration::from_millis(50),
        ..test_config()
    });
    let receipt = app
        .submit(
            "/donate",
            &[
                ("name", "Ravi Kumar"),
                ("email", "ravi@example.org"),
                ("amount", "100"),
                ("payment_method", "credit"),
            ],
        )
        .await;
    let token = download_token(&receipt.body);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let response = app.get(&format!("/downloads/{token}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
