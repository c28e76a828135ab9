//! Integration tests for the Takshashil Foundation site.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p takshashil-integration-tests
//! ```
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`,
//! so no listener or network is involved. [`TestApp`] carries the session
//! cookie between requests the way a browser would.
//!
//! # Test Categories
//!
//! - `shop_flow` - Cart, checkout and order reset in both shops
//! - `donation_flow` - Donation validation, receipt and certificate download
//! - `library_catalog` - Book listing, search and catalog download
//! - `pages` - Static pages, contact form and security headers

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use takshashil_storefront::config::StorefrontConfig;
use takshashil_storefront::state::AppState;
use tower::ServiceExt;

/// Largest response body the helpers will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for tests: no simulated latency and no rate limiting.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        simulated_latency: Duration::ZERO,
        rate_limit_enabled: false,
        ..StorefrontConfig::default()
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A response header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The site router plus one browser's session cookie.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// App with [`test_config`].
    ///
    /// # Panics
    ///
    /// Panics if the embedded datasets or content pages fail to load.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// App with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded datasets or content pages fail to load.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config, &takshashil_storefront::content_dir())
            .unwrap_or_else(|e| panic!("failed to build app state: {e}"));
        Self {
            router: takshashil_storefront::router(state),
            cookie: None,
        }
    }

    /// A second browser sharing the same server.
    #[must_use]
    pub fn fresh_session(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Another tab of the same browser: shares the session cookie.
    #[must_use]
    pub fn same_session(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
        }
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty());
        self.send(request).await
    }

    /// Send a urlencoded form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request).await
    }

    /// POST a form, then follow the redirect like a browser.
    ///
    /// # Panics
    ///
    /// Panics if the POST does not redirect.
    pub async fn submit(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let response = self.post_form(path, fields).await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "POST {path} did not redirect: {}",
            response.body
        );
        let location = response
            .location()
            .unwrap_or_else(|| panic!("POST {path} redirected without a location"))
            .to_string();
        self.get(&location).await
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(
        &mut self,
        request: Result<Request<Body>, axum::http::Error>,
    ) -> TestResponse {
        let request = request.unwrap_or_else(|e| panic!("invalid request: {e}"));
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| panic!("router error: {e}"));

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
