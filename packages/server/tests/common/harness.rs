//! Test harness for driving the HTTP surface in-process.
//!
//! Every harness owns a fresh temporary data root laid out like production
//! (`advisory/`, `reference/`, `templates/`) and a router wired to a `MockAI`.
//! Requests go straight through `tower::ServiceExt::oneshot`; no socket is bound.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tower::ServiceExt;

use server_core::config::AdvisoryFolders;
use server_core::domains::advisory::MemoryExtractionCache;
use server_core::kernel::test_dependencies::{sample_record, MockAI};
use server_core::kernel::{ServerDeps, TestDependencies};
use server_core::server::build_app;

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let response = ctx.get("/health").await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestHarness {
    /// Folders under the temporary root
    pub folders: AdvisoryFolders,
    /// The mock model, for call assertions
    pub ai: Arc<MockAI>,
    /// The extraction cache, for direct inspection
    pub cache: Arc<MemoryExtractionCache>,
    pub deps: Arc<ServerDeps>,
    app: Router,
    // Removed on drop
    _root: TempDir,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        let deps = TestDependencies::new().mock_ai(MockAI::new().with_default_record(&sample_record(1)));
        Self::with_dependencies(deps)
            .await
            .expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Temporary folders are removed on drop
    }
}

impl TestHarness {
    /// Build a harness around explicit test dependencies.
    pub async fn with_dependencies(deps: TestDependencies) -> Result<Self> {
        let root = tempfile::tempdir().context("Failed to create temporary data root")?;
        let folders = AdvisoryFolders::under(root.path());
        tokio::fs::create_dir_all(&folders.documents)
            .await
            .context("Failed to create documents folder")?;

        let ai = deps.ai.clone();
        let cache = deps.cache.clone();
        let deps = Arc::new(deps.into_server_deps(folders.clone()));

        Ok(Self {
            app: build_app(deps.clone()),
            folders,
            ai,
            cache,
            deps,
            _root: root,
        })
    }

    /// Shorthand for a harness whose model answers from `ai`.
    pub async fn with_mock_ai(ai: MockAI) -> Result<Self> {
        Self::with_dependencies(TestDependencies::new().mock_ai(ai)).await
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router should be infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Body::empty(), None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Body::empty(), None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Body::from(body.to_string()), Some("application/json"))
            .await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Body::from(body.to_string()), Some("application/json"))
            .await
    }

    /// POST a multipart form made of named binary parts.
    pub async fn post_multipart(&self, uri: &str, parts: &[(&str, &[u8])]) -> TestResponse {
        const BOUNDARY: &str = "advisory-test-boundary";

        let mut body = Vec::new();
        for (name, bytes) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        self.send(Method::POST, uri, Body::from(body), Some(&content_type))
            .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        content_type: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(body).expect("Failed to build request");
        self.request(request).await
    }
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Response is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
