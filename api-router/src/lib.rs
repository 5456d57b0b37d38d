use api_state::ApiState;
use axum::{extract::FromRef, middleware::from_fn_with_state, routing::get, Router};
use middleware_cors::cors;
use routes::{
    documents::{get_document, list_documents},
    languages::list_languages,
    probes::{live, ready},
    search::search,
};

pub mod api_state;
pub mod error;
mod middleware_cors;
mod routes;

/// Router for the documentation API. Mount it under `/api`.
pub fn api_routes<S>(app_state: &ApiState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Probes
    let probes = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    let documents = Router::new()
        .route("/languages", get(list_languages))
        .route("/languages/{language}/search", get(search))
        .route("/languages/{language}/{doc_type}", get(list_documents))
        .route(
            "/languages/{language}/{doc_type}/{doc_id}",
            get(get_document),
        );

    probes
        .merge(documents)
        .layer(from_fn_with_state(app_state.clone(), cors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use common::utils::config::AppConfig;
    use serde_json::Value;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const GETTING_STARTED: &str = "---\nid: getting-started\ntitle: Getting Started\ntype: basics\nlanguage: go\norder: 1\n---\nIntro text.\n";

    struct TestApp {
        _dir: TempDir,
        state: ApiState,
        router: Router,
    }

    fn write(root: &Path, relative: &str, raw: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dirs");
        }
        std::fs::write(path, raw).expect("write file");
    }

    fn app_with(files: &[(&str, &str)]) -> TestApp {
        let dir = TempDir::new().expect("temp dir");
        for (relative, raw) in files {
            write(dir.path(), relative, raw);
        }
        let config = AppConfig {
            data_dir: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        let state = ApiState::new(&config).expect("state");
        let router = Router::new()
            .nest("/api", api_routes(&state))
            .with_state(state.clone());
        TestApp {
            _dir: dir,
            state,
            router,
        }
    }

    async fn send(app: &TestApp, method: Method, uri: &str) -> Response {
        app.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).expect("json body")
    }

    #[tokio::test]
    async fn test_get_document_returns_exact_record() {
        let app = app_with(&[("go/basics/getting-started.md", GETTING_STARTED)]);

        let response = send(&app, Method::GET, "/api/languages/go/basics/getting-started").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            body_text(response).await,
            r#"{"id":"getting-started","title":"Getting Started","type":"basics","language":"go","order":1,"content":"Intro text."}"#
        );
    }

    #[tokio::test]
    async fn test_missing_document_is_404_naming_the_id() {
        let app = app_with(&[("go/basics/getting-started.md", GETTING_STARTED)]);

        let response = send(&app, Method::GET, "/api/languages/go/basics/missing-doc").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("missing-doc"));
    }

    #[tokio::test]
    async fn test_malformed_document_is_also_404() {
        let app = app_with(&[("go/basics/broken.md", "no header")]);

        let response = send(&app, Method::GET, "/api/languages/go/basics/broken").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_repeated_get_reads_file_once() {
        let app = app_with(&[("go/basics/getting-started.md", GETTING_STARTED)]);
        let uri = "/api/languages/go/basics/getting-started";

        let first = body_text(send(&app, Method::GET, uri).await).await;
        let second = body_text(send(&app, Method::GET, uri).await).await;

        assert_eq!(first, second);
        assert_eq!(app.state.cache.load_count(), 1);
    }

    #[tokio::test]
    async fn test_list_languages_is_lexicographic() {
        let app = app_with(&[
            ("python/basics/intro.md", GETTING_STARTED),
            ("go/basics/getting-started.md", GETTING_STARTED),
        ]);

        let response = send(&app, Method::GET, "/api/languages").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!(["go", "python"]));
    }

    #[tokio::test]
    async fn test_list_documents_sorted_by_order() {
        let app = app_with(&[
            (
                "go/basics/variables.md",
                "---\nid: variables\ntitle: Variables and Types\norder: 2\n---\nVars.",
            ),
            ("go/basics/getting-started.md", GETTING_STARTED),
        ]);

        let response = send(&app, Method::GET, "/api/languages/go/basics").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let ids: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|doc| doc["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["getting-started", "variables"]);
        assert_eq!(body[1]["type"], "basics");
        assert_eq!(body[1]["language"], "go");
    }

    #[tokio::test]
    async fn test_list_documents_keeps_other_scopes_cached() {
        let app = app_with(&[
            ("go/basics/getting-started.md", GETTING_STARTED),
            ("go/packages/fmt.md", "---\ntitle: fmt\nfunctionCount: 25\n---\nfmt docs"),
        ]);

        send(&app, Method::GET, "/api/languages/go/packages/fmt").await;
        let loads = app.state.cache.load_count();
        send(&app, Method::GET, "/api/languages/go/basics").await;
        let response = send(&app, Method::GET, "/api/languages/go/packages/fmt").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["functionCount"], 25);
        // Only the basics listing touched the disk.
        assert_eq!(app.state.cache.load_count(), loads + 1);
    }

    #[tokio::test]
    async fn test_list_failure_is_500_naming_the_path() {
        let app = app_with(&[("go/basics/bad.md", "---\norder: first\n---\nbody")]);

        let response = send(&app, Method::GET, "/api/languages/go/basics").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("bad.md"));
    }

    #[tokio::test]
    async fn test_list_of_unknown_scope_is_500() {
        let app = app_with(&[("go/basics/getting-started.md", GETTING_STARTED)]);

        let response = send(&app, Method::GET, "/api/languages/go/nowhere").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_segment_is_400() {
        let app = app_with(&[]);

        let response = send(&app, Method::GET, "/api/languages/go/basics/.secret").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preflight_is_204_with_cors_headers() {
        let app = app_with(&[]);

        let response = send(&app, Method::OPTIONS, "/api/languages").await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3500")
        );
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_cors_headers_on_regular_responses() {
        let app = app_with(&[("go/basics/getting-started.md", GETTING_STARTED)]);

        let response = send(&app, Method::GET, "/api/languages").await;

        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_disallowed_method_is_405() {
        let app = app_with(&[]);

        let response = send(&app, Method::POST, "/api/languages").await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_search_finds_functions_across_doc_types() {
        let app = app_with(&[
            ("go/basics/getting-started.md", GETTING_STARTED),
            (
                "go/packages/fmt.md",
                "---\ntitle: fmt\norder: 1\nfunctions:\n  - name: Println\n    signature: func Println(a ...any)\n    description: Prints a line.\n---\nPackage fmt.",
            ),
        ]);

        let response = send(&app, Method::GET, "/api/languages/go/search?q=println").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["docId"], "fmt");
        assert_eq!(body[0]["type"], "packages");
        assert_eq!(body[0]["matchType"], "function");
        assert_eq!(body[0]["functionName"], "Println");
    }

    #[tokio::test]
    async fn test_search_rejects_short_queries() {
        let app = app_with(&[("go/basics/getting-started.md", GETTING_STARTED)]);

        let response = send(&app, Method::GET, "/api/languages/go/search?q=a").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_probes() {
        let app = app_with(&[]);

        let live = send(&app, Method::GET, "/api/live").await;
        assert_eq!(live.status(), StatusCode::OK);

        let ready = send(&app, Method::GET, "/api/ready").await;
        assert_eq!(ready.status(), StatusCode::OK);
        assert_eq!(body_json(ready).await["checks"]["data_dir"], "ok");
    }

    #[tokio::test]
    async fn test_ready_fails_without_data_dir() {
        let config = AppConfig {
            data_dir: "/nonexistent/docserve-data".into(),
            ..Default::default()
        };
        let state = ApiState::new(&config).expect("state");
        let router: Router = Router::new()
            .nest("/api", api_routes(&state))
            .with_state(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let config = AppConfig {
            cors_allowed_origin: "bad\norigin".into(),
            ..Default::default()
        };

        assert!(ApiState::new(&config).is_err());
    }
}
