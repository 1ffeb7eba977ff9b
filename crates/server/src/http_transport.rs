//! HTTP transport for the recommendation API.
//!
//! ## Security Features
//!
//! - **Bearer Token Auth**: Validates `Authorization: Bearer <token>` on the
//!   recommendation routes with constant-time comparison. `/health` stays open
//!   for liveness checks.
//! - **CORS**: Configurable Cross-Origin Resource Sharing for browser clients

use crate::api::{health_handler, recommendation_routes, AppState};
use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Configuration for HTTP transport security.
///
/// Note: `Debug` is manually implemented to prevent auth_token from being logged.
#[derive(Clone, Default)]
pub struct HttpSecurityConfig {
    /// Bearer token for authentication (None = no auth).
    pub auth_token: Option<String>,
    /// Allowed CORS origins (empty = no CORS).
    pub cors_origins: Vec<String>,
}

impl std::fmt::Debug for HttpSecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSecurityConfig")
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl HttpSecurityConfig {
    /// Returns true if auth is required.
    pub fn has_auth(&self) -> bool {
        self.auth_token.is_some()
    }
}

/// Bearer token authentication middleware.
///
/// Uses constant-time comparison to prevent timing attacks on the auth token.
async fn auth_middleware(
    expected_token: Arc<String>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    let uri = req.uri().path().to_string();

    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) => {
            let provided = token.as_bytes();
            let expected = expected_token.as_bytes();
            if provided.len() == expected.len() && provided.ct_eq(expected).into() {
                return next.run(req).await;
            }
            tracing::debug!(target: "crewfit::http::auth", uri, "Auth failed: invalid token");
        }
        None => tracing::debug!(
            target: "crewfit::http::auth",
            uri,
            "Auth failed: missing or malformed Authorization header"
        ),
    }

    // Generic message to avoid leaking which part failed.
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(serde_json::json!({
            "detail": "Invalid or missing authorization token"
        })),
    )
        .into_response()
}

/// Builds CORS layer from allowed origins.
///
/// Invalid origins are logged as warnings and skipped.
fn build_cors_layer(origins: &[String], has_auth: bool) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
    } else if origins.iter().any(|o| o == "*") {
        if has_auth {
            tracing::warn!(
                target: "crewfit::http::cors",
                "Using wildcard CORS ('*') with authentication enabled. \
                 Consider specifying explicit origins instead."
            );
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let mut valid_origins = Vec::with_capacity(origins.len());
        for origin in origins {
            match origin.trim().parse::<HeaderValue>() {
                Ok(header) => valid_origins.push(header),
                Err(e) => {
                    tracing::warn!(
                        target: "crewfit::http::cors",
                        origin,
                        error = %e,
                        "Failed to parse CORS origin - it will be ignored"
                    );
                }
            }
        }

        if valid_origins.is_empty() {
            tracing::warn!(
                target: "crewfit::http::cors",
                "All CORS origins failed to parse. CORS will be disabled."
            );
        }

        CorsLayer::new()
            .allow_origin(valid_origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

/// Assemble the full application router.
pub fn build_router(state: AppState, security: &HttpSecurityConfig) -> axum::Router {
    let routes = match &security.auth_token {
        Some(token) => {
            let token = Arc::new(token.clone());
            recommendation_routes().route_layer(axum::middleware::from_fn(move |req, next| {
                let token = token.clone();
                auth_middleware(token, req, next)
            }))
        }
        None => recommendation_routes(),
    };

    axum::Router::new()
        .route("/health", get(health_handler))
        .merge(routes)
        .layer(build_cors_layer(&security.cors_origins, security.has_auth()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind_addr` and serve until a shutdown signal arrives.
pub async fn serve_http(state: AppState, bind_addr: &str, security: HttpSecurityConfig) -> Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid bind address: {bind_addr}"))?;

    let cors_status = if security.cors_origins.is_empty() {
        "disabled".to_string()
    } else if security.cors_origins.iter().any(|o| o == "*") {
        "allow-all".to_string()
    } else {
        format!("{} origins", security.cors_origins.len())
    };
    tracing::info!(
        target: "crewfit::http",
        bind = %addr,
        auth = if security.has_auth() { "enabled" } else { "disabled" },
        cors = cors_status,
        taxonomy = state.recommender.taxonomy().version(),
        embedding_model = state.recommender.embedder().model_name(),
        "Starting recommendation server"
    );

    let app = build_router(state, &security);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(target: "crewfit::http", bind = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::signals::shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!(target: "crewfit::http", "HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use crewfit_scoring::{HashingEmbedder, Recommender, Taxonomy};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(Recommender::new(
            Arc::new(Taxonomy::builtin()),
            Arc::new(HashingEmbedder::new(64)),
        ))
    }

    fn app(token: Option<&str>) -> axum::Router {
        build_router(
            state(),
            &HttpSecurityConfig {
                auth_token: token.map(str::to_string),
                cors_origins: vec![],
            },
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn person_body() -> Value {
        json!({
            "person_skills": ["Python", "Django", "Docker", "SQL"],
            "teams": [
                {
                    "team_id": 1,
                    "name": "Storefront",
                    "skills": {"Anna": ["React", "CSS", "HTML", "JavaScript", "Tailwind", "Next", "Vue", "Git", "Figma"]},
                    "required_roles": ["Frontend", "Python Backend"]
                },
                {
                    "team_id": 2,
                    "name": "Studio",
                    "skills": {"Dmitri": ["React", "CSS", "HTML", "JavaScript", "Tailwind", "Next", "Vue", "Git", "Figma"]},
                    "required_roles": ["Frontend"]
                }
            ]
        })
    }

    #[test]
    fn parse_bind_addresses() {
        assert!("127.0.0.1:3000".parse::<SocketAddr>().is_ok());
        assert!("[::1]:3000".parse::<SocketAddr>().is_ok());
        assert!("not-an-address".parse::<SocketAddr>().is_err());
    }

    #[test]
    fn security_config_debug_redacts_token() {
        let config = HttpSecurityConfig {
            auth_token: Some("super-secret-token".to_string()),
            ..Default::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn cors_layers_build() {
        let _ = build_cors_layer(&[], false);
        let _ = build_cors_layer(&["*".to_string()], true);
        let _ = build_cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()], false);
    }

    #[tokio::test]
    async fn health_is_open_even_with_auth() {
        let response = app(Some("secret"))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["embedding_model"], "fnv1a-hashing");
    }

    #[tokio::test]
    async fn team_to_person_returns_ranked_teams() {
        let response = app(None)
            .oneshot(post_json("/recommend_team_to_person", person_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let teams = body["recommended_teams"].as_array().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["team_id"], 1);
        assert_eq!(teams[0]["team_name"], "Storefront");
        assert!(teams[0]["similarity"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn empty_candidates_are_404_with_detail() {
        let response = app(None)
            .oneshot(post_json(
                "/recommend_team_to_case",
                json!({
                    "case": {"id": 1, "title": "t", "description": "d", "required_roles": "DevOps"},
                    "teams": []
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["detail"], "No suitable teams found");
        assert_eq!(body["reason"], "no_candidates");
    }

    #[tokio::test]
    async fn case_to_team_returns_hybrid_scores() {
        let response = app(None)
            .oneshot(post_json(
                "/recommend_case_to_team",
                json!({
                    "team": {"team_id": 3, "name": "Platform", "skills": {"Egor": ["Python", "Django", "Docker"]}},
                    "cases": [
                        {"id": 10, "title": "API", "description": "Django service", "required_roles": "Python Backend"},
                        {"id": 11, "title": "Site", "description": "Landing page", "required_roles": "Frontend"}
                    ],
                    "confidence_percentile": 0.0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let cases = body["recommended_cases"].as_array().unwrap();
        assert_eq!(cases.len(), 2);
        for case in cases {
            assert!(case["embedding_similarity"].is_number());
            assert!(case["skills_similarity"].is_number());
            assert!(case["hybrid_similarity"].is_number());
        }
        assert_eq!(cases[0]["id"], 10);
    }

    #[tokio::test]
    async fn invalid_parameters_are_422() {
        let mut body = person_body();
        body["confidence_percentile"] = json!(1.5);
        let response = app(None)
            .oneshot(post_json("/recommend_team_to_person", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["detail"][0]["loc"], "confidence_percentile");
    }

    #[tokio::test]
    async fn unknown_required_role_is_422() {
        let response = app(None)
            .oneshot(post_json(
                "/recommend_team_to_person",
                json!({
                    "person_skills": ["Python"],
                    "teams": [{"team_id": 1, "name": "T", "skills": {"m": ["Python"]}, "required_roles": ["Astronaut"]}]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_with_detail() {
        let request = Request::builder()
            .method("POST")
            .uri("/recommend_team_to_person")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        let body = json_body(response).await;
        assert!(body["detail"].is_string());
    }

    mod auth_middleware_tests {
        use super::*;

        #[tokio::test]
        async fn auth_success_with_valid_token() {
            let mut req = post_json("/recommend_team_to_person", person_body());
            req.headers_mut()
                .insert(header::AUTHORIZATION, "Bearer secret-token".parse().unwrap());
            let response = app(Some("secret-token")).oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn auth_fails_with_missing_header() {
            let req = post_json("/recommend_team_to_person", person_body());
            let response = app(Some("secret-token")).oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        #[tokio::test]
        async fn auth_fails_with_invalid_token() {
            let mut req = post_json("/recommend_team_to_person", person_body());
            req.headers_mut()
                .insert(header::AUTHORIZATION, "Bearer wrong-token".parse().unwrap());
            let response = app(Some("secret-token")).oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        #[tokio::test]
        async fn auth_fails_with_basic_auth() {
            let mut req = post_json("/recommend_team_to_person", person_body());
            req.headers_mut()
                .insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
            let response = app(Some("secret-token")).oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        #[tokio::test]
        async fn auth_is_case_sensitive() {
            let mut req = post_json("/recommend_team_to_person", person_body());
            req.headers_mut()
                .insert(header::AUTHORIZATION, "Bearer secret-token".parse().unwrap());
            let response = app(Some("Secret-Token")).oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
