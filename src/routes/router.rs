use crate::core::error::Error;
use crate::core::state::AppState;
use crate::routes::{admin, auth, events, help, knowledge, posts, tasks, users};
use crate::types::response::Health;
use crate::utils;
use axum::extract::DefaultBodyLimit;
use axum::{
    Json, Router,
    extract::{MatchedPath, Request},
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info_span;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: Utc::now(),
        service: env!("CARGO_PKG_NAME"),
    })
}

async fn not_found() -> Error {
    Error::NotFound("API endpoint not found")
}

pub(crate) fn routes(state: AppState, origins: Vec<HeaderValue>) -> Router {
    let user = middleware::from_fn_with_state(state.verifier.clone(), utils::auth::require_user);
    let admin = middleware::from_fn_with_state(state.verifier.clone(), utils::auth::require_admin);

    // /api/auth/...
    let auth_router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // /api/admin/...
    let admin_router = Router::new()
        .route("/login", post(admin::login))
        .route("/me", get(admin::me).route_layer(admin.clone()));

    // /api/users/...
    let user_router = Router::new()
        .route("/", get(users::get_users).route_layer(admin.clone()))
        .route("/create", post(users::create_user).route_layer(admin.clone()))
        .route(
            "/profile",
            get(users::get_profile)
                .put(users::update_profile)
                .route_layer(user.clone()),
        )
        .route("/{id}", delete(users::delete_user).route_layer(admin.clone()));

    // /api/posts/...
    let post_router = Router::new()
        .route(
            "/",
            get(posts::get_posts).merge(post(posts::create_post).route_layer(user.clone())),
        )
        .route("/{id}/like", post(posts::toggle_like).route_layer(user.clone()))
        .route(
            "/{id}/comments",
            get(posts::get_comments).merge(post(posts::add_comment).route_layer(user.clone())),
        );

    // /api/events/...
    let event_router = Router::new()
        .route(
            "/",
            get(events::get_events).merge(post(events::create_event).route_layer(admin.clone())),
        )
        .route(
            "/{id}",
            get(events::get_event).merge(
                put(events::update_event)
                    .delete(events::delete_event)
                    .route_layer(admin.clone()),
            ),
        )
        .route(
            "/{id}/check-registration",
            get(events::check_registration).route_layer(user.clone()),
        )
        .route(
            "/{id}/register",
            post(events::register)
                .delete(events::unregister)
                .route_layer(user.clone()),
        )
        .route(
            "/{id}/registrations",
            get(events::get_registrations).route_layer(admin.clone()),
        );

    // /api/help/...
    let help_router = Router::new()
        .route(
            "/mentors",
            get(help::get_mentors).merge(post(help::create_mentor).route_layer(admin.clone())),
        )
        .route("/mentors/{id}", get(help::get_mentor))
        .route(
            "/requests",
            post(help::create_request)
                .route_layer(user.clone())
                .merge(get(help::get_requests).route_layer(admin.clone())),
        )
        .route(
            "/requests/mine",
            get(help::get_my_requests).route_layer(user.clone()),
        )
        .route(
            "/requests/{id}/status",
            put(help::update_status).route_layer(admin.clone()),
        );

    // /api/knowledge/...
    let knowledge_router = Router::new()
        .route("/", get(knowledge::index))
        .route("/stats", get(knowledge::get_stats))
        .route(
            "/categories",
            get(knowledge::get_categories)
                .merge(post(knowledge::create_category).route_layer(admin.clone())),
        )
        .route(
            "/categories/{id}",
            put(knowledge::update_category)
                .delete(knowledge::delete_category)
                .route_layer(admin.clone()),
        )
        .route(
            "/articles",
            get(knowledge::get_articles).merge(
                post(knowledge::create_article)
                    .delete(knowledge::clear_articles)
                    .route_layer(admin.clone()),
            ),
        )
        .route(
            "/articles/{id}",
            get(knowledge::get_article).merge(
                put(knowledge::update_article)
                    .delete(knowledge::delete_article)
                    .route_layer(admin.clone()),
            ),
        );

    // /api/task-categories/...
    let task_category_router = Router::new()
        .route("/public", get(tasks::categories::get_categories))
        .route(
            "/",
            get(tasks::categories::get_categories)
                .post(tasks::categories::create_category)
                .route_layer(admin.clone()),
        )
        .route(
            "/{id}",
            put(tasks::categories::update_category)
                .delete(tasks::categories::delete_category)
                .route_layer(admin.clone()),
        );

    // /api/tasks/...
    let task_router = Router::new()
        .route("/public", get(tasks::get_tasks))
        .route(
            "/",
            get(tasks::get_tasks)
                .post(tasks::create_task)
                .route_layer(admin.clone()),
        )
        .route(
            "/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task)
                .route_layer(admin),
        );

    let api_router = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router)
        .nest("/admin", admin_router)
        .nest("/users", user_router)
        .nest("/posts", post_router)
        .nest("/events", event_router)
        .nest("/help", help_router)
        .nest("/knowledge", knowledge_router)
        .nest("/task-categories", task_category_router)
        .nest("/tasks", task_router);

    Router::new()
        .nest("/api", api_router)
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let matched_path = request
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str);

                        info_span!(
                            "request",
                            method = ?request.method(),
                            matched_path,
                        )
                    }),
                )
                .layer(
                    CorsLayer::new()
                        .allow_origin(AllowOrigin::list(origins))
                        .allow_credentials(true)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers([
                            header::AUTHORIZATION,
                            header::CONTENT_TYPE,
                            utils::auth::ADMIN_AUTHORIZATION,
                        ]),
                )
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Args;
    use axum::body::{Body, to_bytes};
    use axum::http::StatusCode;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn args() -> Args {
        Args {
            database_host: "localhost".into(),
            database_port: 5432,
            database_name: "kiroedu".into(),
            database_user: "kiroedu".into(),
            database_password: "kiroedu".into(),
            log_level: "info".into(),
            port: 3001,
            jwt_secret: "router-user-secret".into(),
            jwt_admin_secret: "router-admin-secret".into(),
            admin_username: "admin".into(),
            admin_password: "correct horse".into(),
            cors_origins: "http://localhost:5173".into(),
        }
    }

    fn app() -> (Router, AppState) {
        let args = args();
        let pool = PgPoolOptions::new()
            .connect_lazy(&args.database_url())
            .unwrap();
        let state = AppState::new(pool, &args).unwrap();

        (
            routes(state.clone(), args.cors_origins().unwrap()),
            state,
        )
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = router.oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, headers, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_with_security_headers() {
        let (router, _) = app();

        let (status, headers, body) = send(router, get_request("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    }

    #[tokio::test]
    async fn unknown_endpoint_is_enveloped_404() {
        let (router, _) = app();

        let (status, _, body) = send(router, get_request("/api/nope")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "API endpoint not found");
    }

    #[tokio::test]
    async fn knowledge_root_lists_nothing() {
        let (router, _) = app();

        let (status, _, body) = send(router, get_request("/api/knowledge")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn user_routes_need_a_token() {
        let (router, _) = app();

        let (status, _, body) = send(router, get_request("/api/users/profile")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: token missing");
    }

    #[tokio::test]
    async fn creating_a_post_needs_a_token() {
        let (router, _) = app();

        let (status, _, body) = send(
            router,
            json_request(Method::POST, "/api/posts", r#"{"content":"hello"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: token missing");
    }

    #[tokio::test]
    async fn admin_routes_reject_user_tokens() {
        let (router, state) = app();
        let token = state.issuer.issue_user_token(1, "a@b.com").unwrap();

        let request = axum::http::Request::builder()
            .uri("/api/users")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: invalid admin token");
    }

    #[tokio::test]
    async fn user_routes_reject_admin_tokens() {
        let (router, state) = app();
        let token = state.issuer.issue_admin_token("admin").unwrap();

        let request = axum::http::Request::builder()
            .uri("/api/help/requests/mine")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: invalid token");
    }

    #[tokio::test]
    async fn admin_me_echoes_claims() {
        let (router, state) = app();
        let token = state.issuer.issue_admin_token("admin").unwrap();

        let request = axum::http::Request::builder()
            .uri("/api/admin/me")
            .header(utils::auth::ADMIN_AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "admin");
        assert_eq!(body["data"]["isAdmin"], true);
        assert_eq!(body["data"]["role"], "admin");
    }

    #[tokio::test]
    async fn admin_login_issues_a_usable_token() {
        let (router, _) = app();

        let (status, _, body) = send(
            router.clone(),
            json_request(
                Method::POST,
                "/api/admin/login",
                r#"{"username":"admin","password":"correct horse"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["isAdmin"], true);
        assert_eq!(body["data"]["user"]["role"], "admin");

        let token = body["data"]["token"].as_str().unwrap();
        let request = axum::http::Request::builder()
            .uri("/api/admin/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, _, _) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_login_rejects_wrong_and_missing_credentials() {
        let (router, _) = app();

        let (status, _, body) = send(
            router.clone(),
            json_request(
                Method::POST,
                "/api/admin/login",
                r#"{"username":"admin","password":"wrong"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid admin credentials");

        let (status, _, _) = send(
            router,
            json_request(Method::POST, "/api/admin/login", r#"{"username":"admin"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    fn admin_json_request(state: &AppState, method: Method, uri: &str, body: &str) -> Request<Body> {
        let token = state.issuer.issue_admin_token("admin").unwrap();

        let mut request = json_request(method, uri, body);
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );

        request
    }

    #[tokio::test]
    async fn registration_without_surname_is_enveloped_400() {
        let (router, _) = app();

        let (status, _, body) = send(
            router,
            json_request(
                Method::POST,
                "/api/auth/register",
                r#"{"email":"ada@example.org","password":"secret1","name":"Ada"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Surname must be at least 2 characters");
    }

    #[tokio::test]
    async fn login_without_password_is_enveloped_400() {
        let (router, _) = app();

        let (status, _, body) = send(
            router,
            json_request(Method::POST, "/api/auth/login", r#"{"email":"ada@example.org"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Email and password are required");
    }

    #[tokio::test]
    async fn mistyped_body_is_enveloped_400() {
        let (router, _) = app();

        let (status, _, body) = send(
            router.clone(),
            json_request(
                Method::POST,
                "/api/auth/register",
                r#"{"email":"ada@example.org","password":"secret1","name":5,"surname":"Lovelace"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

        let (status, _, body) = send(
            router,
            json_request(Method::POST, "/api/auth/login", "{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unknown_task_difficulty_is_enveloped_400() {
        let (router, state) = app();

        let request = admin_json_request(
            &state,
            Method::POST,
            "/api/tasks",
            r#"{"category_id":1,"difficulty":"extreme","question":"q","answer":"a","solution":"s"}"#,
        );

        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid difficulty. Allowed: easy, medium, hard");
    }

    #[tokio::test]
    async fn task_without_category_is_enveloped_400() {
        let (router, state) = app();

        let request = admin_json_request(
            &state,
            Method::POST,
            "/api/tasks",
            r#"{"difficulty":"easy","question":"q","answer":"a","solution":"s"}"#,
        );

        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "All fields are required");
    }

    #[tokio::test]
    async fn unknown_help_status_is_enveloped_400() {
        let (router, state) = app();

        let request = admin_json_request(
            &state,
            Method::PUT,
            "/api/help/requests/1/status",
            r#"{"status":"done"}"#,
        );

        let (status, _, body) = send(router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid status"));
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let (router, _) = app();

        let request = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap();

        let (status, headers, _) = send(router, request).await;

        assert!(status.is_success());
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
