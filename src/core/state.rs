use crate::controllers::event::EventController;
use crate::controllers::help::HelpController;
use crate::controllers::knowledge::KnowledgeController;
use crate::controllers::post::PostController;
use crate::controllers::task::TaskController;
use crate::controllers::user::UserController;
use crate::core::config::Args;
use crate::core::error::ConfigError;
use crate::utils::auth::{TokenIssuer, TokenVerifier};
use sqlx::postgres::PgPool;

/// Credentials accepted by `POST /api/admin/login`.
#[derive(Clone)]
pub(crate) struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    pub(crate) fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) issuer: TokenIssuer,
    pub(crate) verifier: TokenVerifier,
    pub(crate) admin: AdminCredentials,
    pub(crate) user_controller: UserController,
    pub(crate) post_controller: PostController,
    pub(crate) event_controller: EventController,
    pub(crate) help_controller: HelpController,
    pub(crate) knowledge_controller: KnowledgeController,
    pub(crate) task_controller: TaskController,
}

impl AppState {
    pub(crate) fn new(pool: PgPool, config: &Args) -> Result<Self, ConfigError> {
        Ok(AppState {
            issuer: TokenIssuer::new(&config.jwt_secret, &config.jwt_admin_secret),
            verifier: TokenVerifier::new(&config.jwt_secret, &config.jwt_admin_secret),
            admin: AdminCredentials::new(&config.admin_username, &config.admin_password),
            user_controller: UserController::new(pool.clone())?,
            post_controller: PostController::new(pool.clone()),
            event_controller: EventController::new(pool.clone()),
            help_controller: HelpController::new(pool.clone()),
            knowledge_controller: KnowledgeController::new(pool.clone()),
            task_controller: TaskController::new(pool),
        })
    }
}
