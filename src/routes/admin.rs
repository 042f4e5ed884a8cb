use axum::extract::{Extension, Json, State};
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::AdminLoginData;
use crate::types::response::{AdminLogin, AdminUser, Envelope};
use crate::utils::auth::AdminClaims;
use crate::utils::extract::Payload;

#[instrument(skip_all, fields(username = %data.username))]
pub(crate) async fn login(
    State(state): State<AppState>,
    Payload(data): Payload<AdminLoginData>,
) -> Result<Json<Envelope<AdminLogin>>, Error> {
    if data.username.is_empty() || data.password.is_empty() {
        return Err(Error::validation("Username and password are required"));
    }

    if !state.admin.matches(&data.username, &data.password) {
        tracing::warn!("Rejected admin login");
        return Err(Error::InvalidAdminCredentials);
    }

    let token = state.issuer.issue_admin_token(&data.username)?;

    Ok(Json(
        Envelope::data(AdminLogin {
            token,
            user: AdminUser {
                username: data.username,
                role: "admin",
                is_admin: true,
            },
        })
        .with_message("Admin login successful"),
    ))
}

pub(crate) async fn me(Extension(admin): Extension<AdminClaims>) -> Json<Envelope<AdminClaims>> {
    Json(Envelope::data(admin))
}
