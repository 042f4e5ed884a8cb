use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{LoginData, RegisterData};
use crate::types::response::{Envelope, Login};
use crate::utils::extract::Payload;

#[instrument(skip_all, fields(email = %data.email))]
pub(crate) async fn register(
    State(state): State<AppState>,
    Payload(data): Payload<RegisterData>,
) -> Result<(StatusCode, Json<Envelope<Login>>), Error> {
    let user = state.user_controller.register(&data).await?;

    let token = state.issuer.issue_user_token(user.id, &user.email)?;

    tracing::info!(user_id = user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(Login { user, token }).with_message("User registered successfully")),
    ))
}

#[instrument(skip_all, fields(email = %data.email))]
pub(crate) async fn login(
    State(state): State<AppState>,
    Payload(data): Payload<LoginData>,
) -> Result<Json<Envelope<Login>>, Error> {
    data.validate()?;

    let user = state
        .user_controller
        .login(&data.email, &data.password)
        .await?;

    let token = state.issuer.issue_user_token(user.id, &user.email)?;

    Ok(Json(
        Envelope::data(Login { user, token }).with_message("Login successful"),
    ))
}
