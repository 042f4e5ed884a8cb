use axum::extract::{Extension, Json, Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{CreateUserData, UpdateProfileData};
use crate::types::response::{Envelope, Profile, User};
use crate::utils::auth::UserIdentity;
use crate::utils::extract::Payload;

#[instrument(skip(state))]
pub(crate) async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<User>>>, Error> {
    let users = state.user_controller.get_users().await?;

    Ok(Json(Envelope::data(users)))
}

#[instrument(skip_all, fields(email = %data.email))]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Payload(data): Payload<CreateUserData>,
) -> Result<(StatusCode, Json<Envelope<User>>), Error> {
    let user = state.user_controller.create(&data).await?;

    tracing::info!(user_id = user.id, "Admin created user");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(user).with_message("User created successfully")),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, Error> {
    state.user_controller.delete(id).await?;

    tracing::info!(user_id = id, "Admin deleted user");

    Ok(Json(Envelope::message("User deleted successfully")))
}

#[instrument(skip(state))]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Result<Json<Envelope<Profile>>, Error> {
    let profile = state.user_controller.get_profile(user.id).await?;

    Ok(Json(Envelope::data(profile)))
}

#[instrument(skip(state, data))]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Payload(data): Payload<UpdateProfileData>,
) -> Result<Json<Envelope<User>>, Error> {
    let user = state.user_controller.update_profile(user.id, &data).await?;

    Ok(Json(
        Envelope::data(user).with_message("Profile updated successfully"),
    ))
}
