use axum::extract::{Extension, Json, Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{HelpRequestData, HelpStatusData, MentorData};
use crate::types::response::{Envelope, HelpRequest, Mentor};
use crate::utils::auth::UserIdentity;
use crate::utils::extract::Payload;

#[instrument(skip(state))]
pub(crate) async fn get_mentors(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Mentor>>>, Error> {
    let mentors = state.help_controller.get_mentors().await?;

    Ok(Json(Envelope::data(mentors)))
}

#[instrument(skip(state))]
pub(crate) async fn get_mentor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Mentor>>, Error> {
    let mentor = state.help_controller.get_mentor(id).await?;

    Ok(Json(Envelope::data(mentor)))
}

#[instrument(skip(state, mentor))]
pub(crate) async fn create_mentor(
    State(state): State<AppState>,
    Payload(mentor): Payload<MentorData>,
) -> Result<(StatusCode, Json<Envelope<Mentor>>), Error> {
    let mentor = state.help_controller.create_mentor(&mentor).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(mentor).with_message("Mentor created successfully")),
    ))
}

#[instrument(skip(state, request))]
pub(crate) async fn create_request(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Payload(request): Payload<HelpRequestData>,
) -> Result<(StatusCode, Json<Envelope<HelpRequest>>), Error> {
    let request = state
        .help_controller
        .create_request(user.id, &request)
        .await?;

    tracing::info!(request_id = request.id, mentor_id = request.mentor_id, "Help request submitted");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(request).with_message("Help request submitted successfully")),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn get_my_requests(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Result<Json<Envelope<Vec<HelpRequest>>>, Error> {
    let requests = state.help_controller.get_requests(Some(user.id)).await?;

    Ok(Json(Envelope::data(requests)))
}

#[instrument(skip(state))]
pub(crate) async fn get_requests(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<HelpRequest>>>, Error> {
    let requests = state.help_controller.get_requests(None).await?;

    Ok(Json(Envelope::data(requests)))
}

#[instrument(skip(state, data))]
pub(crate) async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Payload(data): Payload<HelpStatusData>,
) -> Result<Json<Envelope<HelpRequest>>, Error> {
    let status = data.status()?;

    let request = state.help_controller.update_status(id, status).await?;

    Ok(Json(
        Envelope::data(request).with_message(format!("Status updated to {status}")),
    ))
}
