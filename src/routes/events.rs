use axum::extract::{Extension, Json, Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::EventData;
use crate::types::response::{Envelope, Event, RegistrationCheck, Registrations};
use crate::utils::auth::UserIdentity;
use crate::utils::extract::Payload;

#[instrument(skip(state))]
pub(crate) async fn get_events(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Event>>>, Error> {
    let events = state.event_controller.get_events().await?;

    Ok(Json(Envelope::data(events)))
}

#[instrument(skip(state))]
pub(crate) async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Event>>, Error> {
    let event = state.event_controller.get_event(id).await?;

    Ok(Json(Envelope::data(event)))
}

#[instrument(skip(state, event))]
pub(crate) async fn create_event(
    State(state): State<AppState>,
    Payload(event): Payload<EventData>,
) -> Result<(StatusCode, Json<Envelope<Event>>), Error> {
    let event = state.event_controller.create_event(&event).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(event).with_message("Event created successfully")),
    ))
}

#[instrument(skip(state, event))]
pub(crate) async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Payload(event): Payload<EventData>,
) -> Result<Json<Envelope<Event>>, Error> {
    let event = state.event_controller.update_event(id, &event).await?;

    Ok(Json(
        Envelope::data(event).with_message("Event updated successfully"),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, Error> {
    state.event_controller.delete_event(id).await?;

    Ok(Json(Envelope::message("Event deleted successfully")))
}

#[instrument(skip(state))]
pub(crate) async fn check_registration(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<RegistrationCheck>>, Error> {
    let is_registered = state.event_controller.is_registered(id, user.id).await?;

    Ok(Json(Envelope::data(RegistrationCheck { is_registered })))
}

#[instrument(skip(state))]
pub(crate) async fn register(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<Envelope<()>>), Error> {
    state.event_controller.register(id, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::message("Successfully registered for the event")),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn unregister(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, Error> {
    state.event_controller.unregister(id, user.id).await?;

    Ok(Json(Envelope::message("Registration cancelled")))
}

#[instrument(skip(state))]
pub(crate) async fn get_registrations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Registrations>>, Error> {
    let registrations = state.event_controller.get_registrations(id).await?;

    Ok(Json(Envelope::data(Registrations {
        count: registrations.len(),
        registrations,
    })))
}
