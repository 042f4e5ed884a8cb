use axum::extract::{Extension, Json, Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{NewComment, NewPost, PostsQuery};
use crate::types::response::{Comment, Envelope, LikeStatus, Post};
use crate::utils::auth::UserIdentity;
use crate::utils::extract::Payload;

#[instrument(skip(state))]
pub(crate) async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Envelope<Vec<Post>>>, Error> {
    let posts = state.post_controller.get_posts(query.category()).await?;

    Ok(Json(Envelope::data(posts)))
}

#[instrument(skip(state, post))]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Payload(post): Payload<NewPost>,
) -> Result<(StatusCode, Json<Envelope<Post>>), Error> {
    let post = state.post_controller.create_post(user.id, &post).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(post).with_message("Post created successfully")),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn toggle_like(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<LikeStatus>>, Error> {
    let status = state.post_controller.toggle_like(id, user.id).await?;

    Ok(Json(Envelope::data(status)))
}

#[instrument(skip(state))]
pub(crate) async fn get_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Vec<Comment>>>, Error> {
    let comments = state.post_controller.get_comments(id).await?;

    Ok(Json(Envelope::data(comments)))
}

#[instrument(skip(state, comment))]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<i32>,
    Payload(comment): Payload<NewComment>,
) -> Result<(StatusCode, Json<Envelope<Comment>>), Error> {
    let comment = state
        .post_controller
        .add_comment(id, user.id, &comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(comment).with_message("Comment added successfully")),
    ))
}
