use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{ArticleData, KnowledgeCategoryData};
use crate::types::response::{Article, Envelope, KnowledgeCategory, KnowledgeStats};
use crate::utils::extract::Payload;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Cleared {
    deleted_count: u64,
}

/// Root of the knowledge base. Content lives under the categories and articles routes.
pub(crate) async fn index() -> Json<Envelope<Vec<Article>>> {
    Json(Envelope::data(Vec::new()))
}

#[instrument(skip(state))]
pub(crate) async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<Envelope<KnowledgeStats>>, Error> {
    let stats = state.knowledge_controller.get_stats().await?;

    Ok(Json(Envelope::data(stats)))
}

#[instrument(skip(state))]
pub(crate) async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<KnowledgeCategory>>>, Error> {
    let categories = state.knowledge_controller.get_categories().await?;

    Ok(Json(Envelope::data(categories)))
}

#[instrument(skip(state, category))]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    Payload(category): Payload<KnowledgeCategoryData>,
) -> Result<(StatusCode, Json<Envelope<KnowledgeCategory>>), Error> {
    let category = state.knowledge_controller.create_category(&category).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(category).with_message("Category created successfully")),
    ))
}

#[instrument(skip(state, category))]
pub(crate) async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Payload(category): Payload<KnowledgeCategoryData>,
) -> Result<Json<Envelope<KnowledgeCategory>>, Error> {
    let category = state
        .knowledge_controller
        .update_category(id, &category)
        .await?;

    Ok(Json(
        Envelope::data(category).with_message("Category updated successfully"),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, Error> {
    state.knowledge_controller.delete_category(id).await?;

    Ok(Json(Envelope::message("Category deleted successfully")))
}

#[instrument(skip(state))]
pub(crate) async fn get_articles(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Article>>>, Error> {
    let articles = state.knowledge_controller.get_articles().await?;

    Ok(Json(Envelope::data(articles)))
}

#[instrument(skip(state))]
pub(crate) async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Article>>, Error> {
    let article = state.knowledge_controller.get_article(id).await?;

    Ok(Json(Envelope::data(article)))
}

#[instrument(skip(state, article))]
pub(crate) async fn create_article(
    State(state): State<AppState>,
    Payload(article): Payload<ArticleData>,
) -> Result<(StatusCode, Json<Envelope<Article>>), Error> {
    let article = state.knowledge_controller.create_article(&article).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(article).with_message("Article created successfully")),
    ))
}

#[instrument(skip(state, article))]
pub(crate) async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Payload(article): Payload<ArticleData>,
) -> Result<Json<Envelope<Article>>, Error> {
    let article = state
        .knowledge_controller
        .update_article(id, &article)
        .await?;

    Ok(Json(
        Envelope::data(article).with_message("Article updated successfully"),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, Error> {
    state.knowledge_controller.delete_article(id).await?;

    Ok(Json(Envelope::message("Article deleted successfully")))
}

#[instrument(skip(state))]
pub(crate) async fn clear_articles(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Cleared>>, Error> {
    let deleted_count = state.knowledge_controller.clear_articles().await?;

    Ok(Json(
        Envelope::data(Cleared { deleted_count })
            .with_message(format!("Deleted {deleted_count} articles")),
    ))
}
