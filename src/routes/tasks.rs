use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::TaskData;
use crate::types::response::{Envelope, Task};
use crate::utils::extract::Payload;

#[instrument(skip(state))]
pub(crate) async fn get_tasks(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Task>>>, Error> {
    let tasks = state.task_controller.get_tasks().await?;

    Ok(Json(Envelope::data(tasks)))
}

#[instrument(skip(state))]
pub(crate) async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Task>>, Error> {
    let task = state.task_controller.get_task(id).await?;

    Ok(Json(Envelope::data(task)))
}

#[instrument(skip(state, task))]
pub(crate) async fn create_task(
    State(state): State<AppState>,
    Payload(task): Payload<TaskData>,
) -> Result<(StatusCode, Json<Envelope<Task>>), Error> {
    let task = state.task_controller.create_task(&task).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(task).with_message("Task created successfully")),
    ))
}

#[instrument(skip(state, task))]
pub(crate) async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Payload(task): Payload<TaskData>,
) -> Result<Json<Envelope<Task>>, Error> {
    let task = state.task_controller.update_task(id, &task).await?;

    Ok(Json(
        Envelope::data(task).with_message("Task updated successfully"),
    ))
}

#[instrument(skip(state))]
pub(crate) async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, Error> {
    state.task_controller.delete_task(id).await?;

    Ok(Json(Envelope::message("Task deleted successfully")))
}

pub(crate) mod categories {
    use axum::extract::{Json, Path, State};
    use axum::http::StatusCode;
    use tracing::instrument;

    use crate::core::error::Error;
    use crate::core::state::AppState;
    use crate::types::request::TaskCategoryData;
    use crate::types::response::{Envelope, TaskCategory};
    use crate::utils::extract::Payload;

    #[instrument(skip(state))]
    pub(crate) async fn get_categories(
        State(state): State<AppState>,
    ) -> Result<Json<Envelope<Vec<TaskCategory>>>, Error> {
        let categories = state.task_controller.get_categories().await?;

        Ok(Json(Envelope::data(categories)))
    }

    #[instrument(skip(state, category))]
    pub(crate) async fn create_category(
        State(state): State<AppState>,
        Payload(category): Payload<TaskCategoryData>,
    ) -> Result<(StatusCode, Json<Envelope<TaskCategory>>), Error> {
        let category = state.task_controller.create_category(&category).await?;

        Ok((
            StatusCode::CREATED,
            Json(Envelope::data(category).with_message("Category created successfully")),
        ))
    }

    #[instrument(skip(state, category))]
    pub(crate) async fn update_category(
        State(state): State<AppState>,
        Path(id): Path<i32>,
        Payload(category): Payload<TaskCategoryData>,
    ) -> Result<Json<Envelope<TaskCategory>>, Error> {
        let category = state
            .task_controller
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
        state.task_controller.delete_category(id).await?;

        Ok(Json(Envelope::message("Category deleted successfully")))
    }
}
