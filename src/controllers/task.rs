use crate::core::error::Error;
use crate::types::Difficulty;
use crate::types::request::{TaskCategoryData, TaskData};
use crate::types::response::{Task, TaskCategory};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const TASK_SELECT: &str = "SELECT
        tasks.id,
        tasks.category_id,
        task_categories.name AS category_name,
        tasks.difficulty,
        tasks.question,
        tasks.answer,
        tasks.solution,
        tasks.created_at
    FROM tasks
    LEFT JOIN task_categories ON task_categories.id = tasks.category_id";

#[derive(Clone, Debug)]
pub(crate) struct TaskController {
    pool: PgPool,
}

impl TaskController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_categories(&self) -> Result<Vec<TaskCategory>, Error> {
        let categories =
            sqlx::query("SELECT id, name, description FROM task_categories ORDER BY name ASC;")
                .map(map_category)
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    pub(crate) async fn create_category(
        &self,
        category: &TaskCategoryData,
    ) -> Result<TaskCategory, Error> {
        category.validate()?;

        match sqlx::query(
            "INSERT INTO task_categories (name, description) VALUES ($1, $2)
            RETURNING id, name, description;",
        )
        .bind(category.name.trim())
        .bind(category.description().trim())
        .map(map_category)
        .fetch_one(&self.pool)
        .await
        {
            Ok(category) => Ok(category),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                Error::Conflict("Category with this name already exists"),
            ),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn update_category(
        &self,
        id: i32,
        category: &TaskCategoryData,
    ) -> Result<TaskCategory, Error> {
        category.validate()?;

        match sqlx::query(
            "UPDATE task_categories SET name = $1, description = $2 WHERE id = $3
            RETURNING id, name, description;",
        )
        .bind(category.name.trim())
        .bind(category.description().trim())
        .bind(id)
        .map(map_category)
        .fetch_one(&self.pool)
        .await
        {
            Ok(category) => Ok(category),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Category not found")),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                Error::Conflict("Category with this name already exists"),
            ),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn delete_category(&self, id: i32) -> Result<(), Error> {
        let tasks: i64 = sqlx::query("SELECT COUNT(*) AS tasks FROM tasks WHERE category_id = $1;")
            .bind(id)
            .map(|row: PgRow| row.get("tasks"))
            .fetch_one(&self.pool)
            .await?;

        if tasks > 0 {
            return Err(Error::Conflict(
                "Cannot delete a category that still has tasks",
            ));
        }

        let result = match sqlx::query("DELETE FROM task_categories WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => result,
            // A task was added between the count and the delete.
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(Error::Conflict(
                    "Cannot delete a category that still has tasks",
                ));
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Category not found"));
        }

        Ok(())
    }

    pub(crate) async fn get_tasks(&self) -> Result<Vec<Task>, Error> {
        let tasks = sqlx::query(&format!(
            "{TASK_SELECT} ORDER BY tasks.created_at DESC, tasks.id DESC;"
        ))
        .try_map(map_task)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub(crate) async fn get_task(&self, id: i32) -> Result<Task, Error> {
        match sqlx::query(&format!("{TASK_SELECT} WHERE tasks.id = $1;"))
            .bind(id)
            .try_map(map_task)
            .fetch_one(&self.pool)
            .await
        {
            Ok(task) => Ok(task),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Task not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn create_task(&self, task: &TaskData) -> Result<Task, Error> {
        let (category_id, difficulty) = task.checked()?;

        let id: i32 = match sqlx::query(
            "INSERT INTO tasks (category_id, difficulty, question, answer, solution)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id;",
        )
        .bind(category_id)
        .bind(difficulty.as_str())
        .bind(task.question.trim())
        .bind(task.answer.trim())
        .bind(task.solution.trim())
        .map(|row: PgRow| row.get("id"))
        .fetch_one(&self.pool)
        .await
        {
            Ok(id) => id,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(Error::validation("Category does not exist"));
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        self.get_task(id).await
    }

    pub(crate) async fn update_task(&self, id: i32, task: &TaskData) -> Result<Task, Error> {
        let (category_id, difficulty) = task.checked()?;

        let result = match sqlx::query(
            "UPDATE tasks SET category_id = $1, difficulty = $2, question = $3, answer = $4, solution = $5
            WHERE id = $6;",
        )
        .bind(category_id)
        .bind(difficulty.as_str())
        .bind(task.question.trim())
        .bind(task.answer.trim())
        .bind(task.solution.trim())
        .bind(id)
        .execute(&self.pool)
        .await
        {
            Ok(result) => result,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(Error::validation("Category does not exist"));
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Task not found"));
        }

        self.get_task(id).await
    }

    pub(crate) async fn delete_task(&self, id: i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Task not found"));
        }

        Ok(())
    }
}

fn map_category(row: PgRow) -> TaskCategory {
    TaskCategory {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
    }
}

fn map_task(row: PgRow) -> Result<Task, sqlx::Error> {
    let difficulty = row
        .try_get::<String, _>("difficulty")?
        .parse::<Difficulty>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Task {
        id: row.try_get("id")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name")?,
        difficulty,
        question: row.try_get("question")?,
        answer: row.try_get("answer")?,
        solution: row.try_get("solution")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> TaskCategoryData {
        TaskCategoryData {
            name: name.into(),
            description: None,
        }
    }

    fn task(category_id: i32, difficulty: &str) -> TaskData {
        TaskData {
            category_id: Some(category_id),
            difficulty: difficulty.into(),
            question: "What does `?` do?".into(),
            answer: "Propagates errors".into(),
            solution: "It returns early with the converted error.".into(),
        }
    }

    #[sqlx::test]
    async fn category_with_tasks_cannot_be_deleted(pool: PgPool) {
        let controller = TaskController::new(pool);

        let basics = controller.create_category(&category("Basics")).await.unwrap();
        let created = controller.create_task(&task(basics.id, "easy")).await.unwrap();
        assert_eq!(created.difficulty, Difficulty::Easy);
        assert_eq!(created.category_name.as_deref(), Some("Basics"));

        assert!(matches!(
            controller.delete_category(basics.id).await,
            Err(Error::Conflict(_))
        ));

        controller.delete_task(created.id).await.unwrap();
        controller.delete_category(basics.id).await.unwrap();

        assert!(matches!(
            controller.delete_category(basics.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[sqlx::test]
    async fn tasks_need_an_existing_category(pool: PgPool) {
        let controller = TaskController::new(pool);

        assert!(matches!(
            controller.create_task(&task(999, "hard")).await,
            Err(Error::Validation(message)) if message == "Category does not exist"
        ));

        let basics = controller.create_category(&category("Basics")).await.unwrap();
        let created = controller.create_task(&task(basics.id, "hard")).await.unwrap();

        assert!(matches!(
            controller.update_task(created.id, &task(999, "hard")).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            controller.update_task(999, &task(basics.id, "hard")).await,
            Err(Error::NotFound(_))
        ));
    }

    #[sqlx::test]
    async fn category_names_are_unique(pool: PgPool) {
        let controller = TaskController::new(pool);

        controller.create_category(&category("Basics")).await.unwrap();
        let advanced = controller.create_category(&category("Advanced")).await.unwrap();

        assert!(matches!(
            controller.create_category(&category("Basics")).await,
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            controller.update_category(advanced.id, &category("Basics")).await,
            Err(Error::Conflict(_))
        ));
    }
}
