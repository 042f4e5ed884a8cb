use crate::core::error::Error;
use crate::types::HelpStatus;
use crate::types::request::{HelpRequestData, MentorData};
use crate::types::response::{HelpRequest, Mentor};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

const REQUESTER_FKEY: &str = "help_requests_user_id_fkey";

const MENTOR_COLUMNS: &str =
    "id, name, specialization, experience, photo, description, skills, rating, reviews";

const REQUEST_SELECT: &str = "SELECT
        help_requests.id,
        help_requests.user_id,
        help_requests.mentor_id,
        mentors.name AS mentor_name,
        help_requests.topic,
        help_requests.description,
        help_requests.status,
        help_requests.created_at,
        help_requests.updated_at
    FROM help_requests
    JOIN mentors ON mentors.id = help_requests.mentor_id";

#[derive(Clone, Debug)]
pub(crate) struct HelpController {
    pool: PgPool,
}

impl HelpController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_mentors(&self) -> Result<Vec<Mentor>, Error> {
        let mentors = sqlx::query(&format!(
            "SELECT {MENTOR_COLUMNS} FROM mentors ORDER BY rating DESC, id ASC;"
        ))
        .map(map_mentor)
        .fetch_all(&self.pool)
        .await?;

        Ok(mentors)
    }

    pub(crate) async fn get_mentor(&self, id: i32) -> Result<Mentor, Error> {
        match sqlx::query(&format!("SELECT {MENTOR_COLUMNS} FROM mentors WHERE id = $1;"))
            .bind(id)
            .map(map_mentor)
            .fetch_one(&self.pool)
            .await
        {
            Ok(mentor) => Ok(mentor),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Mentor not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn create_mentor(&self, mentor: &MentorData) -> Result<Mentor, Error> {
        mentor.validate()?;

        let mentor = sqlx::query(&format!(
            "INSERT INTO mentors (name, specialization, experience, photo, description, skills)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MENTOR_COLUMNS};"
        ))
        .bind(mentor.name.trim())
        .bind(mentor.specialization.trim())
        .bind(mentor.experience.as_deref())
        .bind(mentor.photo.as_deref())
        .bind(mentor.description.as_deref())
        .bind(Json(&mentor.skills))
        .map(map_mentor)
        .fetch_one(&self.pool)
        .await?;

        Ok(mentor)
    }

    pub(crate) async fn create_request(
        &self,
        user_id: i32,
        request: &HelpRequestData,
    ) -> Result<HelpRequest, Error> {
        let mentor_id = request.mentor()?;

        let id: i32 = match sqlx::query(
            "INSERT INTO help_requests (user_id, mentor_id, topic, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id;",
        )
        .bind(user_id)
        .bind(mentor_id)
        .bind(request.topic.trim())
        .bind(request.description.trim())
        .bind(HelpStatus::Pending.as_str())
        .map(|row: PgRow| row.get("id"))
        .fetch_one(&self.pool)
        .await
        {
            Ok(id) => id,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return match db_err.constraint() {
                    Some(REQUESTER_FKEY) => Err(Error::NotFound("User not found")),
                    _ => Err(Error::NotFound("Mentor not found")),
                };
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        self.get_request(id).await
    }

    pub(crate) async fn get_request(&self, id: i32) -> Result<HelpRequest, Error> {
        match sqlx::query(&format!("{REQUEST_SELECT} WHERE help_requests.id = $1;"))
            .bind(id)
            .try_map(map_help_request)
            .fetch_one(&self.pool)
            .await
        {
            Ok(request) => Ok(request),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Help request not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    /// Requests of one user when `user_id` is set, every request otherwise.
    pub(crate) async fn get_requests(&self, user_id: Option<i32>) -> Result<Vec<HelpRequest>, Error> {
        let requests = sqlx::query(&format!(
            "{REQUEST_SELECT}
            WHERE $1::INTEGER IS NULL OR help_requests.user_id = $1
            ORDER BY help_requests.created_at DESC;"
        ))
        .bind(user_id)
        .try_map(map_help_request)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub(crate) async fn update_status(
        &self,
        id: i32,
        status: HelpStatus,
    ) -> Result<HelpRequest, Error> {
        let result = sqlx::query(
            "UPDATE help_requests SET status = $1, updated_at = NOW() WHERE id = $2;",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Help request not found"));
        }

        self.get_request(id).await
    }
}

fn map_mentor(row: PgRow) -> Mentor {
    let skills: Json<Vec<String>> = row.get("skills");

    Mentor {
        id: row.get("id"),
        name: row.get("name"),
        specialization: row.get("specialization"),
        experience: row.get("experience"),
        photo: row.get("photo"),
        description: row.get("description"),
        skills: skills.0,
        rating: row.get("rating"),
        reviews: row.get("reviews"),
    }
}

fn map_help_request(row: PgRow) -> Result<HelpRequest, sqlx::Error> {
    let status = row
        .try_get::<String, _>("status")?
        .parse::<HelpStatus>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(HelpRequest {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        mentor_id: row.try_get("mentor_id")?,
        mentor_name: row.try_get("mentor_name")?,
        topic: row.try_get("topic")?,
        description: row.try_get("description")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
