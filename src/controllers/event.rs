use crate::core::error::Error;
use crate::types::request::EventData;
use crate::types::response::{Event, Registrant};
use crate::utils::rank::Rank;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const REGISTRANT_FKEY: &str = "event_registrations_user_id_fkey";

const EVENT_COLUMNS: &str = "id, title, description, full_description, date, time, location, image, category, organizer, created_at, updated_at";

#[derive(Clone, Debug)]
pub(crate) struct EventController {
    pool: PgPool,
}

impl EventController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_events(&self) -> Result<Vec<Event>, Error> {
        let events = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, time ASC;"
        ))
        .map(map_event)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub(crate) async fn get_event(&self, id: i32) -> Result<Event, Error> {
        match sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1;"))
            .bind(id)
            .map(map_event)
            .fetch_one(&self.pool)
            .await
        {
            Ok(event) => Ok(event),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Event not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn create_event(&self, event: &EventData) -> Result<Event, Error> {
        let (date, time) = event.schedule()?;

        let event = sqlx::query(&format!(
            "INSERT INTO events (title, description, full_description, date, time, location, image, category, organizer)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EVENT_COLUMNS};"
        ))
        .bind(event.title.trim())
        .bind(event.description.as_deref())
        .bind(event.full_description.as_deref())
        .bind(date)
        .bind(time)
        .bind(event.location.as_deref())
        .bind(event.image.as_deref())
        .bind(event.category.as_deref())
        .bind(event.organizer.as_deref())
        .map(map_event)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    pub(crate) async fn update_event(&self, id: i32, event: &EventData) -> Result<Event, Error> {
        let (date, time) = event.schedule()?;

        match sqlx::query(&format!(
            "UPDATE events SET
                title = $1,
                description = $2,
                full_description = $3,
                date = $4,
                time = $5,
                location = $6,
                image = $7,
                category = $8,
                organizer = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {EVENT_COLUMNS};"
        ))
        .bind(event.title.trim())
        .bind(event.description.as_deref())
        .bind(event.full_description.as_deref())
        .bind(date)
        .bind(time)
        .bind(event.location.as_deref())
        .bind(event.image.as_deref())
        .bind(event.category.as_deref())
        .bind(event.organizer.as_deref())
        .bind(id)
        .map(map_event)
        .fetch_one(&self.pool)
        .await
        {
            Ok(event) => Ok(event),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Event not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn delete_event(&self, id: i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Event not found"));
        }

        Ok(())
    }

    pub(crate) async fn is_registered(&self, event_id: i32, user_id: i32) -> Result<bool, Error> {
        let registered = sqlx::query(
            "SELECT EXISTS (
                SELECT 1 FROM event_registrations WHERE event_id = $1 AND user_id = $2
            ) AS registered;",
        )
        .bind(event_id)
        .bind(user_id)
        .map(|row: PgRow| row.get("registered"))
        .fetch_one(&self.pool)
        .await?;

        Ok(registered)
    }

    pub(crate) async fn register(&self, event_id: i32, user_id: i32) -> Result<(), Error> {
        match sqlx::query("INSERT INTO event_registrations (event_id, user_id) VALUES ($1, $2);")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
        {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                Error::Conflict("You are already registered for this event"),
            ),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                match db_err.constraint() {
                    Some(REGISTRANT_FKEY) => Err(Error::NotFound("User not found")),
                    _ => Err(Error::NotFound("Event not found")),
                }
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn unregister(&self, event_id: i32, user_id: i32) -> Result<(), Error> {
        let result =
            sqlx::query("DELETE FROM event_registrations WHERE event_id = $1 AND user_id = $2;")
                .bind(event_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Registration not found"));
        }

        Ok(())
    }

    pub(crate) async fn get_registrations(&self, event_id: i32) -> Result<Vec<Registrant>, Error> {
        // Unknown events are a 404, not an empty list.
        self.get_event(event_id).await?;

        let now = Utc::now();

        let registrants = sqlx::query(
            "SELECT
                users.id,
                users.name,
                users.surname,
                users.email,
                users.avatar,
                users.join_date,
                event_registrations.created_at AS registration_date
            FROM event_registrations
            JOIN users ON users.id = event_registrations.user_id
            WHERE event_registrations.event_id = $1
            ORDER BY event_registrations.created_at ASC;",
        )
        .bind(event_id)
        .map(move |row: PgRow| Registrant {
            id: row.get("id"),
            name: row.get("name"),
            surname: row.get("surname"),
            email: row.get("email"),
            rank: Rank::for_join_date(row.get("join_date"), now),
            avatar: row.get("avatar"),
            registration_date: row.get("registration_date"),
        })
        .fetch_all(&self.pool)
        .await?;

        Ok(registrants)
    }
}

fn map_event(row: PgRow) -> Event {
    Event {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        full_description: row.get("full_description"),
        date: row.get("date"),
        time: row.get("time"),
        location: row.get("location"),
        image: row.get("image"),
        category: row.get("category"),
        organizer: row.get("organizer"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fixtures;

    fn meetup() -> EventData {
        serde_json::from_value(serde_json::json!({
            "title": "Rust meetup",
            "date": "2025-04-01",
            "time": "18:30:00",
        }))
        .unwrap()
    }

    #[sqlx::test]
    async fn registration_is_once_per_member(pool: PgPool) {
        let ada = fixtures::member(&pool, "ada@example.org").await;
        let controller = EventController::new(pool);
        let event = controller.create_event(&meetup()).await.unwrap();

        assert!(!controller.is_registered(event.id, ada).await.unwrap());

        controller.register(event.id, ada).await.unwrap();
        assert!(controller.is_registered(event.id, ada).await.unwrap());

        assert!(matches!(
            controller.register(event.id, ada).await,
            Err(Error::Conflict(_))
        ));

        let registrants = controller.get_registrations(event.id).await.unwrap();
        assert_eq!(registrants.len(), 1);
        assert_eq!(registrants[0].email, "ada@example.org");
        assert_eq!(registrants[0].rank, Rank::Newcomer);

        controller.unregister(event.id, ada).await.unwrap();
        assert!(matches!(
            controller.unregister(event.id, ada).await,
            Err(Error::NotFound(_))
        ));
    }

    #[sqlx::test]
    async fn registration_names_the_missing_reference(pool: PgPool) {
        let ada = fixtures::member(&pool, "ada@example.org").await;
        let controller = EventController::new(pool);
        let event = controller.create_event(&meetup()).await.unwrap();

        assert!(matches!(
            controller.register(999, ada).await,
            Err(Error::NotFound("Event not found"))
        ));
        assert!(matches!(
            controller.register(event.id, 999).await,
            Err(Error::NotFound("User not found"))
        ));
        assert!(matches!(
            controller.get_registrations(999).await,
            Err(Error::NotFound(_))
        ));
    }
}
