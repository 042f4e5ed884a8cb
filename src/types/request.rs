use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::core::error::Error;
use crate::types::{Difficulty, HelpStatus};

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Deserialize)]
pub(crate) struct RegisterData {
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) surname: String,
    pub(crate) phone: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) avatar: Option<String>,
}

impl RegisterData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.password.chars().count() < 6 {
            return Err(Error::validation("Password must be at least 6 characters"));
        }

        if self.name.trim().chars().count() < 2 {
            return Err(Error::validation("Name must be at least 2 characters"));
        }

        if self.surname.trim().chars().count() < 2 {
            return Err(Error::validation("Surname must be at least 2 characters"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub(crate) struct LoginData {
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
}

impl LoginData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if blank(&self.email) || self.password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub(crate) struct AdminLoginData {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
}

#[derive(Deserialize)]
pub(crate) struct CreateUserData {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) surname: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) password: String,
    pub(crate) phone: Option<String>,
    pub(crate) bio: Option<String>,
}

impl CreateUserData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if [&self.name, &self.surname, &self.email, &self.password]
            .into_iter()
            .any(|value| blank(value))
        {
            return Err(Error::validation(
                "Name, surname, email and password are required",
            ));
        }

        Ok(())
    }
}

#[derive(Deserialize, Default)]
pub(crate) struct UpdateProfileData {
    pub(crate) name: Option<String>,
    pub(crate) surname: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostsQuery {
    pub(crate) category: Option<String>,
}

impl PostsQuery {
    /// `All` and an empty value both mean no filter.
    pub(crate) fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty() && !category.eq_ignore_ascii_case("all"))
    }
}

#[derive(Deserialize)]
pub(crate) struct NewPost {
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) content: String,
    pub(crate) category: Option<String>,
}

impl NewPost {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if blank(&self.content) {
            return Err(Error::validation("Post content cannot be empty"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub(crate) struct NewComment {
    #[serde(default)]
    pub(crate) content: String,
}

impl NewComment {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if blank(&self.content) {
            return Err(Error::validation("Comment cannot be empty"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub(crate) struct EventData {
    #[serde(default)]
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) full_description: Option<String>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) time: Option<NaiveTime>,
    pub(crate) location: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) organizer: Option<String>,
}

impl EventData {
    /// Returns the required date and time once the payload is known to be complete.
    pub(crate) fn schedule(&self) -> Result<(NaiveDate, NaiveTime), Error> {
        match (blank(&self.title), self.date, self.time) {
            (false, Some(date), Some(time)) => Ok((date, time)),
            _ => Err(Error::validation(
                "Title, date and time are required",
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MentorData {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) specialization: String,
    pub(crate) experience: Option<String>,
    pub(crate) photo: Option<String>,
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) skills: Vec<String>,
}

impl MentorData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if blank(&self.name) || blank(&self.specialization) {
            return Err(Error::validation("Name and specialization are required"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HelpRequestData {
    pub(crate) mentor_id: Option<i32>,
    #[serde(default)]
    pub(crate) topic: String,
    #[serde(default)]
    pub(crate) description: String,
}

impl HelpRequestData {
    /// Returns the addressed mentor once the payload is known to be complete.
    pub(crate) fn mentor(&self) -> Result<i32, Error> {
        match self.mentor_id {
            Some(mentor_id) if !blank(&self.topic) && !blank(&self.description) => Ok(mentor_id),
            _ => Err(Error::validation(
                "Mentor, topic and description are required",
            )),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct HelpStatusData {
    #[serde(default)]
    pub(crate) status: String,
}

impl HelpStatusData {
    pub(crate) fn status(&self) -> Result<HelpStatus, Error> {
        self.status.parse().map_err(|_| {
            Error::validation("Invalid status. Allowed: pending, in_progress, completed, cancelled")
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct KnowledgeCategoryData {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) icon: String,
}

impl KnowledgeCategoryData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if blank(&self.title) || blank(&self.description) || blank(&self.icon) {
            return Err(Error::validation("All fields are required"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub(crate) struct ArticleData {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(rename = "type", default)]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) content: String,
}

impl ArticleData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if [&self.title, &self.kind, &self.category, &self.content]
            .into_iter()
            .any(|value| blank(value))
        {
            return Err(Error::validation("All fields are required"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub(crate) struct TaskCategoryData {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) description: Option<String>,
}

impl TaskCategoryData {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if blank(&self.name) {
            return Err(Error::validation("Category name is required"));
        }

        Ok(())
    }

    pub(crate) fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize)]
pub(crate) struct TaskData {
    pub(crate) category_id: Option<i32>,
    #[serde(default)]
    pub(crate) difficulty: String,
    #[serde(default)]
    pub(crate) question: String,
    #[serde(default)]
    pub(crate) answer: String,
    #[serde(default)]
    pub(crate) solution: String,
}

impl TaskData {
    /// Returns the category and difficulty once the payload is known to be complete.
    pub(crate) fn checked(&self) -> Result<(i32, Difficulty), Error> {
        let category_id = match self.category_id {
            Some(category_id)
                if ![&self.difficulty, &self.question, &self.answer, &self.solution]
                    .into_iter()
                    .any(|value| blank(value)) =>
            {
                category_id
            }
            _ => return Err(Error::validation("All fields are required")),
        };

        let difficulty = self.difficulty.parse().map_err(|_| {
            Error::validation("Invalid difficulty. Allowed: easy, medium, hard")
        })?;

        Ok((category_id, difficulty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_data() -> RegisterData {
        RegisterData {
            email: "ada@example.org".into(),
            password: "secret1".into(),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            phone: None,
            bio: None,
            avatar: None,
        }
    }

    #[test]
    fn registration_rules() {
        assert!(register_data().validate().is_ok());

        let mut data = register_data();
        data.password = "12345".into();
        assert!(matches!(data.validate(), Err(Error::Validation(_))));

        let mut data = register_data();
        data.name = " A ".into();
        assert!(data.validate().is_err());

        let mut data = register_data();
        data.surname = "Ли".into();
        assert!(data.validate().is_ok());
    }

    #[test]
    fn posts_query_treats_all_as_unfiltered() {
        let query = |category: Option<&str>| PostsQuery {
            category: category.map(String::from),
        };

        assert_eq!(query(None).category(), None);
        assert_eq!(query(Some("All")).category(), None);
        assert_eq!(query(Some("  ")).category(), None);
        assert_eq!(query(Some("Frontend")).category(), Some("Frontend"));
    }

    #[test]
    fn event_needs_title_date_and_time() {
        let event: EventData = serde_json::from_value(serde_json::json!({
            "title": "Meetup",
            "date": "2025-04-01",
            "time": "18:30:00",
        }))
        .unwrap();
        assert!(event.schedule().is_ok());

        let event: EventData = serde_json::from_value(serde_json::json!({
            "title": "Meetup",
            "date": "2025-04-01",
        }))
        .unwrap();
        assert!(event.schedule().is_err());
    }

    fn task(value: serde_json::Value) -> TaskData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn task_difficulty_is_restricted() {
        let checked = task(serde_json::json!({
            "category_id": 1,
            "difficulty": "extreme",
            "question": "q",
            "answer": "a",
            "solution": "s",
        }))
        .checked();
        assert!(matches!(
            checked,
            Err(Error::Validation(message)) if message.starts_with("Invalid difficulty")
        ));

        let checked = task(serde_json::json!({
            "category_id": 1,
            "difficulty": "hard",
            "question": "q",
            "answer": " ",
            "solution": "s",
        }))
        .checked();
        assert!(matches!(
            checked,
            Err(Error::Validation(message)) if message == "All fields are required"
        ));

        let checked = task(serde_json::json!({
            "category_id": 3,
            "difficulty": "medium",
            "question": "q",
            "answer": "a",
            "solution": "s",
        }))
        .checked();
        assert!(matches!(checked, Ok((3, Difficulty::Medium))));
    }

    #[test]
    fn task_without_category_is_incomplete() {
        let checked = task(serde_json::json!({
            "difficulty": "easy",
            "question": "q",
            "answer": "a",
            "solution": "s",
        }))
        .checked();

        assert!(matches!(
            checked,
            Err(Error::Validation(message)) if message == "All fields are required"
        ));
    }

    #[test]
    fn missing_registration_fields_fail_validation() {
        let data: RegisterData = serde_json::from_value(serde_json::json!({
            "email": "ada@example.org",
            "password": "secret1",
            "name": "Ada",
        }))
        .unwrap();

        assert!(matches!(
            data.validate(),
            Err(Error::Validation(message)) if message.starts_with("Surname")
        ));
    }

    #[test]
    fn login_needs_both_fields() {
        let data: LoginData =
            serde_json::from_value(serde_json::json!({ "email": "ada@example.org" })).unwrap();
        assert!(data.validate().is_err());

        let data: LoginData = serde_json::from_value(serde_json::json!({
            "email": "ada@example.org",
            "password": "secret1",
        }))
        .unwrap();
        assert!(data.validate().is_ok());
    }

    #[test]
    fn help_request_needs_a_mentor() {
        let data: HelpRequestData = serde_json::from_value(serde_json::json!({
            "topic": "Lifetimes",
            "description": "Borrow checker trouble",
        }))
        .unwrap();
        assert!(data.mentor().is_err());

        let data: HelpRequestData = serde_json::from_value(serde_json::json!({
            "mentorId": 4,
            "topic": "Lifetimes",
            "description": "Borrow checker trouble",
        }))
        .unwrap();
        assert_eq!(data.mentor().unwrap(), 4);
    }

    #[test]
    fn help_status_is_restricted() {
        let data = |status: &str| HelpStatusData {
            status: status.into(),
        };

        assert!(matches!(data("in_progress").status(), Ok(HelpStatus::InProgress)));
        assert!(data("done").status().is_err());
        assert!(data("").status().is_err());
    }

    #[test]
    fn task_category_description_defaults_to_empty() {
        let data = TaskCategoryData {
            name: "Algorithms".into(),
            description: None,
        };

        assert!(data.validate().is_ok());
        assert_eq!(data.description(), "");
    }
}
