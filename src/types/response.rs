use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::types::{Difficulty, HelpStatus};
use crate::utils::rank::Rank;

/// Envelope shared by every successful response.
#[derive(Serialize)]
pub(crate) struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub(crate) fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct Health {
    pub(crate) status: &'static str,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service: &'static str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) surname: String,
    pub(crate) email: String,
    pub(crate) avatar: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) rank: Rank,
    pub(crate) rank_tier: u8,
    pub(crate) join_date: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Profile {
    #[serde(flatten)]
    pub(crate) user: User,
    pub(crate) posts_count: i64,
    pub(crate) help_requests: i64,
}

#[derive(Serialize)]
pub(crate) struct Login {
    pub(crate) user: User,
    pub(crate) token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminUser {
    pub(crate) username: String,
    pub(crate) role: &'static str,
    pub(crate) is_admin: bool,
}

#[derive(Serialize)]
pub(crate) struct AdminLogin {
    pub(crate) token: String,
    pub(crate) user: AdminUser,
}

#[derive(Serialize)]
pub(crate) struct Author {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) avatar: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Post {
    pub(crate) id: i32,
    pub(crate) author: Author,
    pub(crate) category: String,
    pub(crate) title: Option<String>,
    pub(crate) content: String,
    pub(crate) likes: i64,
    pub(crate) comments: i64,
    pub(crate) timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LikeStatus {
    pub(crate) likes: i64,
    pub(crate) is_liked: bool,
}

#[derive(Serialize)]
pub(crate) struct Comment {
    pub(crate) id: i32,
    pub(crate) post_id: i32,
    pub(crate) author: Author,
    pub(crate) content: String,
    pub(crate) timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub(crate) struct Event {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) full_description: Option<String>,
    pub(crate) date: NaiveDate,
    pub(crate) time: NaiveTime,
    pub(crate) location: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) organizer: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrationCheck {
    pub(crate) is_registered: bool,
}

#[derive(Serialize)]
pub(crate) struct Registrant {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) surname: String,
    pub(crate) email: String,
    pub(crate) rank: Rank,
    pub(crate) avatar: Option<String>,
    pub(crate) registration_date: DateTime<Utc>,
}

#[derive(Serialize)]
pub(crate) struct Registrations {
    pub(crate) registrations: Vec<Registrant>,
    pub(crate) count: usize,
}

#[derive(Serialize)]
pub(crate) struct Mentor {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) specialization: String,
    pub(crate) experience: Option<String>,
    pub(crate) photo: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) skills: Vec<String>,
    pub(crate) rating: f32,
    pub(crate) reviews: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HelpRequest {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) mentor_id: i32,
    pub(crate) mentor_name: String,
    pub(crate) topic: String,
    pub(crate) description: String,
    pub(crate) status: HelpStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub(crate) struct KnowledgeCategory {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) icon: String,
}

#[derive(Serialize)]
pub(crate) struct Article {
    pub(crate) id: i32,
    pub(crate) title: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) category: String,
    pub(crate) content: String,
    pub(crate) date: NaiveDate,
}

#[derive(Serialize)]
pub(crate) struct KnowledgeStats {
    pub(crate) categories: i64,
    pub(crate) articles: i64,
}

#[derive(Serialize)]
pub(crate) struct TaskCategory {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) description: String,
}

#[derive(Serialize)]
pub(crate) struct Task {
    pub(crate) id: i32,
    pub(crate) category_id: i32,
    pub(crate) category_name: Option<String>,
    pub(crate) difficulty: Difficulty,
    pub(crate) question: String,
    pub(crate) answer: String,
    pub(crate) solution: String,
    pub(crate) created_at: DateTime<Utc>,
}
