use crate::core::error::{self, Error};
use crate::types::request::{CreateUserData, RegisterData, UpdateProfileData};
use crate::types::response::{Profile, User};
use crate::utils::rank::Rank;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const USER_COLUMNS: &str = "id, name, surname, email, avatar, phone, bio, join_date";

/// A stored account together with its password hash. Never serialized.
struct Account {
    user: User,
    password_hash: String,
}

#[derive(Clone)]
pub(crate) struct UserController {
    pool: PgPool,
    email_pattern: Regex,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("email_pattern", &self.email_pattern.as_str())
            .finish()
    }
}

impl UserController {
    pub(crate) fn new(pool: PgPool) -> Result<Self, error::ConfigError> {
        Ok(Self {
            pool,
            email_pattern: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
        })
    }

    pub(crate) async fn register(&self, data: &RegisterData) -> Result<User, Error> {
        self.check_email(&data.email)?;
        data.validate()?;

        let name = data.name.trim();
        let surname = data.surname.trim();

        let avatar = match data.avatar.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(avatar) => avatar.to_string(),
            None => default_avatar(name, surname)?,
        };

        self.insert(
            name,
            surname,
            data.email.trim(),
            &data.password,
            Some(&avatar),
            data.phone.as_deref(),
            data.bio.as_deref(),
        )
        .await
    }

    pub(crate) async fn create(&self, data: &CreateUserData) -> Result<User, Error> {
        data.validate()?;
        self.check_email(&data.email)?;

        self.insert(
            data.name.trim(),
            data.surname.trim(),
            data.email.trim(),
            &data.password,
            None,
            data.phone.as_deref(),
            data.bio.as_deref(),
        )
        .await
    }

    pub(crate) async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let account = self
            .get_account_by_email(email.trim())
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if let false = bcrypt::verify(password, &account.password_hash)? {
            return Err(Error::InvalidCredentials);
        };

        Ok(account.user)
    }

    pub(crate) async fn get_users(&self) -> Result<Vec<User>, Error> {
        let users = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC;"
        ))
        .map(map_user)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub(crate) async fn delete(&self, id: i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found"));
        }

        Ok(())
    }

    pub(crate) async fn get_profile(&self, id: i32) -> Result<Profile, Error> {
        match sqlx::query(&format!(
            "SELECT
                {USER_COLUMNS},
                (SELECT COUNT(*) FROM posts WHERE posts.author_id = users.id) AS posts_count,
                (SELECT COUNT(*) FROM help_requests WHERE help_requests.user_id = users.id) AS help_requests
            FROM users
            WHERE id = $1;"
        ))
        .bind(id)
        .map(|row: PgRow| Profile {
            posts_count: row.get("posts_count"),
            help_requests: row.get("help_requests"),
            user: map_user(row),
        })
        .fetch_one(&self.pool)
        .await
        {
            Ok(profile) => Ok(profile),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("User not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn update_profile(
        &self,
        id: i32,
        data: &UpdateProfileData,
    ) -> Result<User, Error> {
        if let Some(email) = &data.email {
            self.check_email(email)?;
        }

        match sqlx::query(&format!(
            "UPDATE users SET
                name = COALESCE($1, name),
                surname = COALESCE($2, surname),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                bio = COALESCE($5, bio),
                avatar = COALESCE($6, avatar),
                updated_at = NOW()
            WHERE id = $7
            RETURNING {USER_COLUMNS};"
        ))
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.surname.as_deref().map(str::trim))
        .bind(data.email.as_deref().map(str::trim))
        .bind(data.phone.as_deref())
        .bind(data.bio.as_deref())
        .bind(data.avatar.as_deref())
        .bind(id)
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(user),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("User not found")),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                Error::Conflict("Email is already in use by another account"),
            ),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert(
        &self,
        name: &str,
        surname: &str,
        email: &str,
        password: &str,
        avatar: Option<&str>,
        phone: Option<&str>,
        bio: Option<&str>,
    ) -> Result<User, Error> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

        match sqlx::query(&format!(
            "INSERT INTO users (name, surname, email, password_hash, avatar, phone, bio, rank, join_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS};"
        ))
        .bind(name)
        .bind(surname)
        .bind(email)
        .bind(&password_hash)
        .bind(avatar)
        .bind(phone)
        .bind(bio)
        .bind(Rank::Newcomer.label())
        .bind(Utc::now().date_naive())
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UserAlreadyExists)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        match sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1;"
        ))
        .bind(email)
        .map(|row: PgRow| Account {
            password_hash: row.get("password_hash"),
            user: map_user(row),
        })
        .fetch_one(&self.pool)
        .await
        {
            Ok(account) => Ok(Some(account)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    fn check_email(&self, email: &str) -> Result<(), Error> {
        if !self.email_pattern.is_match(email.trim()) {
            return Err(Error::validation("Please provide a valid email address"));
        }

        Ok(())
    }
}

fn default_avatar(name: &str, surname: &str) -> Result<String, Error> {
    let full_name = format!("{name} {surname}");
    let query = serde_urlencoded::to_string(&[
        ("name", full_name.as_str()),
        ("background", "6366f1"),
        ("color", "fff"),
    ])?;

    Ok(format!("https://ui-avatars.com/api/?{query}"))
}

fn map_user(row: PgRow) -> User {
    let join_date: NaiveDate = row.get("join_date");
    let rank = Rank::for_join_date(join_date, Utc::now());

    User {
        id: row.get("id"),
        name: row.get("name"),
        surname: row.get("surname"),
        email: row.get("email"),
        avatar: row.get("avatar"),
        phone: row.get("phone"),
        bio: row.get("bio"),
        rank,
        rank_tier: rank.tier(),
        join_date,
    }
}
