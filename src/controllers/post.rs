use crate::core::error::Error;
use crate::types::request::{NewComment, NewPost};
use crate::types::response::{Author, Comment, LikeStatus, Post};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const DEFAULT_CATEGORY: &str = "General";

const COMMENT_AUTHOR_FKEY: &str = "comments_user_id_fkey";

const POST_SELECT: &str = "SELECT
        posts.id,
        posts.title,
        posts.content,
        posts.category,
        posts.created_at,
        users.id AS author_id,
        users.name || ' ' || users.surname AS author_name,
        users.avatar AS author_avatar,
        (SELECT COUNT(*) FROM post_likes WHERE post_likes.post_id = posts.id) AS likes,
        (SELECT COUNT(*) FROM comments WHERE comments.post_id = posts.id) AS comments
    FROM posts
    JOIN users ON users.id = posts.author_id";

#[derive(Clone, Debug)]
pub(crate) struct PostController {
    pool: PgPool,
}

impl PostController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_posts(&self, category: Option<&str>) -> Result<Vec<Post>, Error> {
        let posts = sqlx::query(&format!(
            "{POST_SELECT}
            WHERE $1::TEXT IS NULL OR posts.category = $1
            ORDER BY posts.created_at DESC, posts.id DESC;"
        ))
        .bind(category)
        .map(map_post)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub(crate) async fn get_post(&self, id: i32) -> Result<Post, Error> {
        match sqlx::query(&format!("{POST_SELECT} WHERE posts.id = $1;"))
            .bind(id)
            .map(map_post)
            .fetch_one(&self.pool)
            .await
        {
            Ok(post) => Ok(post),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Post not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn create_post(&self, author_id: i32, post: &NewPost) -> Result<Post, Error> {
        post.validate()?;

        let category = post
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let id: i32 = match sqlx::query(
            "INSERT INTO posts (author_id, title, content, category) VALUES ($1, $2, $3, $4) RETURNING id;",
        )
        .bind(author_id)
        .bind(post.title.as_deref().map(str::trim).filter(|t| !t.is_empty()))
        .bind(post.content.trim())
        .bind(category)
        .map(|row: PgRow| row.get("id"))
        .fetch_one(&self.pool)
        .await
        {
            Ok(id) => id,
            // The token outlived its account.
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(Error::NotFound("User not found"));
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        self.get_post(id).await
    }

    /// Adds the user's like if absent, removes it otherwise.
    pub(crate) async fn toggle_like(&self, post_id: i32, user_id: i32) -> Result<LikeStatus, Error> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1) AS found;")
            .bind(post_id)
            .map(|row: PgRow| row.get("found"))
            .fetch_one(&mut *tx)
            .await?;

        if !exists {
            return Err(Error::NotFound("Post not found"));
        }

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2;")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            match sqlx::query(
                "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING;",
            )
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            {
                Ok(_) => {}
                Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                    return Err(Error::NotFound("User not found"));
                }
                Err(e) => return Err(Error::Sql(e)),
            }
        }

        let likes: i64 = sqlx::query("SELECT COUNT(*) AS likes FROM post_likes WHERE post_id = $1;")
            .bind(post_id)
            .map(|row: PgRow| row.get("likes"))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(LikeStatus {
            likes,
            is_liked: removed == 0,
        })
    }

    pub(crate) async fn get_comments(&self, post_id: i32) -> Result<Vec<Comment>, Error> {
        let comments = sqlx::query(
            "SELECT
                comments.id,
                comments.post_id,
                comments.content,
                comments.created_at,
                users.id AS author_id,
                users.name || ' ' || users.surname AS author_name,
                users.avatar AS author_avatar
            FROM comments
            JOIN users ON users.id = comments.user_id
            WHERE comments.post_id = $1
            ORDER BY comments.created_at ASC, comments.id ASC;",
        )
        .bind(post_id)
        .map(map_comment)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub(crate) async fn add_comment(
        &self,
        post_id: i32,
        user_id: i32,
        comment: &NewComment,
    ) -> Result<Comment, Error> {
        comment.validate()?;

        match sqlx::query(
            "WITH inserted AS (
                INSERT INTO comments (post_id, user_id, content) VALUES ($1, $2, $3)
                RETURNING id, post_id, user_id, content, created_at
            )
            SELECT
                inserted.id,
                inserted.post_id,
                inserted.content,
                inserted.created_at,
                users.id AS author_id,
                users.name || ' ' || users.surname AS author_name,
                users.avatar AS author_avatar
            FROM inserted
            JOIN users ON users.id = inserted.user_id;",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(comment.content.trim())
        .map(map_comment)
        .fetch_one(&self.pool)
        .await
        {
            Ok(comment) => Ok(comment),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                match db_err.constraint() {
                    Some(COMMENT_AUTHOR_FKEY) => Err(Error::NotFound("User not found")),
                    _ => Err(Error::NotFound("Post not found")),
                }
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }
}

fn map_author(row: &PgRow) -> Author {
    Author {
        id: row.get("author_id"),
        name: row.get("author_name"),
        avatar: row.get("author_avatar"),
    }
}

fn map_post(row: PgRow) -> Post {
    Post {
        id: row.get("id"),
        author: map_author(&row),
        category: row.get("category"),
        title: row.get("title"),
        content: row.get("content"),
        likes: row.get("likes"),
        comments: row.get("comments"),
        timestamp: row.get("created_at"),
    }
}

fn map_comment(row: PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        author: map_author(&row),
        content: row.get("content"),
        timestamp: row.get("created_at"),
    }
}
