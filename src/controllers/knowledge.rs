use crate::core::error::Error;
use crate::types::request::{ArticleData, KnowledgeCategoryData};
use crate::types::response::{Article, KnowledgeCategory, KnowledgeStats};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const ARTICLE_COLUMNS: &str = "id, title, type, category, content, created_at::DATE AS date";

#[derive(Clone, Debug)]
pub(crate) struct KnowledgeController {
    pool: PgPool,
}

impl KnowledgeController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_categories(&self) -> Result<Vec<KnowledgeCategory>, Error> {
        let categories = sqlx::query(
            "SELECT id, title, description, icon FROM knowledge_categories ORDER BY id ASC;",
        )
        .map(map_category)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub(crate) async fn create_category(
        &self,
        category: &KnowledgeCategoryData,
    ) -> Result<KnowledgeCategory, Error> {
        category.validate()?;

        match sqlx::query(
            "INSERT INTO knowledge_categories (title, description, icon) VALUES ($1, $2, $3)
            RETURNING id, title, description, icon;",
        )
        .bind(category.title.trim())
        .bind(category.description.trim())
        .bind(category.icon.trim())
        .map(map_category)
        .fetch_one(&self.pool)
        .await
        {
            Ok(category) => Ok(category),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                Error::Conflict("Category with this title already exists"),
            ),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    /// Renaming a category carries its articles along.
    pub(crate) async fn update_category(
        &self,
        id: i32,
        category: &KnowledgeCategoryData,
    ) -> Result<KnowledgeCategory, Error> {
        category.validate()?;

        let mut tx = self.pool.begin().await?;

        let previous: String = match sqlx::query(
            "SELECT title FROM knowledge_categories WHERE id = $1 FOR UPDATE;",
        )
        .bind(id)
        .map(|row: PgRow| row.get("title"))
        .fetch_one(&mut *tx)
        .await
        {
            Ok(title) => title,
            Err(sqlx::Error::RowNotFound) => return Err(Error::NotFound("Category not found")),
            Err(e) => return Err(Error::Sql(e)),
        };

        let updated = match sqlx::query(
            "UPDATE knowledge_categories SET title = $1, description = $2, icon = $3
            WHERE id = $4
            RETURNING id, title, description, icon;",
        )
        .bind(category.title.trim())
        .bind(category.description.trim())
        .bind(category.icon.trim())
        .bind(id)
        .map(map_category)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(category) => category,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(Error::Conflict("Category with this title already exists"));
            }
            Err(e) => return Err(Error::Sql(e)),
        };

        sqlx::query("UPDATE knowledge_articles SET category = $1 WHERE category = $2;")
            .bind(&updated.title)
            .bind(&previous)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub(crate) async fn delete_category(&self, id: i32) -> Result<(), Error> {
        let articles: Option<i64> = match sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM knowledge_articles WHERE knowledge_articles.category = knowledge_categories.title) AS articles
            FROM knowledge_categories
            WHERE id = $1;",
        )
        .bind(id)
        .map(|row: PgRow| row.get("articles"))
        .fetch_one(&self.pool)
        .await
        {
            Ok(articles) => articles,
            Err(sqlx::Error::RowNotFound) => return Err(Error::NotFound("Category not found")),
            Err(e) => return Err(Error::Sql(e)),
        };

        if articles.unwrap_or_default() > 0 {
            return Err(Error::Conflict(
                "Cannot delete a category that still has articles",
            ));
        }

        let result = sqlx::query("DELETE FROM knowledge_categories WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Category not found"));
        }

        Ok(())
    }

    pub(crate) async fn get_articles(&self) -> Result<Vec<Article>, Error> {
        let articles = sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM knowledge_articles ORDER BY created_at DESC, id DESC;"
        ))
        .map(map_article)
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    pub(crate) async fn get_article(&self, id: i32) -> Result<Article, Error> {
        match sqlx::query(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM knowledge_articles WHERE id = $1;"
        ))
        .bind(id)
        .map(map_article)
        .fetch_one(&self.pool)
        .await
        {
            Ok(article) => Ok(article),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Article not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn create_article(&self, article: &ArticleData) -> Result<Article, Error> {
        article.validate()?;

        let article = sqlx::query(&format!(
            "INSERT INTO knowledge_articles (title, type, category, content) VALUES ($1, $2, $3, $4)
            RETURNING {ARTICLE_COLUMNS};"
        ))
        .bind(article.title.trim())
        .bind(article.kind.trim())
        .bind(article.category.trim())
        .bind(&article.content)
        .map(map_article)
        .fetch_one(&self.pool)
        .await?;

        Ok(article)
    }

    pub(crate) async fn update_article(
        &self,
        id: i32,
        article: &ArticleData,
    ) -> Result<Article, Error> {
        article.validate()?;

        match sqlx::query(&format!(
            "UPDATE knowledge_articles SET title = $1, type = $2, category = $3, content = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {ARTICLE_COLUMNS};"
        ))
        .bind(article.title.trim())
        .bind(article.kind.trim())
        .bind(article.category.trim())
        .bind(&article.content)
        .bind(id)
        .map(map_article)
        .fetch_one(&self.pool)
        .await
        {
            Ok(article) => Ok(article),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Article not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn delete_article(&self, id: i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM knowledge_articles WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Article not found"));
        }

        Ok(())
    }

    /// Removes every article and returns how many were deleted.
    pub(crate) async fn clear_articles(&self) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM knowledge_articles;")
            .execute(&self.pool)
            .await?;

        tracing::info!("Cleared {} knowledge articles", result.rows_affected());

        Ok(result.rows_affected())
    }

    pub(crate) async fn get_stats(&self) -> Result<KnowledgeStats, Error> {
        let stats = sqlx::query(
            "SELECT
                (SELECT COUNT(*) FROM knowledge_categories) AS categories,
                (SELECT COUNT(*) FROM knowledge_articles) AS articles;",
        )
        .map(|row: PgRow| KnowledgeStats {
            categories: row.get("categories"),
            articles: row.get("articles"),
        })
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

fn map_category(row: PgRow) -> KnowledgeCategory {
    KnowledgeCategory {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        icon: row.get("icon"),
    }
}

fn map_article(row: PgRow) -> Article {
    Article {
        id: row.get("id"),
        title: row.get("title"),
        kind: row.get("type"),
        category: row.get("category"),
        content: row.get("content"),
        date: row.get("date"),
    }
}
