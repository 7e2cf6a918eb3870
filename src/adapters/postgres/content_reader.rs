//! PostgreSQL implementation of ContentReader.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::{Content, ContentType, Lesson};
use crate::domain::foundation::{ContentId, DomainError, ErrorCode, LessonId};
use crate::ports::ContentReader;

use super::database_error;

pub struct PostgresContentReader {
    pool: PgPool,
}

impl PostgresContentReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    content_type: String,
    title: String,
    description: Option<String>,
    thumbnail_url: Option<String>,
    is_published: bool,
    is_premium: bool,
    is_in_club: bool,
    price: Option<Decimal>,
}

impl TryFrom<ContentRow> for Content {
    type Error = DomainError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let content_type = row.content_type.parse::<ContentType>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid content row: {}", e))
        })?;
        Ok(Content {
            id: ContentId::from_uuid(row.id),
            content_type,
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            is_published: row.is_published,
            is_premium: row.is_premium,
            is_in_club: row.is_in_club,
            price: row.price,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: Uuid,
    content_id: Uuid,
    title: String,
    body: Option<String>,
    video_url: Option<String>,
    position: i32,
    is_free: bool,
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Lesson {
            id: LessonId::from_uuid(row.id),
            content_id: ContentId::from_uuid(row.content_id),
            title: row.title,
            body: row.body,
            video_url: row.video_url,
            position: row.position,
            is_free: row.is_free,
        }
    }
}

#[async_trait]
impl ContentReader for PostgresContentReader {
    async fn find_content(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        let row: Option<ContentRow> = sqlx::query_as(
            r#"
            SELECT id, content_type, title, description, thumbnail_url,
                   is_published, is_premium, is_in_club, price
            FROM contents
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find content", e))?;

        row.map(Content::try_from).transpose()
    }

    async fn find_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, DomainError> {
        let row: Option<LessonRow> = sqlx::query_as(
            r#"
            SELECT id, content_id, title, body, video_url, position, is_free
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find lesson", e))?;

        Ok(row.map(Lesson::from))
    }
}
