//! Gated content: courses, vlogs and course lessons.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::{ContentId, LessonId, ValidationError};

/// Discriminates the two kinds of gated content sharing one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Course,
    Vlog,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Course => "course",
            ContentType::Vlog => "vlog",
        }
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "course" => Ok(ContentType::Course),
            "vlog" => Ok(ContentType::Vlog),
            other => Err(ValidationError::invalid_format(
                "content_type",
                format!("unknown content type '{}'", other),
            )),
        }
    }
}

/// A course or vlog with its visibility flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub id: ContentId,
    pub content_type: ContentType,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_published: bool,
    pub is_premium: bool,
    /// Club content is the subscription-gated subset of premium content.
    pub is_in_club: bool,
    /// Individual sale price, when sold on its own.
    pub price: Option<Decimal>,
}

impl Content {
    /// Checks the flag invariant: club membership implies premium.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if self.is_in_club && !self.is_premium {
            return Err(ValidationError::invalid_format(
                "is_in_club",
                "club content must also be premium",
            ));
        }
        Ok(())
    }

    /// Metadata needed to render the content header or its paywall.
    pub fn summary(&self) -> ContentSummary {
        ContentSummary {
            id: self.id,
            content_type: self.content_type,
            title: self.title.clone(),
            description: self.description.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            price: self.price,
            is_premium: self.is_premium,
            is_in_club: self.is_in_club,
        }
    }
}

/// Content metadata carried on an access decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: ContentId,
    pub content_type: ContentType,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: Option<Decimal>,
    pub is_premium: bool,
    pub is_in_club: bool,
}

/// A lesson inside a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub content_id: ContentId,
    pub title: String,
    pub body: Option<String>,
    pub video_url: Option<String>,
    pub position: i32,
    /// Free lessons are viewable without course-level access.
    pub is_free: bool,
}
