//! Content reader port (read side of content management).

use async_trait::async_trait;

use crate::domain::entitlement::{Content, Lesson};
use crate::domain::foundation::{ContentId, DomainError, LessonId};

/// Read-only access to courses, vlogs and lessons.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Find content by id, published or not.
    async fn find_content(&self, id: &ContentId) -> Result<Option<Content>, DomainError>;

    /// Find a lesson by id.
    async fn find_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, DomainError>;
}
