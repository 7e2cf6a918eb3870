//! AccessGuard - turns access decisions into page outcomes.

use std::sync::Arc;

use crate::domain::entitlement::{AccessDecision, AccessReason, ContentSummary, ContentType, Lesson};
use crate::domain::foundation::{ContentId, LessonId, UserId};
use crate::ports::ContentReader;

use super::resolve_access::{ResolveAccessHandler, ResolveAccessQuery};

/// What unlocked a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockedBy {
    /// Course-level entitlement.
    Access(AccessReason),
    /// The lesson is free, whatever the course decision was.
    FreeLesson,
}

impl UnlockedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockedBy::Access(reason) => reason.as_str(),
            UnlockedBy::FreeLesson => "free_lesson",
        }
    }
}

/// Content the caller may see.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    pub content: ContentSummary,
    pub lesson: Option<Lesson>,
    pub unlocked_by: UnlockedBy,
}

/// Outcome of guarding a page.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Render(Grant),
    /// Upsell built from the resolver's metadata.
    Paywall {
        content: ContentSummary,
        reason: AccessReason,
    },
    NotFound,
    /// Send the caller to log in, then back to `return_to`.
    Login { return_to: String },
    /// Internal failure. Access is denied without detail.
    Deny,
}

/// Guards course, vlog and lesson pages.
pub struct AccessGuard {
    resolver: Arc<ResolveAccessHandler>,
    contents: Arc<dyn ContentReader>,
}

impl AccessGuard {
    pub fn new(resolver: Arc<ResolveAccessHandler>, contents: Arc<dyn ContentReader>) -> Self {
        Self { resolver, contents }
    }

    /// Guards a course or vlog page.
    ///
    /// `return_to` is the path the caller asked for; it is carried through a
    /// login redirect. Unpublished content and content of the wrong type are
    /// not found.
    pub async fn guard_content(
        &self,
        caller: Option<&UserId>,
        content_id: ContentId,
        expected_type: ContentType,
        return_to: &str,
    ) -> GuardOutcome {
        let decision = self
            .resolver
            .handle_published(ResolveAccessQuery::new(caller.cloned(), content_id))
            .await;

        if decision
            .content
            .as_ref()
            .map_or(false, |c| c.content_type != expected_type)
        {
            return GuardOutcome::NotFound;
        }

        outcome_for(decision, return_to)
    }

    /// Guards a lesson page inside a course.
    ///
    /// Course access is resolved first. A free lesson lifts a paywall
    /// denial only; it never bypasses login, not-found or internal errors.
    pub async fn guard_lesson(
        &self,
        caller: Option<&UserId>,
        course_id: ContentId,
        lesson_id: LessonId,
        return_to: &str,
    ) -> GuardOutcome {
        let course = self
            .guard_content(caller, course_id, ContentType::Course, return_to)
            .await;

        match course {
            GuardOutcome::Render(grant) => match self.load_lesson(course_id, lesson_id).await {
                Ok(Some(lesson)) => GuardOutcome::Render(Grant {
                    lesson: Some(lesson),
                    ..grant
                }),
                Ok(None) => GuardOutcome::NotFound,
                Err(()) => GuardOutcome::Deny,
            },
            GuardOutcome::Paywall { content, reason } => {
                match self.load_lesson(course_id, lesson_id).await {
                    Ok(Some(lesson)) if lesson.is_free => GuardOutcome::Render(Grant {
                        content,
                        lesson: Some(lesson),
                        unlocked_by: UnlockedBy::FreeLesson,
                    }),
                    Ok(Some(_)) => GuardOutcome::Paywall { content, reason },
                    Ok(None) => GuardOutcome::NotFound,
                    Err(()) => GuardOutcome::Deny,
                }
            }
            other => other,
        }
    }

    /// Loads a lesson only if it belongs to the course. Errors are logged.
    async fn load_lesson(
        &self,
        course_id: ContentId,
        lesson_id: LessonId,
    ) -> Result<Option<Lesson>, ()> {
        match self.contents.find_lesson(&lesson_id).await {
            Ok(lesson) => Ok(lesson.filter(|l| l.content_id == course_id)),
            Err(error) => {
                tracing::error!(
                    course_id = %course_id,
                    lesson_id = %lesson_id,
                    error = %error,
                    "Lesson lookup failed, denying"
                );
                Err(())
            }
        }
    }
}

fn outcome_for(decision: AccessDecision, return_to: &str) -> GuardOutcome {
    let reason = decision.reason;
    match (decision.has_access, decision.content) {
        (true, Some(content)) => GuardOutcome::Render(Grant {
            content,
            lesson: None,
            unlocked_by: UnlockedBy::Access(reason),
        }),
        (false, Some(content)) if reason.is_entitlement_denial() => {
            GuardOutcome::Paywall { content, reason }
        }
        _ => match reason {
            // A dangling session is treated like no session.
            AccessReason::NotAuthenticated | AccessReason::UserNotFound => GuardOutcome::Login {
                return_to: return_to.to_string(),
            },
            AccessReason::CourseNotFound | AccessReason::Unpublished => GuardOutcome::NotFound,
            _ => GuardOutcome::Deny,
        },
    }
}
