//! # Pitch Persistence
//!
//! The only writer of new pitch records. Re-runs the schema on whatever the
//! form sent, requires a resolved session, and derives the document id from
//! the title with a random suffix to break collisions.
use chrono::Utc;
use tracing::info;

use crate::{
    error::AppError,
    sessions::Session,
    store::{ContentStore, PitchRecord, StoreError},
    utils::{short_suffix, slugify},
    validation::{PitchDraft, ValidatedPitch, validate},
};

const ID_ATTEMPTS: usize = 4;

pub async fn create_pitch(
    store: &dyn ContentStore,
    session: Option<&Session>,
    draft: &PitchDraft,
) -> Result<PitchRecord, AppError> {
    let Some(session) = session else {
        return Err(AppError::Unauthorized);
    };

    let validated = validate(draft).map_err(AppError::ValidationFailed)?;

    let base = slugify(&validated.title);

    for attempt in 0..ID_ATTEMPTS {
        let id = derive_id(&base, attempt);
        let record = build_record(id, &session.identity, &validated);

        match store.create_pitch(&record).await {
            Ok(()) => {
                info!("Created pitch {} for {}", record.id, record.author_id);
                return Ok(record);
            }
            Err(StoreError::Conflict(_)) => continue,
            Err(error) => return Err(error.into()),
        }
    }

    Err(AppError::Unexpected)
}

// First try the bare slug, then salt it. Titles that sanitize to nothing
// (all symbols) go straight to a random id.
fn derive_id(base: &str, attempt: usize) -> String {
    if base.is_empty() {
        return short_suffix();
    }

    if attempt == 0 {
        return base.to_string();
    }

    format!("{base}-{}", short_suffix())
}

fn build_record(id: String, author_id: &str, validated: &ValidatedPitch) -> PitchRecord {
    PitchRecord {
        id,
        author_id: author_id.to_string(),
        title: validated.title.clone(),
        description: validated.description.clone(),
        category: validated.category.clone(),
        link: validated.link.clone(),
        pitch_body: validated.pitch_body.clone(),
        views: 0,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        memory::MemoryStore,
        sessions::{AuthorDisplay, SessionProvider},
        store::ReadMode,
    };

    fn signed_in(provider: &SessionProvider) -> Session {
        provider.sign_in(
            "ada",
            AuthorDisplay {
                name: "Ada".to_string(),
                avatar: "https://example.com/ada.png".to_string(),
            },
        )
    }

    fn valid_draft() -> PitchDraft {
        PitchDraft {
            title: "Acme".to_string(),
            description: "A reusable rocket for regional deliveries".to_string(),
            category: "Tech".to_string(),
            link: "https://x.com".to_string(),
            pitch_body: "Rockets, but affordable".to_string(),
        }
    }

    #[tokio::test]
    async fn stamps_author_views_and_timestamp() {
        let store = MemoryStore::new();
        let sessions = SessionProvider::new();
        let session = signed_in(&sessions);

        let record = create_pitch(&store, Some(&session), &valid_draft())
            .await
            .unwrap();

        assert_eq!(record.id, "acme");
        assert_eq!(record.author_id, "ada");
        assert_eq!(record.views, 0);

        // Visible to a read immediately after the write.
        let stored = store
            .fetch_pitch("acme", ReadMode::BypassCache)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn unauthorized_without_session_and_no_write() {
        let store = MemoryStore::new();

        let result = create_pitch(&store, None, &valid_draft()).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
        assert_eq!(store.pitch_count(), 0);
    }

    #[tokio::test]
    async fn rejects_invalid_draft_with_field_errors() {
        let store = MemoryStore::new();
        let sessions = SessionProvider::new();
        let session = signed_in(&sessions);

        let mut draft = valid_draft();
        draft.link = "not-a-url".to_string();

        let result = create_pitch(&store, Some(&session), &draft).await;

        match result {
            Err(AppError::ValidationFailed(errors)) => {
                assert!(errors.get("link").is_some());
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(store.pitch_count(), 0);
    }

    #[tokio::test]
    async fn colliding_titles_get_distinct_ids() {
        let store = MemoryStore::new();
        let sessions = SessionProvider::new();
        let session = signed_in(&sessions);

        let first = create_pitch(&store, Some(&session), &valid_draft())
            .await
            .unwrap();
        let second = create_pitch(&store, Some(&session), &valid_draft())
            .await
            .unwrap();

        assert_eq!(first.id, "acme");
        assert_ne!(second.id, first.id);
        assert!(second.id.starts_with("acme-"));
        assert_eq!(store.pitch_count(), 2);
    }

    #[tokio::test]
    async fn symbol_only_title_still_gets_an_id() {
        let store = MemoryStore::new();
        let sessions = SessionProvider::new();
        let session = signed_in(&sessions);

        let mut draft = valid_draft();
        draft.title = "!!!".to_string();

        let record = create_pitch(&store, Some(&session), &draft).await.unwrap();
        assert!(!record.id.is_empty());
    }
}
