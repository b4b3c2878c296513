use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    sessions::{AuthorDisplay, Session},
    state::AppState,
    store::{AuthorProfile, PitchRecord},
    submission::{self, Notice, SubmissionState, SubmissionStatus},
    validation::{FieldErrors, PitchDraft},
    views,
};

#[derive(Deserialize)]
pub struct SubmitPayload {
    #[serde(flatten)]
    draft: PitchDraft,

    #[serde(default)]
    previous: Option<SubmissionState>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    status: SubmissionStatus,
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    field_errors: FieldErrors,

    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<String>,

    notice: Notice,
}

/// The server action behind the startup form. Submission failures come
/// back as `status: "ERROR"` in a 200, the transport only fails when the
/// caller is not signed in at all.
pub async fn submit_pitch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SubmitPayload>,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .sessions
        .from_headers(&headers)
        .ok_or(AppError::Unauthorized)?;

    let previous = payload.previous.unwrap_or_else(SubmissionState::initial);

    let outcome = submission::submit(
        state.store.as_ref(),
        Some(&session),
        &payload.draft,
        &previous,
    )
    .await;

    Ok(Json(SubmitResponse {
        status: outcome.state.status,
        error: outcome.state.error,
        id: outcome.state.result_id,
        field_errors: outcome.field_errors,
        redirect: outcome.redirect,
        notice: outcome.notice,
    }))
}

/// Pitch detail. The returned `views` is the pre-increment snapshot; the
/// increment itself lands after this response, off the deferred queue.
pub async fn pitch_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PitchRecord>, AppError> {
    let record = views::record_view(state.store.as_ref(), &state.deferred, &id).await?;

    record.map(Json).ok_or(AppError::NotFound)
}

#[derive(Serialize)]
pub struct ProfileResponse {
    author: AuthorProfile,
    yours: bool,
    pitches: Vec<PitchRecord>,
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, AppError> {
    let author = state
        .store
        .fetch_author(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    let pitches = state.store.pitches_by_author(&id).await?;

    let yours = state
        .sessions
        .from_headers(&headers)
        .is_some_and(|session| session.identity == id);

    Ok(Json(ProfileResponse {
        author,
        yours,
        pitches,
    }))
}

#[derive(Deserialize)]
pub struct SignInPayload {
    id: String,
    name: String,

    #[serde(default)]
    avatar: String,

    #[serde(default)]
    bio: String,
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignInPayload>,
) -> Result<Json<Session>, AppError> {
    // First sign-in creates the author document the profile page reads.
    state
        .store
        .put_author(&AuthorProfile {
            id: payload.id.clone(),
            name: payload.name.clone(),
            avatar: payload.avatar.clone(),
            bio: payload.bio,
        })
        .await?;

    let session = state.sessions.sign_in(
        &payload.id,
        AuthorDisplay {
            name: payload.name,
            avatar: payload.avatar,
        },
    );

    Ok(Json(session))
}

pub async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(session) = state.sessions.from_headers(&headers) {
        state.sessions.sign_out(&session.token);
    }

    StatusCode::NO_CONTENT
}
