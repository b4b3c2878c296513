//! Opaque bearer-token sessions.
//!
//! Sign-in hands out a random token mapped to an identity plus the display
//! info navigation chrome needs. Operations that require the caller's
//! identity take the resolved [`Session`] as a parameter, nothing reads
//! auth state ambiently.
use std::{collections::HashMap, sync::RwLock};

use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
pub struct AuthorDisplay {
    pub name: String,
    pub avatar: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub identity: String,
    pub display: AuthorDisplay,
}

#[derive(Default)]
pub struct SessionProvider {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity: &str, display: AuthorDisplay) -> Session {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            identity: identity.to_string(),
            display,
        };

        self.sessions
            .write()
            .unwrap()
            .insert(session.token.clone(), session.clone());

        session
    }

    pub fn sign_out(&self, token: &str) -> bool {
        self.sessions.write().unwrap().remove(token).is_some()
    }

    pub fn current_session(&self, token: &str) -> Option<Session> {
        self.sessions.read().unwrap().get(token).cloned()
    }

    /// Resolve the request's session from its `Authorization` header.
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let token = bearer_token(headers)?;
        self.current_session(token)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
