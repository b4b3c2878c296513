//! # Pitch Validation
//!
//! Schema checks for a submitted pitch draft. Pure and side-effect free,
//! runs both before a submission leaves the form and again inside the
//! persistence service, which never trusts the form's copy.
//!
//! Every failing field gets its own entry, so the form can render errors
//! inline next to each input instead of stopping at the first one.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 20;
pub const DESCRIPTION_MAX: usize = 500;
pub const CATEGORY_MIN: usize = 3;
pub const CATEGORY_MAX: usize = 20;
pub const PITCH_MIN: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchDraft {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub link: String,

    #[serde(default, rename = "pitch")]
    pub pitch_body: String,
}

/// Field name to human-readable message, one entry per violated rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A draft that passed the schema. Only [`validate`] constructs one, so
/// holding a value of this type means the fields are safe to persist.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedPitch {
    pub title: String,
    pub description: String,
    pub category: String,
    pub link: String,
    pub pitch_body: String,
}

pub fn validate(draft: &PitchDraft) -> Result<ValidatedPitch, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_text(&mut errors, "title", &draft.title, TITLE_MIN, Some(TITLE_MAX));
    check_text(
        &mut errors,
        "description",
        &draft.description,
        DESCRIPTION_MIN,
        Some(DESCRIPTION_MAX),
    );
    check_text(
        &mut errors,
        "category",
        &draft.category,
        CATEGORY_MIN,
        Some(CATEGORY_MAX),
    );
    check_link(&mut errors, &draft.link);
    check_text(&mut errors, "pitch", &draft.pitch_body, PITCH_MIN, None);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedPitch {
        title: draft.title.clone(),
        description: draft.description.clone(),
        category: draft.category.clone(),
        link: draft.link.clone(),
        pitch_body: draft.pitch_body.clone(),
    })
}

fn check_text(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: Option<usize>) {
    if value.trim().is_empty() {
        errors.insert(field, format!("{} is required", label(field)));
        return;
    }

    let length = value.chars().count();

    if length < min {
        errors.insert(
            field,
            format!("{} must be at least {min} characters", label(field)),
        );
        return;
    }

    if let Some(max) = max {
        if length > max {
            errors.insert(
                field,
                format!("{} must be at most {max} characters", label(field)),
            );
        }
    }
}

fn check_link(errors: &mut FieldErrors, value: &str) {
    if value.trim().is_empty() {
        errors.insert("link", "Link is required");
        return;
    }

    if Url::parse(value).is_err() {
        errors.insert("link", "Link must be a valid URL");
    }
}

fn label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PitchDraft {
        PitchDraft {
            title: "Acme".to_string(),
            description: "A reusable rocket for regional deliveries".to_string(),
            category: "Tech".to_string(),
            link: "https://x.com".to_string(),
            pitch_body: "Rockets, but affordable".to_string(),
        }
    }

    #[test]
    fn accepts_valid_draft() {
        let validated = validate(&valid_draft()).unwrap();
        assert_eq!(validated.title, "Acme");
        assert_eq!(validated.pitch_body, "Rockets, but affordable");
    }

    #[test]
    fn reports_each_empty_field_alone() {
        for field in ["title", "description", "category", "link", "pitch"] {
            let mut draft = valid_draft();
            match field {
                "title" => draft.title.clear(),
                "description" => draft.description.clear(),
                "category" => draft.category.clear(),
                "link" => draft.link.clear(),
                "pitch" => draft.pitch_body.clear(),
                _ => unreachable!(),
            }

            let errors = validate(&draft).unwrap_err();
            assert_eq!(errors.len(), 1, "expected only {field} to fail");
            assert!(errors.get(field).unwrap().contains("required"));
        }
    }

    #[test]
    fn reports_all_failing_fields_together() {
        let draft = PitchDraft::default();
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn enforces_length_bounds() {
        let mut draft = valid_draft();
        draft.title = "ab".to_string();
        let errors = validate(&draft).unwrap_err();
        assert!(errors.get("title").unwrap().contains("at least 3"));

        let mut draft = valid_draft();
        draft.category = "a very long category name".to_string();
        let errors = validate(&draft).unwrap_err();
        assert!(errors.get("category").unwrap().contains("at most 20"));

        let mut draft = valid_draft();
        draft.description = "too short".to_string();
        assert!(validate(&draft).unwrap_err().get("description").is_some());
    }

    #[test]
    fn rejects_malformed_link() {
        let mut draft = valid_draft();
        draft.link = "not-a-url".to_string();
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("link").unwrap(), "Link must be a valid URL");
    }

    #[test]
    fn does_not_mutate_and_is_deterministic() {
        let draft = valid_draft();
        let snapshot = draft.clone();

        assert_eq!(validate(&draft), validate(&draft));
        assert_eq!(draft, snapshot);

        let mut invalid = valid_draft();
        invalid.link = "nope".to_string();
        assert_eq!(validate(&invalid), validate(&invalid));
    }
}
