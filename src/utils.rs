use regex::Regex;
use uuid::Uuid;

pub fn slugify(input: &str) -> String {
    let clean = Regex::new(r"[^A-Za-z0-9 -]").unwrap();
    let mut s = clean.replace_all(input, "").into_owned();

    s = s.trim().to_lowercase();

    let collapse = Regex::new(r"[ -]+").unwrap();
    collapse.replace_all(&s, "-").into_owned()
}

pub fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::{short_suffix, slugify};

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Acme"), "acme");
        assert_eq!(slugify("Acme Rockets"), "acme-rockets");
        assert_eq!(slugify("Rust-lang"), "rust-lang");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(slugify("   hello   "), "hello");
        assert_eq!(slugify("  multiple   spaces  "), "multiple-spaces");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("!@#$%^&*()"), "");
        assert_eq!(slugify("Acme 2.0!"), "acme-20");
    }

    #[test]
    fn test_dashes_collapse() {
        assert_eq!(slugify("a - b -- c"), "a-b-c");
        assert_eq!(slugify("- start end -"), "start-end");
    }

    #[test]
    fn test_suffix_shape() {
        let suffix = short_suffix();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(short_suffix(), suffix);
    }
}
