//! Segment normalization and composition.
//!
//! # Rules
//! - Empty segments are dropped
//! - Exactly one leading and one trailing `/` is stripped per segment
//! - Segments left empty by stripping are dropped
//! - Survivors are joined with a single `/`
//!
//! The composed path never starts with `/`; it is resolved against a base
//! URL later.

/// Strip one leading and one trailing `/` from a segment.
pub fn trim_segment(segment: &str) -> &str {
    let segment = segment.strip_prefix('/').unwrap_or(segment);
    segment.strip_suffix('/').unwrap_or(segment)
}

/// Join root-first segments into one canonical path.
pub fn compose<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| trim_segment(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_nested_segments() {
        assert_eq!(compose(&["/api", "/v1/", "/users/:id"]), "api/v1/users/:id");
    }

    #[test]
    fn test_drops_empty_and_root_segments() {
        assert_eq!(compose(&["", "/", "//", "users"]), "users");
        assert_eq!(compose::<&str>(&[]), "");
    }

    #[test]
    fn test_strips_only_one_slash() {
        assert_eq!(trim_segment("//a//"), "/a/");
        assert_eq!(compose(&["//a//", "b"]), "/a//b");
    }
}
