use url::Url;

/// Whether a server-supplied artifact path may be fetched relative to the
/// service base URL. Result payloads embed paths like
/// `static/output/abc.xlsx`; anything absolute, scheme-qualified or
/// traversing upward is rejected.
pub fn is_safe_relative_path(path: &str) -> bool {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed.starts_with('/') || trimmed.starts_with('\\') {
        return false;
    }
    // Reject scheme-qualified references (`http://...`, `file:...`).
    if trimmed.split('/').next().is_some_and(|head| head.contains(':')) {
        return false;
    }
    trimmed
        .split(['/', '\\'])
        .all(|segment| !segment.is_empty() && segment != "..")
}

/// Join an artifact path onto the service base URL. Returns `None` for
/// paths that fail [`is_safe_relative_path`] or do not join cleanly.
pub fn artifact_url(base: &Url, relative: &str) -> Option<Url> {
    if !is_safe_relative_path(relative) {
        return None;
    }
    // Anchor the join at the server root; artifact paths are absolute with
    // respect to the service, not to the configured base path.
    base.join(&format!("/{}", relative.trim())).ok()
}

#[cfg(test)]
mod tests {
    use super::{artifact_url, is_safe_relative_path};
    use url::Url;

    #[test]
    fn accepts_plain_relative_paths() {
        assert!(is_safe_relative_path("static/output/result.xlsx"));
        assert!(is_safe_relative_path("output/a b/图片.png"));
    }

    #[test]
    fn rejects_absolute_traversal_and_scheme_paths() {
        assert!(!is_safe_relative_path(""));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path("..\\secret"));
        assert!(!is_safe_relative_path("a/../b"));
        assert!(!is_safe_relative_path("http://evil.example.com/x"));
        assert!(!is_safe_relative_path("a//b"));
    }

    #[test]
    fn joins_onto_base() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        let url = artifact_url(&base, "static/output/result.xlsx").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/static/output/result.xlsx");
    }

    #[test]
    fn unsafe_path_yields_none() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        assert!(artifact_url(&base, "../result.xlsx").is_none());
    }
}
