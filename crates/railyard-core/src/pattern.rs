//! Glob matching for branch names.

/// Match `text` against a branch pattern.
///
/// Supports `*` and `**` (anything), `prefix/**` (anything below prefix),
/// `prefix/*` (one level below prefix) and a single inner `*` wildcard.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return text == prefix || text.starts_with(&format!("{}/", prefix));
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        let prefix_slash = format!("{}/", prefix);
        return match text.strip_prefix(&prefix_slash) {
            Some(rest) => !rest.is_empty() && !rest.contains('/'),
            None => false,
        };
    }
    if let Some((head, tail)) = pattern.split_once('*') {
        if !tail.contains('*') {
            return text.len() >= head.len() + tail.len()
                && text.starts_with(head)
                && text.ends_with(tail);
        }
    }
    pattern == text
}

/// True when no patterns are given or any pattern matches.
pub fn any_match(patterns: &[String], text: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| glob_match(p, text))
}
