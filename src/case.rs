//! Human-readable names derived from snake_case identifiers.

/// Turn an identifier into a label: underscores become spaces and only the first letter is capitalized.
/// e.g. "roll_no" -> "Roll no", "branch" -> "Branch"
pub fn humanize(s: &str) -> String {
    let spaced = s.trim_matches('_').replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Naive English plural used for default verbose names.
pub fn pluralize(s: &str) -> String {
    if s.ends_with('s') || s.ends_with('x') || s.ends_with("ch") || s.ends_with("sh") {
        format!("{}es", s)
    } else {
        format!("{}s", s)
    }
}
