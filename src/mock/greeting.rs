//! Greeting text.

/// Rendered in place of a form field the client did not send.
pub const MISSING_FIELD: &str = "None";

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `Hello {first} {last}!`, with missing names rendered as [`MISSING_FIELD`].
pub fn greet(first_name: Option<&str>, last_name: Option<&str>) -> String {
    format!(
        "Hello {} {}!",
        first_name.unwrap_or(MISSING_FIELD),
        last_name.unwrap_or(MISSING_FIELD)
    )
}
