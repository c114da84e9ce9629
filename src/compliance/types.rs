//! Type-token helpers for diagnostic parsing.

/// Placeholder that every generic type parameter is normalized to.
pub const GENERIC_PLACEHOLDER: &str = "<generic>";

/// Whether `token` names a generic type parameter such as `T`, `E` or `K2`.
///
/// Array (`[]`) and varargs (`...`) suffixes are ignored.
pub fn is_generic_type(token: &str) -> bool {
    let mut name = token.trim();
    loop {
        if let Some(stripped) = name.strip_suffix("[]").or_else(|| name.strip_suffix("...")) {
            name = stripped.trim_end();
        } else {
            break;
        }
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() && name.len() <= 2 => {
            chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Trimmed type token, with generic type parameters replaced by [`GENERIC_PLACEHOLDER`].
pub fn normalize_type_token(token: &str) -> String {
    if is_generic_type(token) {
        GENERIC_PLACEHOLDER.to_string()
    } else {
        token.trim().to_string()
    }
}
