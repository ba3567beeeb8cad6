//! Resource name normalization

/// Longest resource name kubify emits
pub const MAX_NAME_LEN: usize = 24;

/// Truncate a service name to [`MAX_NAME_LEN`] characters.
///
/// Truncation is not checked for collisions between services.
pub fn short_name(name: &str) -> &str {
    match name.char_indices().nth(MAX_NAME_LEN) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}
