//! Composite keys
//!
//! A composite key is an object-type tag followed by an ordered list of
//! attributes, laid out so that every key sharing a leading attribute list
//! also shares a byte prefix:
//!
//! ```text
//! U+0000 objectType U+0000 attr1 U+0000 attr2 U+0000
//! ```
//!
//! The leading `U+0000` keeps composite keys out of the simple-key range,
//! which is why range scans never return them.

use crate::stub::{StubError, StubResult};

/// Namespace marker that starts every composite key
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Separator between the object type and each attribute
pub const MIN_UNICODE_RUNE: char = '\u{0}';

/// Upper bound used to close a composite-prefix range
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Build a composite key from an object type and attributes.
///
/// Fails if the object type is empty or any part contains `U+0000` or
/// `U+10FFFF`.
pub fn create_composite_key(object_type: &str, attributes: &[&str]) -> StubResult<String> {
    if object_type.is_empty() {
        return Err(StubError::InvalidCompositeKey {
            reason: "object type must not be empty".to_string(),
        });
    }
    validate_part(object_type)?;

    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(MIN_UNICODE_RUNE);
    for attribute in attributes {
        validate_part(attribute)?;
        key.push_str(attribute);
        key.push(MIN_UNICODE_RUNE);
    }
    Ok(key)
}

/// Split a composite key back into its object type and attributes.
pub fn split_composite_key(key: &str) -> StubResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .ok_or_else(|| StubError::InvalidCompositeKey {
            reason: format!("{:?} is not a composite key", key),
        })?;

    let mut parts = body.split(MIN_UNICODE_RUNE);
    let object_type = parts.next().unwrap_or_default().to_string();
    let mut attributes: Vec<String> = parts.map(str::to_string).collect();
    // Every component is terminated, so the final split piece is always empty.
    if attributes.pop().as_deref() != Some("") || object_type.is_empty() {
        return Err(StubError::InvalidCompositeKey {
            reason: format!("{:?} is not terminated", key),
        });
    }
    Ok((object_type, attributes))
}

/// Whether `key` lives in the composite-key namespace
#[inline]
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

/// Exclusive upper bound for a composite-prefix scan starting at `prefix`
pub fn prefix_range_end(prefix: &str) -> String {
    let mut end = String::with_capacity(prefix.len() + MAX_UNICODE_RUNE.len_utf8());
    end.push_str(prefix);
    end.push(MAX_UNICODE_RUNE);
    end
}

fn validate_part(part: &str) -> StubResult<()> {
    if part.contains(MIN_UNICODE_RUNE) || part.contains(MAX_UNICODE_RUNE) {
        return Err(StubError::InvalidCompositeKey {
            reason: format!("{:?} contains a reserved code point", part),
        });
    }
    Ok(())
}
