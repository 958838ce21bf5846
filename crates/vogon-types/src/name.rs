//! Object name validation.
//!
//! Valid object names:
//! - Are made of one or more segments separated by `/`
//! - Each segment starts with a lowercase ASCII letter or a digit
//! - The remaining characters of a segment are lowercase ASCII letters,
//!   digits, or `-`
//!
//! These are exactly the names the HTTP API accepts in request paths. They are
//! also safe to turn into relative file paths: no empty, `.` or `..`
//! components and no leading `/`.

use crate::error::TypeError;

/// Validate an object name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use vogon_types::name::validate_name;
///
/// assert!(validate_name("one").is_ok());
/// assert!(validate_name("jobs/nightly-build").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("../etc").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), TypeError> {
    let invalid = |reason: String| TypeError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty".into()));
    }

    for segment in name.split('/') {
        let mut chars = segment.chars();
        match chars.next() {
            None => return Err(invalid("path segments must not be empty".into())),
            Some(first) if !is_lower_alnum(first) => {
                return Err(invalid(format!(
                    "segment must start with a lowercase letter or digit: {segment:?}"
                )));
            }
            Some(_) => {}
        }
        if let Some(ch) = chars.find(|&ch| !is_lower_alnum(ch) && ch != '-') {
            return Err(invalid(format!("contains forbidden character: {ch:?}")));
        }
    }

    Ok(())
}

fn is_lower_alnum(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit()
}
