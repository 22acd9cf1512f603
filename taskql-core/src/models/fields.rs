//! Task field validation
//!
//! Title and status are non-nullable text columns; both are trimmed
//! and must be non-empty after trimming.

use super::ValidationError;

/// Maximum length for task titles
const MAX_TITLE_LEN: usize = 256;

/// Maximum length for task status values
const MAX_STATUS_LEN: usize = 64;

/// Validated task title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Create a new task title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 256 characters
    ///
    /// # Example
    /// ```
    /// use taskql_core::models::TaskTitle;
    ///
    /// assert!(TaskTitle::new("Write spec").is_ok());
    /// assert!(TaskTitle::new("").is_err());
    /// assert!(TaskTitle::new("   ").is_err());  // whitespace only
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        non_empty(s, "title", MAX_TITLE_LEN).map(Self)
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated task status (free text, e.g. "pending", "done")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus(String);

impl TaskStatus {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        non_empty(s, "status", MAX_STATUS_LEN).map(Self)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn non_empty(s: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_titles() {
        assert!(TaskTitle::new("Write spec").is_ok());
        assert!(TaskTitle::new("a").is_ok());
        assert_eq!(TaskTitle::new("  Trimmed  ").unwrap().as_str(), "Trimmed");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            TaskTitle::new("").unwrap_err(),
            ValidationError::Empty { field: "title" }
        ));
        assert!(matches!(
            TaskTitle::new(" \t\n").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn max_length() {
        assert!(TaskTitle::new(&"a".repeat(256)).is_ok());
        assert!(matches!(
            TaskTitle::new(&"a".repeat(257)).unwrap_err(),
            ValidationError::TooLong { max: 256, .. }
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 256 two-byte characters is still within the limit
        assert!(TaskTitle::new(&"é".repeat(256)).is_ok());
    }

    #[test]
    fn status_rules() {
        assert_eq!(TaskStatus::new(" done ").unwrap().into_string(), "done");
        assert!(matches!(
            TaskStatus::new("").unwrap_err(),
            ValidationError::Empty { field: "status" }
        ));
        assert!(matches!(
            TaskStatus::new(&"x".repeat(65)).unwrap_err(),
            ValidationError::TooLong { max: 64, .. }
        ));
    }
}
