//! Core business logic - framework-agnostic shop operations.
//!
//! Nothing in here knows about Discord. Every function takes a database
//! connection (or any `ConnectionTrait`, so a transaction works too) and returns
//! entity models or plain structs for the bot layer to format.

pub mod bike;
pub mod customer;
pub mod inspection;
pub mod notification;
pub mod outreach;
pub mod reminder;
pub mod report;
pub mod sale;
pub mod window;

/// Trims optional text input; blank values become `None`.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_trims_and_drops_blank() {
        assert_eq!(clean(Some("  ABC123 ".to_string())), Some("ABC123".to_string()));
        assert_eq!(clean(Some("   ".to_string())), None);
        assert_eq!(clean(Some(String::new())), None);
        assert_eq!(clean(None), None);
    }
}
