// Error handling utilities for consistent error messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit with an internal error (exit code >1)
/// Internal errors are for unexpected system failures, database corruption, etc.
pub fn internal_error(message: &str) -> ! {
    eprintln!("Internal error: {}", message);
    process::exit(2);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a 1-based quadrant position
pub fn validate_quadrant_index(index_str: &str) -> Result<usize, String> {
    index_str.parse::<usize>()
        .map_err(|_| format!("Invalid quadrant: '{}'. Use a number from 1 to 4 or a quadrant name.", index_str))
        .and_then(|idx| {
            if (1..=4).contains(&idx) {
                Ok(idx)
            } else {
                Err(format!("Invalid quadrant: {}. Quadrant numbers run from 1 to 4.", idx))
            }
        })
}

/// Validate an opacity percentage
pub fn validate_opacity(value: &str) -> Result<u8, String> {
    value.parse::<u8>()
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| format!("Invalid opacity: '{}'. Opacity must be between 0 and 100.", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("test", "field").is_ok());
        assert!(validate_non_empty("", "field").is_err());
        assert!(validate_non_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_quadrant_index() {
        assert_eq!(validate_quadrant_index("1"), Ok(1));
        assert_eq!(validate_quadrant_index("4"), Ok(4));
        assert!(validate_quadrant_index("0").is_err());
        assert!(validate_quadrant_index("5").is_err());
        assert!(validate_quadrant_index("abc").is_err());
    }

    #[test]
    fn test_validate_opacity() {
        assert_eq!(validate_opacity("0"), Ok(0));
        assert_eq!(validate_opacity("100"), Ok(100));
        assert!(validate_opacity("101").is_err());
        assert!(validate_opacity("-1").is_err());
        assert!(validate_opacity("half").is_err());
    }
}
