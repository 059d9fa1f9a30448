//! Canonical field keys for structured log records
//!
//! Every handler and helper reads its key names from here so that
//! log consumers can rely on a stable vocabulary.

// Built-in record fields
pub const FIELD_TIME: &str = "time";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_MSG: &str = "msg";

// Bound attributes
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OPERATION: &str = "operation";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Enrichment attributes
pub const FIELD_ERROR: &str = "error";
pub const FIELD_STACK: &str = "stack";
pub const FIELD_DURATION: &str = "duration";

/// Environment tag that selects JSON output
pub const ENV_PRODUCTION: &str = "production";

/// Upper bound on captured stack text, in bytes
pub const MAX_STACK_BYTES: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys_are_distinct() {
        assert_ne!(FIELD_TIME, FIELD_LEVEL);
        assert_ne!(FIELD_TIME, FIELD_MSG);
        assert_ne!(FIELD_LEVEL, FIELD_MSG);
    }

    #[test]
    fn test_attribute_keys_do_not_shadow_builtins() {
        for key in [
            FIELD_COMPONENT,
            FIELD_OPERATION,
            FIELD_REQUEST_ID,
            FIELD_ERROR,
            FIELD_STACK,
            FIELD_DURATION,
        ] {
            assert!(![FIELD_TIME, FIELD_LEVEL, FIELD_MSG].contains(&key));
        }
    }
}
