//! Tests for common module
//!
//! These tests verify the log-masking helpers, which must tolerate
//! arbitrary client-supplied input including multi-byte characters.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
        assert_eq!(safe_email_log("no-at-sign"), "***@***.***");
        assert_eq!(safe_email_log("a@b"), "***@***.***");
    }

    #[test]
    fn test_safe_email_log_handles_multibyte_input() {
        // a multi-byte first character must not be split mid-codepoint
        assert_eq!(safe_email_log("émile@example.com"), "é***@example.com");
        assert_eq!(safe_email_log("日本語@example.jp"), "日***@example.jp");
    }

    #[test]
    fn test_safe_token_log_masks_middle() {
        assert_eq!(safe_token_log("eyJhbGciOiJIUzI1NiJ9"), "eyJh...NiJ9");
        assert_eq!(safe_token_log("short"), "***");
        assert_eq!(safe_token_log(""), "***");
    }

    #[test]
    fn test_safe_token_log_handles_multibyte_input() {
        // short multi-byte input is fully masked rather than byte-sliced
        assert_eq!(safe_token_log("a€€€€"), "***");
        assert_eq!(safe_token_log("€€€€€€€€€"), "€€€€...€€€€");
    }
}
