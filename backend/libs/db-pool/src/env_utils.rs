//! Environment variable parsing helpers shared by pool configuration.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is
/// missing or does not parse.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning `None` if missing or invalid.
pub(crate) fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn parse_env_with_default_prefers_valid_value() {
        std::env::set_var("DB_POOL_TEST_PORT", " 8080 ");
        let port: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(port, 8080);

        std::env::set_var("DB_POOL_TEST_PORT", "not-a-port");
        let port: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(port, 3000);

        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn parse_env_optional_ignores_missing_key() {
        std::env::remove_var("DB_POOL_TEST_OPTIONAL");
        assert_eq!(parse_env_optional::<u32>("DB_POOL_TEST_OPTIONAL"), None);

        std::env::set_var("DB_POOL_TEST_OPTIONAL", "456");
        assert_eq!(parse_env_optional::<u32>("DB_POOL_TEST_OPTIONAL"), Some(456));
        std::env::remove_var("DB_POOL_TEST_OPTIONAL");
    }
}
