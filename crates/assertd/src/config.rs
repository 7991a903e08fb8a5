//! Database configuration.

use assertd_core::Assertion;

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Bootstrap-trusted `account` and `account-key` assertions.
    pub trusted: Vec<Assertion>,
    /// Whether signing keys must be inside their validity window at check
    /// time.
    pub check_key_validity: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            trusted: Vec::new(),
            check_key_validity: true,
        }
    }
}

impl DatabaseConfig {
    /// A configuration trusting the given assertions.
    pub fn trusting(trusted: impl IntoIterator<Item = Assertion>) -> Self {
        Self {
            trusted: trusted.into_iter().collect(),
            ..Self::default()
        }
    }
}
