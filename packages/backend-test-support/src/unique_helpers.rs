//! Unique fixture values so tests sharing a store never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("t");
/// assert_ne!(a, unique_str("t"));
/// assert!(a.starts_with("t-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A username that stays within the 32 character limit players accept.
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("ana");
/// assert!(name.len() <= 32);
/// assert!(name.starts_with("ana_"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    let prefix: String = prefix.chars().take(5).collect();
    // ulids share their timestamp prefix, keep the random tail
    format!("{}_{}", prefix, &ulid[ulid.len() - 16..])
}
