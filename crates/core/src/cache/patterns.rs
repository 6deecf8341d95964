//! Glob matching for cache key patterns.
//!
//! `*` matches any run of characters, including an empty one. There is no
//! escape syntax: encoded keys never contain a literal `*`.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use pauz_core::cache::pattern_matches;
///
/// assert!(pattern_matches("user:1:*", "user:1:stats"));
/// assert!(pattern_matches("user:*:previews:garden:*", "user:2:previews:garden:-"));
/// assert!(!pattern_matches("user:1:*", "user:2:stats"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern = pattern.as_bytes();
    let key = key.as_bytes();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it is currently covering.
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, k));
            p += 1;
        } else if p < pattern.len() && pattern[p] == key[k] {
            p += 1;
            k += 1;
        } else if let Some((star, covered)) = backtrack {
            // Let the last `*` swallow one more character and retry.
            p = star + 1;
            k = covered + 1;
            backtrack = Some((star, covered + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&b| b == b'*')
}
