//! Deterministic cache key encoding.
//!
//! Keys have the shape `user:{user_id}:stats` or
//! `user:{user_id}:previews:{kind}:{filter_signature}`. The user and resource
//! kind are always recoverable from the key alone, so invalidation never has
//! to look at cached values.

use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;

use crate::journal::ResourceKind;

use super::CacheKeyError;

const USER_PREFIX: &str = "user:";
const STATS_SEGMENT: &str = "stats";
const PREVIEWS_SEGMENT: &str = "previews";
const EMPTY_SIGNATURE: &str = "-";

/// Canonical encoding of a request's filters.
///
/// Pairs are sorted by name and values are percent-encoded, so equal filter
/// sets always encode identically and distinct sets never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSignature(String);

impl FilterSignature {
    /// The signature of a request without filters.
    pub fn empty() -> Self {
        Self(EMPTY_SIGNATURE.to_string())
    }

    /// Builds a signature from `(name, value)` pairs.
    ///
    /// Names must be non-empty and consist of `[a-z0-9_]`. A name may appear
    /// only once.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, CacheKeyError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut sorted = BTreeMap::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            if !is_valid_filter_name(name) {
                return Err(CacheKeyError::InvalidFilterName(name.to_string()));
            }
            let encoded = urlencoding::encode(value.as_ref()).into_owned();
            if sorted.insert(name.to_string(), encoded).is_some() {
                return Err(CacheKeyError::DuplicateFilter(name.to_string()));
            }
        }

        if sorted.is_empty() {
            return Ok(Self::empty());
        }

        let encoded = sorted
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        Ok(Self(encoded))
    }

    /// Returns the encoded signature.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_filter_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// A typed cache key. Encodes to the string form stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The aggregate stats summary of a user.
    Stats { user_id: Uuid },
    /// A preview window of one resource kind for a user.
    Previews {
        user_id: Uuid,
        kind: ResourceKind,
        filters: FilterSignature,
    },
}

impl CacheKey {
    pub fn stats(user_id: Uuid) -> Self {
        CacheKey::Stats { user_id }
    }

    pub fn previews(user_id: Uuid, kind: ResourceKind, filters: FilterSignature) -> Self {
        CacheKey::Previews {
            user_id,
            kind,
            filters,
        }
    }

    /// Returns the user the key belongs to.
    pub fn user_id(&self) -> Uuid {
        match self {
            CacheKey::Stats { user_id } | CacheKey::Previews { user_id, .. } => *user_id,
        }
    }

    /// Returns the string stored in the cache.
    pub fn encode(&self) -> String {
        match self {
            CacheKey::Stats { user_id } => stats_key(*user_id),
            CacheKey::Previews {
                user_id,
                kind,
                filters,
            } => previews_key(*user_id, *kind, filters),
        }
    }

    /// Decodes a string produced by [`CacheKey::encode`].
    ///
    /// Returns `None` for keys this module did not produce.
    pub fn parse(key: &str) -> Option<Self> {
        let rest = key.strip_prefix(USER_PREFIX)?;
        let mut parts = rest.splitn(4, ':');
        let user_id = Uuid::parse_str(parts.next()?).ok()?;
        match parts.next()? {
            STATS_SEGMENT if parts.next().is_none() => Some(CacheKey::stats(user_id)),
            PREVIEWS_SEGMENT => {
                let kind = ResourceKind::from_slug(parts.next()?)?;
                let signature = parts.next()?;
                if signature.is_empty() {
                    return None;
                }
                Some(CacheKey::previews(
                    user_id,
                    kind,
                    FilterSignature(signature.to_string()),
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Returns the cache key for a user's stats summary.
pub fn stats_key(user_id: Uuid) -> String {
    format!("{USER_PREFIX}{user_id}:{STATS_SEGMENT}")
}

/// Returns the cache key for a preview window.
pub fn previews_key(user_id: Uuid, kind: ResourceKind, filters: &FilterSignature) -> String {
    format!(
        "{USER_PREFIX}{user_id}:{PREVIEWS_SEGMENT}:{}:{}",
        kind.slug(),
        filters.as_str()
    )
}

/// Returns the pattern matching every key of a user.
pub fn user_pattern(user_id: Uuid) -> String {
    format!("{USER_PREFIX}{user_id}:*")
}

/// Returns the pattern matching every preview key of a user and kind.
pub fn previews_pattern(user_id: Uuid, kind: ResourceKind) -> String {
    format!("{USER_PREFIX}{user_id}:{PREVIEWS_SEGMENT}:{}:*", kind.slug())
}
