//! Object key layout for user-scoped documents.

use uuid::Uuid;

use crate::journal::ResourceKind;

/// Returns the prefix under which a user's documents of a kind are stored.
pub fn object_prefix(user_id: Uuid, kind: ResourceKind) -> String {
    format!("users/{}/{}/", user_id, kind.slug())
}

/// Returns the object key of a single document.
pub fn object_key(user_id: Uuid, kind: ResourceKind, id: Uuid) -> String {
    format!("{}{}", object_prefix(user_id, kind), id)
}

/// Extracts the document ID from an object key.
pub fn id_from_object_key(key: &str) -> Option<Uuid> {
    let (_, id) = key.rsplit_once('/')?;
    Uuid::parse_str(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_prefix() {
        assert_eq!(
            object_prefix(Uuid::nil(), ResourceKind::GuidedJournal),
            "users/00000000-0000-0000-0000-000000000000/guided_journals/"
        );
    }

    #[test]
    fn test_object_key_roundtrip() {
        let id = Uuid::new_v4();
        let key = object_key(Uuid::nil(), ResourceKind::GuidedJournal, id);
        assert!(key.starts_with(&object_prefix(Uuid::nil(), ResourceKind::GuidedJournal)));
        assert_eq!(id_from_object_key(&key), Some(id));
    }

    #[test]
    fn test_id_from_foreign_key() {
        assert_eq!(id_from_object_key("users/x/guided_journals/readme.txt"), None);
        assert_eq!(id_from_object_key("no-slash"), None);
    }
}
