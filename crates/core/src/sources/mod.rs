mod error;
mod keys;
mod traits;

pub use error::{SourceError, SourceResult};
pub use keys::{id_from_object_key, object_key, object_prefix};
pub use traits::{CountSource, ObjectMeta, ObjectStore, StoredObject};
