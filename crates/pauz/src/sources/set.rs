use std::sync::Arc;

use pauz_core::journal::{Backing, ResourceKind};
use pauz_core::sources::CountSource;

/// The two heterogeneous sources, routed by each kind's backing store.
#[derive(Clone)]
pub struct SourceSet {
    relational: Arc<dyn CountSource>,
    object_store: Arc<dyn CountSource>,
}

impl SourceSet {
    pub fn new(relational: Arc<dyn CountSource>, object_store: Arc<dyn CountSource>) -> Self {
        Self {
            relational,
            object_store,
        }
    }

    pub fn relational(&self) -> &Arc<dyn CountSource> {
        &self.relational
    }

    pub fn object_store(&self) -> &Arc<dyn CountSource> {
        &self.object_store
    }

    /// Returns the source holding records of `kind`.
    pub fn for_kind(&self, kind: ResourceKind) -> &Arc<dyn CountSource> {
        match kind.backing() {
            Backing::Relational => &self.relational,
            Backing::ObjectStore => &self.object_store,
        }
    }

    /// Kinds served by the given backing, in stable order.
    pub fn kinds_for(backing: Backing) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| kind.backing() == backing)
            .collect()
    }
}

impl std::fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSet")
            .field("relational", &self.relational.name())
            .field("object_store", &self.object_store.name())
            .finish()
    }
}
