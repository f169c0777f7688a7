use uuid::Uuid;

use crate::scene::Scene;

/// The transient set of selected objects: identifiers only, never
/// ownership, and never persisted.
///
/// Every selection event replaces the set wholesale; there is no
/// incremental diffing.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    ids: Vec<Uuid>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. Locked objects and identifiers missing
    /// from the scene are filtered out of the candidates.
    pub fn set(&mut self, candidates: &[Uuid], scene: &Scene) {
        self.ids = candidates
            .iter()
            .copied()
            .filter(|id| scene.find(*id).is_some_and(|o| !o.locked))
            .collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop identifiers that no longer resolve, after a delete or a
    /// whole-model swap.
    pub fn retain_existing(&mut self, scene: &Scene) {
        self.ids.retain(|id| scene.find(*id).is_some());
    }

    /// Ordered selection, may be empty
    pub fn current(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
