use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::layout::compose::compose_format;
use crate::layout::tree::FlyerTree;
use crate::scene::model::AppState;
use crate::session::persist::StateObserver;

/// Keeps the visual tree of the active format current. Stands in for the mounted preview node
/// an export captures.
#[derive(Debug, Default)]
pub struct PreviewObserver {
    tree: Mutex<Option<FlyerTree>>,
}

impl PreviewObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest tree, or `None` before the first state change.
    pub fn current(&self) -> Option<FlyerTree> {
        self.tree
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl StateObserver for PreviewObserver {
    async fn state_changed(&self, state: &AppState) {
        let tree = compose_format(state.active());
        *self.tree.lock().unwrap_or_else(PoisonError::into_inner) = Some(tree);
    }
}
