use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::reducer::{reduce, Action};
use crate::MindMap;

/// Queue between the UI, which produces [`Action`]s while it draws, and the owner of
/// the [`MindMap`], which folds them into the state once per frame.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, action: Action) {
        log::trace!("dispatch {}", action.kind());
        // both ends live in self, the channel cannot be disconnected
        let _ = self.tx.send(action);
    }

    /// Handle that can be moved into closures or handed to other widgets.
    pub fn sender(&self) -> Sender<Action> {
        self.tx.clone()
    }

    /// Takes every queued action.
    pub fn drain(&self) -> Vec<Action> {
        self.rx.try_iter().collect()
    }

    /// Applies every queued action to `state`. Returns whether anything was applied.
    pub fn apply(&self, state: &mut MindMap) -> bool {
        let actions = self.drain();
        if actions.is_empty() {
            return false;
        }
        let current = std::mem::replace(state, MindMap::empty());
        *state = actions.into_iter().fold(current, reduce);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
