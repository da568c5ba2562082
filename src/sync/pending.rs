/// A local change that has been shown to the user but not yet confirmed.
#[derive(Debug, Clone)]
pub struct PendingMutation<T> {
    snapshot: T,
    speculative: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T, E> {
    /// The server accepted the change; carries the speculative state.
    Committed(T),
    /// The server refused; carries the state from before the change.
    RolledBack { snapshot: T, error: E },
}

impl<T: Clone> PendingMutation<T> {
    pub fn begin(snapshot: T, apply: impl FnOnce(&mut T)) -> Self {
        let mut speculative = snapshot.clone();
        apply(&mut speculative);
        Self {
            snapshot,
            speculative,
        }
    }

    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    pub fn speculative(&self) -> &T {
        &self.speculative
    }

    pub fn settle<R, E>(self, result: Result<R, E>) -> Settled<T, E> {
        match result {
            Ok(_) => Settled::Committed(self.speculative),
            Err(error) => Settled::RolledBack {
                snapshot: self.snapshot,
                error,
            },
        }
    }
}
