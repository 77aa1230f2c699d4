use tokio::{runtime::Handle, task::JoinSet};

/// Where fanned-out operations are scheduled.
#[derive(Debug, Clone, Default)]
pub enum Dispatcher {
    /// Spawn onto the runtime the caller is currently running on.
    #[default]
    Inherit,
    /// Spawn onto a specific runtime.
    Pinned(Handle),
}

impl Dispatcher {
    /// Captures the caller's runtime. Panics outside of a tokio runtime, like `Handle::current`.
    pub fn current() -> Self {
        Dispatcher::Pinned(Handle::current())
    }

    pub fn pinned(handle: Handle) -> Self {
        Dispatcher::Pinned(handle)
    }

    pub fn handle(&self) -> Option<&Handle> {
        match self {
            Dispatcher::Inherit => None,
            Dispatcher::Pinned(handle) => Some(handle),
        }
    }

    /// Spawns `future` as a child of `set`; dropping the set aborts it.
    pub(crate) fn spawn_into<F>(&self, set: &mut JoinSet<F::Output>, future: F)
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match self {
            Dispatcher::Inherit => {
                set.spawn(future);
            }
            Dispatcher::Pinned(handle) => {
                set.spawn_on(future, handle);
            }
        }
    }
}

impl From<Handle> for Dispatcher {
    fn from(handle: Handle) -> Self {
        Dispatcher::Pinned(handle)
    }
}
