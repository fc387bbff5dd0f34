//! Memoized field resolution, one entry per mapped type.

use crate::mapped::Mapped;
use fieldmap_model::{ResolvedClass, resolve};
use fieldmap_types::Result;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::debug;

type Cell = Arc<OnceLock<Result<Arc<ResolvedClass>>>>;

/// Resolved configuration per type, computed at most once.
///
/// The mutex only guards the map of cells; resolution runs inside the
/// type's own `OnceLock`, so concurrent first use of one type blocks on that
/// type alone and never resolves twice. Failures are memoized as well.
#[derive(Debug, Default)]
pub struct ConfigCache {
    cells: Mutex<HashMap<TypeId, Cell>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved configuration of `T`, resolving it on first use.
    pub fn get_or_resolve<T: Mapped>(&self) -> Result<Arc<ResolvedClass>> {
        self.get_or_insert_with(TypeId::of::<T>(), || {
            resolve(&T::descriptor(), &T::fields())
        })
        .inspect_err(|e| debug!(ty = type_name::<T>(), error = %e, "Field resolution failed"))
    }

    /// Returns the entry for `key`, running `init` if there is none yet.
    pub fn get_or_insert_with<F>(&self, key: TypeId, init: F) -> Result<Arc<ResolvedClass>>
    where
        F: FnOnce() -> Result<ResolvedClass>,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(key).or_default())
        };

        cell.get_or_init(|| {
            let resolved = init().map(Arc::new);
            if let Ok(class) = &resolved {
                debug!(class = %class.name(), fields = class.len(), "Cached resolved configuration");
            }
            resolved
        })
        .clone()
    }

    /// Number of types with an entry (resolved, failed or in progress).
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry; later lookups resolve again.
    pub fn clear(&self) {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
