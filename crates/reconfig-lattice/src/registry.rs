//! Module records and id assignment with deferred static registration.
//!
//! Movable modules receive ids as they are registered. Static modules are
//! queued and only numbered by [`ModuleRegistry::finalize_registration`],
//! so every static id is greater than every movable id and "is this
//! module movable" reduces to `id < min_static_id`.

use crate::error::LatticeError;
use log::debug;
use reconfig_core::{Coord, ModuleId, PropertySet};
use std::collections::HashSet;

/// One registered module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Dense id; movable ids precede static ids.
    pub id: ModuleId,
    /// Current position. Mutated only through move application.
    pub coords: Coord,
    /// Static modules never move and are excluded from configurations.
    pub is_static: bool,
    /// Attached properties (empty when property matching is off).
    pub properties: PropertySet,
}

/// Assigns module ids and rejects duplicate positions.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    records: Vec<ModuleRecord>,
    deferred: Vec<(Coord, PropertySet)>,
    occupied: HashSet<Coord>,
    min_static_id: Option<ModuleId>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module at `coords`.
    ///
    /// Movable modules are numbered immediately and their id is returned.
    /// Static modules are deferred until
    /// [`finalize_registration`](Self::finalize_registration) and yield
    /// `None` here.
    pub fn register_module(
        &mut self,
        coords: Coord,
        is_static: bool,
        properties: PropertySet,
    ) -> Result<Option<ModuleId>, LatticeError> {
        if self.min_static_id.is_some() {
            return Err(LatticeError::RegistrationFinalized);
        }
        if !self.occupied.insert(coords.clone()) {
            return Err(LatticeError::DuplicateModule { coord: coords });
        }
        if is_static {
            self.deferred.push((coords, properties));
            return Ok(None);
        }
        let id = ModuleId(self.records.len() as u32);
        self.records.push(ModuleRecord {
            id,
            coords,
            is_static: false,
            properties,
        });
        Ok(Some(id))
    }

    /// Number static modules after every movable module and freeze the
    /// registry. Returns the first static id (equal to the movable count).
    ///
    /// Calling this twice is a no-op that returns the same id.
    pub fn finalize_registration(&mut self) -> ModuleId {
        if let Some(id) = self.min_static_id {
            return id;
        }
        let min_static = ModuleId(self.records.len() as u32);
        for (coords, properties) in self.deferred.drain(..) {
            let id = ModuleId(self.records.len() as u32);
            self.records.push(ModuleRecord {
                id,
                coords,
                is_static: true,
                properties,
            });
        }
        debug!(
            "[Registry] finalized: {} movable, {} static",
            min_static.0,
            self.records.len() as u32 - min_static.0
        );
        self.min_static_id = Some(min_static);
        min_static
    }

    /// Whether [`finalize_registration`](Self::finalize_registration) ran.
    pub fn is_finalized(&self) -> bool {
        self.min_static_id.is_some()
    }

    /// First static id, once finalized.
    pub fn min_static_id(&self) -> Option<ModuleId> {
        self.min_static_id
    }

    /// Look up a numbered module.
    pub fn by_id(&self, id: ModuleId) -> Option<&ModuleRecord> {
        self.records.get(id.index())
    }

    /// Numbered modules in id order. Static modules appear only after
    /// finalization.
    pub fn records(&self) -> &[ModuleRecord] {
        &self.records
    }

    /// Count of movable modules registered so far.
    pub fn movable_count(&self) -> usize {
        match self.min_static_id {
            Some(id) => id.index(),
            None => self.records.len(),
        }
    }

    /// Total modules, deferred static ones included.
    pub fn len(&self) -> usize {
        self.records.len() + self.deferred.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finalize if needed and hand over the records in id order.
    pub fn into_records(mut self) -> Vec<ModuleRecord> {
        self.finalize_registration();
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn static_ids_follow_movable_ids() {
        let mut reg = ModuleRegistry::new();
        assert_eq!(
            reg.register_module(smallvec![0, 0], true, PropertySet::new()).unwrap(),
            None
        );
        assert_eq!(
            reg.register_module(smallvec![1, 0], false, PropertySet::new()).unwrap(),
            Some(ModuleId(0))
        );
        assert_eq!(
            reg.register_module(smallvec![2, 0], false, PropertySet::new()).unwrap(),
            Some(ModuleId(1))
        );
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.finalize_registration(), ModuleId(2));
        let s = reg.by_id(ModuleId(2)).unwrap();
        assert!(s.is_static);
        assert_eq!(s.coords.as_slice(), &[0, 0]);
        assert_eq!(reg.movable_count(), 2);
    }

    #[test]
    fn duplicate_position_is_rejected() {
        let mut reg = ModuleRegistry::new();
        reg.register_module(smallvec![1, 1], true, PropertySet::new())
            .unwrap();
        assert!(matches!(
            reg.register_module(smallvec![1, 1], false, PropertySet::new()),
            Err(LatticeError::DuplicateModule { .. })
        ));
    }

    #[test]
    fn no_registration_after_finalize() {
        let mut reg = ModuleRegistry::new();
        reg.finalize_registration();
        assert_eq!(reg.finalize_registration(), ModuleId(0));
        assert!(matches!(
            reg.register_module(smallvec![0, 0], false, PropertySet::new()),
            Err(LatticeError::RegistrationFinalized)
        ));
    }
}
