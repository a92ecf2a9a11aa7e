//! Process-wide, name-keyed registries for rotation systems and search
//! algorithms.
//!
//! Both registries are initialised lazily on first access with the
//! built-in entries and can be extended at runtime. Lookups hand out
//! fresh instances cloned from the registered prototype, so callers can
//! configure their copy without affecting anyone else.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;

use crate::error::EngineError;
use crate::rotation::{RotationSystem, Srs};
use crate::search::{PathSearch, SearchAlgorithm, TSpinSearch};

lazy_static! {
    static ref ROTATION_SYSTEMS: RwLock<HashMap<String, Box<dyn RotationSystem>>> = {
        let mut systems: HashMap<String, Box<dyn RotationSystem>> = HashMap::new();
        systems.insert("SRS".to_owned(), Box::new(Srs));
        RwLock::new(systems)
    };
    static ref SEARCH_ALGORITHMS: RwLock<HashMap<String, Box<dyn SearchAlgorithm>>> = {
        let mut algorithms: HashMap<String, Box<dyn SearchAlgorithm>> = HashMap::new();
        algorithms.insert("PathSearch".to_owned(), Box::new(PathSearch::new()));
        algorithms.insert("TSpinSearch".to_owned(), Box::new(TSpinSearch::new()));
        RwLock::new(algorithms)
    };
}

/// A fresh shared handle to the rotation system registered under `name`.
/// Names are exact-match and case-sensitive.
pub fn rotation_system(name: &str) -> Result<Arc<dyn RotationSystem>, EngineError> {
    let systems = ROTATION_SYSTEMS
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    systems
        .get(name)
        .map(|prototype| Arc::from(prototype.clone_system()))
        .ok_or_else(|| EngineError::MissingRotationSystem(name.to_owned()))
}

/// Registers (or replaces) a rotation system prototype.
pub fn register_rotation_system(name: &str, system: Box<dyn RotationSystem>) {
    ROTATION_SYSTEMS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_owned(), system);
}

/// A fresh, configurable instance of the search algorithm registered
/// under `name`.
pub fn search_algorithm(name: &str) -> Option<Box<dyn SearchAlgorithm>> {
    let algorithms = SEARCH_ALGORITHMS
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    algorithms
        .get(name)
        .map(|prototype| prototype.clone_algorithm())
}

/// Registers (or replaces) a search algorithm prototype.
pub fn register_search_algorithm(name: &str, algorithm: Box<dyn SearchAlgorithm>) {
    SEARCH_ALGORITHMS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_owned(), algorithm);
}
