//! Named catalog of event channels
//!
//! Lets independently built modules meet on a shared channel by key without
//! depending on whichever module created it first. A key is bound to one
//! signature for the registry lifetime.

use super::channel::{Event, EventSignature};
use crate::error::{SensimError, SensimResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

static GLOBAL_REGISTRY: Lazy<EventRegistry> = Lazy::new(EventRegistry::new);

struct RegistryEntry {
    type_id: TypeId,
    signature: &'static str,
    channel: Box<dyn Any + Send + Sync>,
}

impl RegistryEntry {
    fn channel<S: EventSignature>(&self, key: &str) -> SensimResult<Event<S>> {
        if self.type_id != TypeId::of::<S>() {
            return Err(SensimError::TypeMismatch {
                key: key.to_string(),
                registered: self.signature,
                requested: S::NAME,
            });
        }
        self.channel
            .downcast_ref::<Event<S>>()
            .cloned()
            .ok_or_else(|| SensimError::TypeMismatch {
                key: key.to_string(),
                registered: self.signature,
                requested: S::NAME,
            })
    }
}

/// Internally synchronized map of key -> typed channel
pub struct EventRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl EventRegistry {
    /// Create an empty, isolated registry
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide registry, created on first use and never torn down
    pub fn global() -> &'static EventRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register `key` with signature `S`, or fetch the existing channel
    ///
    /// Registering an existing key with the same signature returns the very
    /// same channel. A different signature fails with
    /// [`SensimError::TypeMismatch`]. Keys are compared exactly, so empty
    /// keys and keys with surrounding whitespace are rejected.
    pub fn register<S: EventSignature>(&self, key: &str) -> SensimResult<Event<S>> {
        if key.trim().is_empty() {
            return Err(SensimError::config("event key must not be empty"));
        }
        if key.trim() != key {
            return Err(SensimError::config(format!(
                "event key '{}' has surrounding whitespace",
                key
            )));
        }

        if let Some(existing) = self.lookup::<S>(key)? {
            return Ok(existing);
        }

        let mut entries = self.entries.write();
        match entries.entry(key.to_string()) {
            // Another thread won the race between our read and write locks.
            Entry::Occupied(occupied) => occupied.get().channel::<S>(key),
            Entry::Vacant(vacant) => {
                let event = Event::<S>::new();
                vacant.insert(RegistryEntry {
                    type_id: TypeId::of::<S>(),
                    signature: S::NAME,
                    channel: Box::new(event.clone()),
                });
                log::debug!("Registered event '{}' as {}", key, S::NAME);
                Ok(event)
            }
        }
    }

    /// Fetch a registered channel without creating it
    pub fn lookup<S: EventSignature>(&self, key: &str) -> SensimResult<Option<Event<S>>> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) => entry.channel::<S>(key).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Signature name bound to `key`
    pub fn signature_of(&self, key: &str) -> Option<&'static str> {
        self.entries.read().get(key).map(|entry| entry.signature)
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
