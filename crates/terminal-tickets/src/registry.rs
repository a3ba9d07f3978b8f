use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::daypass::normalize_plate;
use crate::error::TicketResult;
use crate::fees::VehicleClass;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleEntry {
    pub class: VehicleClass,
    pub transport_group: String,
    pub added_at: NaiveDateTime,
    pub added_by: String,
}

/// Key-value backing for the vehicle registry, keyed by upper-cased plate.
pub trait VehicleRegistryStore {
    fn get(&self, plate: &str) -> Option<VehicleEntry>;
    fn put(&mut self, plate: String, entry: VehicleEntry);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryVehicleRegistry {
    vehicles: HashMap<String, VehicleEntry>,
}

impl MemoryVehicleRegistry {
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

impl VehicleRegistryStore for MemoryVehicleRegistry {
    fn get(&self, plate: &str) -> Option<VehicleEntry> {
        self.vehicles.get(plate).cloned()
    }

    fn put(&mut self, plate: String, entry: VehicleEntry) {
        self.vehicles.insert(plate, entry);
    }
}

#[derive(Debug, Default)]
pub struct VehicleRegistry<S> {
    store: S,
}

impl<S: VehicleRegistryStore> VehicleRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn entry(&self, plate: &str) -> Option<VehicleEntry> {
        let plate = normalize_plate(plate).ok()?;
        self.store.get(&plate)
    }

    /// Class and transport group on file for a plate.
    pub fn lookup(&self, plate: &str) -> Option<(VehicleClass, String)> {
        self.entry(plate)
            .map(|entry| (entry.class, entry.transport_group))
    }

    /// Adds a plate seen for the first time. Returns `false` and leaves the
    /// existing entry alone when the plate is already registered.
    pub fn register(
        &mut self,
        plate: &str,
        class: VehicleClass,
        transport_group: &str,
        added_by: &str,
        at: NaiveDateTime,
    ) -> TicketResult<bool> {
        let plate = normalize_plate(plate)?;
        if self.store.get(&plate).is_some() {
            return Ok(false);
        }
        info!(%plate, %class, transport_group, "vehicle added to registry");
        self.store.put(
            plate,
            VehicleEntry {
                class,
                transport_group: transport_group.trim().to_string(),
                added_at: at,
                added_by: added_by.to_string(),
            },
        );
        Ok(true)
    }
}
