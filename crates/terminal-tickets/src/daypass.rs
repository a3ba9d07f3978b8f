use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{TicketError, TicketResult};

/// Proof that a tricycle already paid its once-a-day terminal fee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPass {
    pub receipt: String,
    pub paid_at: NaiveDateTime,
}

impl DayPass {
    pub fn time_label(&self) -> String {
        self.paid_at.format("%I:%M %p").to_string()
    }
}

/// Key-value backing for the day-pass ledger. The ledger owns the reset
/// rule; a store only keeps what it is given.
pub trait DayPassStore {
    fn date_key(&self) -> Option<NaiveDate>;
    fn set_date_key(&mut self, date: NaiveDate);
    fn get(&self, plate: &str) -> Option<DayPass>;
    fn put(&mut self, plate: String, pass: DayPass);
    fn clear(&mut self);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryDayPassStore {
    date_key: Option<NaiveDate>,
    passes: HashMap<String, DayPass>,
}

impl MemoryDayPassStore {
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl DayPassStore for MemoryDayPassStore {
    fn date_key(&self) -> Option<NaiveDate> {
        self.date_key
    }

    fn set_date_key(&mut self, date: NaiveDate) {
        self.date_key = Some(date);
    }

    fn get(&self, plate: &str) -> Option<DayPass> {
        self.passes.get(plate).cloned()
    }

    fn put(&mut self, plate: String, pass: DayPass) {
        self.passes.insert(plate, pass);
    }

    fn clear(&mut self) {
        self.passes.clear();
    }
}

#[derive(Debug, Default)]
pub struct DayPassLedger<S> {
    store: S,
}

impl<S: DayPassStore> DayPassLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drops every pass recorded under a different date. Returns whether a
    /// reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        match self.store.date_key() {
            Some(stored) if stored == today => false,
            stored => {
                self.store.clear();
                self.store.set_date_key(today);
                info!(?stored, %today, "day passes reset");
                true
            }
        }
    }

    pub fn mark_paid(&mut self, plate: &str, receipt: &str, at: NaiveDateTime) -> TicketResult<()> {
        let plate = normalize_plate(plate)?;
        if receipt.trim().is_empty() {
            return Err(TicketError::InvalidArgument(format!(
                "day pass for '{plate}' needs a receipt number"
            )));
        }
        if let Some(current) = self.store.date_key() {
            if at.date() < current {
                return Err(TicketError::InvalidArgument(format!(
                    "day pass for '{plate}' paid on {} predates the current day {current}",
                    at.date()
                )));
            }
        }
        self.roll_over(at.date());
        debug!(%plate, receipt, "day pass recorded");
        self.store.put(
            plate,
            DayPass {
                receipt: receipt.trim().to_string(),
                paid_at: at,
            },
        );
        Ok(())
    }

    pub fn paid_today(&mut self, plate: &str, today: NaiveDate) -> Option<DayPass> {
        let plate = normalize_plate(plate).ok()?;
        self.roll_over(today);
        self.store.get(&plate)
    }
}

pub fn normalize_plate(plate: &str) -> TicketResult<String> {
    let plate = plate.trim().to_uppercase();
    if plate.is_empty() {
        return Err(TicketError::InvalidArgument(
            "plate number must not be empty".to_string(),
        ));
    }
    Ok(plate)
}
