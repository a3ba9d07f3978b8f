use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::daypass::{DayPass, DayPassLedger, DayPassStore};
use crate::error::{TicketError, TicketResult};

/// The town the terminal sits in; fills the unused side of a trip's route.
pub const TERMINAL_TOWN: &str = "BROOKE'S POINT";

pub const INTERMUNICIPAL: &[&str] = &[
    "BROOKE'S POINT",
    "PPC",
    "ABORLAN",
    "NARRA",
    "S.ESPAÑOLA",
    "QUEZON",
    "BATARAZA",
    "RIO-TUBA",
    "BULILUYAN",
    "SICUD",
    "RIZAL",
];

pub const INTRAMUNICIPAL: &[&str] = &[
    "POBLACION",
    "TUBTUB",
    "PSU",
    "MAINIT",
    "IMULNOD",
    "PANGOBILIAN",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleClass {
    #[serde(rename = "BUS")]
    Bus,
    #[serde(rename = "SHUTTLE VAN")]
    ShuttleVan,
    #[serde(rename = "JEEP")]
    Jeep,
    #[serde(rename = "MULTICAB")]
    Multicab,
    #[serde(rename = "FILCAB")]
    Filcab,
    #[serde(rename = "TRICYCLE")]
    Tricycle,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 6] = [
        VehicleClass::Bus,
        VehicleClass::ShuttleVan,
        VehicleClass::Jeep,
        VehicleClass::Multicab,
        VehicleClass::Filcab,
        VehicleClass::Tricycle,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "BUS",
            Self::ShuttleVan => "SHUTTLE VAN",
            Self::Jeep => "JEEP",
            Self::Multicab => "MULTICAB",
            Self::Filcab => "FILCAB",
            Self::Tricycle => "TRICYCLE",
        }
    }

    pub fn locations(self) -> &'static [&'static str] {
        match self {
            Self::Tricycle => INTRAMUNICIPAL,
            _ => INTERMUNICIPAL,
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleClass {
    type Err = TicketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .to_uppercase()
            .replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == normalized)
            .ok_or_else(|| {
                TicketError::InvalidArgument(format!(
                    "unknown vehicle class '{value}' (expected one of: bus, shuttle-van, jeep, multicab, filcab, tricycle)"
                ))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripType {
    Arrival,
    Departure,
}

impl TripType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "ARRIVAL",
            Self::Departure => "DEPARTURE",
        }
    }
}

impl FromStr for TripType {
    type Err = TicketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "arrival" => Ok(Self::Arrival),
            "departure" => Ok(Self::Departure),
            other => Err(TicketError::InvalidArgument(format!(
                "unknown trip type '{other}' (expected arrival or departure)"
            ))),
        }
    }
}

/// Flat terminal fees per vehicle class. Fees are taken as configured; a
/// fee that no ticket combination can cover is reported by reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinance: Option<String>,
    pub fees: BTreeMap<VehicleClass, i64>,
    #[serde(default)]
    pub transport_groups: BTreeMap<VehicleClass, Vec<String>>,
}

impl Default for FeeTable {
    fn default() -> Self {
        let fees = BTreeMap::from([
            (VehicleClass::Bus, 60),
            (VehicleClass::ShuttleVan, 30),
            (VehicleClass::Jeep, 15),
            (VehicleClass::Multicab, 10),
            (VehicleClass::Filcab, 10),
            (VehicleClass::Tricycle, 10),
        ]);
        let groups = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        let transport_groups = BTreeMap::from([
            (VehicleClass::Bus, groups(&["RORO", "CHERRY"])),
            (
                VehicleClass::ShuttleVan,
                groups(&[
                    "BARAKAH",
                    "CENTRO",
                    "PILANDOK",
                    "RAYANN",
                    "RECARO",
                    "RIO TUBA EXP.",
                    "RUNLEE",
                    "FREELANCE",
                ]),
            ),
            (VehicleClass::Tricycle, groups(&["TODA"])),
            (VehicleClass::Jeep, groups(&["N/A"])),
            (VehicleClass::Multicab, groups(&["N/A"])),
            (VehicleClass::Filcab, groups(&["N/A"])),
        ]);
        Self {
            ordinance: Some("Ordinance 2026-01: all buses ₱60 flat".to_string()),
            fees,
            transport_groups,
        }
    }
}

impl FeeTable {
    pub fn fee_for(&self, class: VehicleClass) -> TicketResult<i64> {
        self.fees.get(&class).copied().ok_or_else(|| {
            TicketError::InvalidArgument(format!("no terminal fee configured for {class}"))
        })
    }

    pub fn transport_groups(&self, class: VehicleClass) -> &[String] {
        self.transport_groups
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the group as configured for `class`. A class with no groups
    /// configured accepts any non-empty group.
    pub fn check_transport_group(&self, class: VehicleClass, group: &str) -> TicketResult<String> {
        let group = group.trim();
        if group.is_empty() {
            return Err(TicketError::InvalidArgument(format!(
                "transport group for {class} must not be empty"
            )));
        }
        let known = self.transport_groups(class);
        if known.is_empty() {
            return Ok(group.to_uppercase());
        }
        known
            .iter()
            .find(|name| name.eq_ignore_ascii_case(group))
            .cloned()
            .ok_or_else(|| {
                TicketError::InvalidArgument(format!(
                    "transport group '{group}' does not belong to {class} (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

pub fn load_fee_table(path: impl AsRef<Path>) -> TicketResult<FeeTable> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let table = serde_yaml::from_slice::<FeeTable>(&bytes).map_err(|error| {
        TicketError::InvalidArgument(format!("invalid fee table '{}': {error}", path.display()))
    })?;
    for (class, fee) in &table.fees {
        if fee % 5 != 0 || *fee < 0 {
            warn!(%class, fee, "fee cannot be paid with ₱10/₱5 tickets");
        }
    }
    Ok(table)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub class: VehicleClass,
    pub trip: TripType,
    pub fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_pass: Option<DayPass>,
}

impl FeeQuote {
    pub fn is_exempt(&self) -> bool {
        self.day_pass.is_some()
    }
}

/// Maps a trip to the fee due, honouring the tricycle day pass.
#[derive(Debug)]
pub struct FeeResolver<S> {
    table: FeeTable,
    day_passes: DayPassLedger<S>,
}

impl<S: DayPassStore> FeeResolver<S> {
    pub fn new(table: FeeTable, day_passes: DayPassLedger<S>) -> Self {
        Self { table, day_passes }
    }

    pub fn table(&self) -> &FeeTable {
        &self.table
    }

    pub fn day_passes_mut(&mut self) -> &mut DayPassLedger<S> {
        &mut self.day_passes
    }

    pub fn resolve(
        &mut self,
        class: VehicleClass,
        trip: TripType,
        plate: Option<&str>,
        today: NaiveDate,
    ) -> TicketResult<FeeQuote> {
        if trip == TripType::Arrival {
            return Ok(FeeQuote {
                class,
                trip,
                fee: 0,
                day_pass: None,
            });
        }
        let fee = self.table.fee_for(class)?;
        let day_pass = match (class, plate) {
            (VehicleClass::Tricycle, Some(plate)) => self.day_passes.paid_today(plate, today),
            _ => None,
        };
        if let Some(pass) = &day_pass {
            debug!(%class, receipt = %pass.receipt, "day pass already paid; fee waived");
        }
        Ok(FeeQuote {
            class,
            trip,
            fee: if day_pass.is_some() { 0 } else { fee },
            day_pass,
        })
    }
}
