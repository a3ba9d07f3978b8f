use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

use crate::daypass::DayPass;
use crate::error::{TicketError, TicketResult};
use crate::fees::{TripType, VehicleClass, TERMINAL_TOWN};
use crate::reconcile::{Denomination, Reconciliation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerCounts {
    pub adult_male: u32,
    pub adult_female: u32,
    pub child_male: u32,
    pub child_female: u32,
    pub senior_male: u32,
    pub senior_female: u32,
    pub pwd_male: u32,
    pub pwd_female: u32,
    pub pregnant: u32,
}

impl PassengerCounts {
    pub fn adult_total(&self) -> u64 {
        u64::from(self.adult_male) + u64::from(self.adult_female)
    }

    pub fn child_total(&self) -> u64 {
        u64::from(self.child_male) + u64::from(self.child_female)
    }

    pub fn senior_total(&self) -> u64 {
        u64::from(self.senior_male) + u64::from(self.senior_female)
    }

    pub fn pwd_total(&self) -> u64 {
        u64::from(self.pwd_male) + u64::from(self.pwd_female)
    }

    /// Seniors, PWD and pregnant passengers are already counted as adults or
    /// children.
    pub fn total_passengers(&self) -> u64 {
        self.adult_total() + self.child_total()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TripSubmission {
    pub trip_date: NaiveDate,
    pub trip_time: NaiveTime,
    pub trip: TripType,
    pub class: VehicleClass,
    pub transport_group: String,
    /// Where an arriving vehicle came from. Ignored for departures.
    pub origin: Option<String>,
    /// Where a departing vehicle is headed. Ignored for arrivals.
    pub destination: Option<String>,
    pub plate: String,
    pub passengers: PassengerCounts,
    pub username: String,
    pub fee: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub receipt: Option<String>,
    pub notes: String,
    pub tickets: Option<Reconciliation>,
}

/// A submission with its receipt, route and notes settled, ready to encode.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedSubmission {
    trip: TripSubmission,
    origin: String,
    destination: String,
    receipt: String,
    notes: String,
    ticket10: String,
    ticket5: String,
    day_pass: Option<DayPass>,
}

pub fn generate_receipt<Tz: TimeZone>(now: DateTime<Tz>) -> String {
    let millis = now.timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(4)..];
    format!("TF-{}-{tail:0>4}", now.year())
}

impl TripSubmission {
    pub fn is_paid(&self) -> bool {
        self.payment_status.trim().eq_ignore_ascii_case("paid")
    }

    pub fn prepare<Tz: TimeZone>(self, now: DateTime<Tz>) -> TicketResult<PreparedSubmission> {
        if self.plate.trim().is_empty() {
            return Err(TicketError::InvalidArgument(
                "plate number must not be empty".to_string(),
            ));
        }
        let (origin, destination) = match self.trip {
            TripType::Arrival => (
                required_place(self.origin.as_deref(), "origin")?,
                TERMINAL_TOWN.to_string(),
            ),
            TripType::Departure => (
                TERMINAL_TOWN.to_string(),
                required_place(self.destination.as_deref(), "destination")?,
            ),
        };

        let mut receipt = self
            .receipt
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if receipt.is_empty() && self.trip == TripType::Departure && self.is_paid() {
            receipt = generate_receipt(now.clone());
            debug!(%receipt, "generated receipt for paid departure");
        }

        let record = self.tickets.as_ref().and_then(Reconciliation::record_string);
        let mut notes = self.notes.trim().to_string();
        if let Some(record) = &record {
            if !notes.is_empty() {
                notes.push_str(" | ");
            }
            notes.push_str("Tickets: ");
            notes.push_str(record);
        }

        let field = |denomination| {
            self.tickets
                .as_ref()
                .filter(|tickets| tickets.valid)
                .and_then(|tickets| tickets.record_for(denomination))
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        let ticket10 = field(Denomination::Ten);
        let ticket5 = field(Denomination::Five);

        // A paid tricycle departure buys the plate its day pass.
        let day_pass = (self.class == VehicleClass::Tricycle
            && self.trip == TripType::Departure
            && self.is_paid()
            && self.fee > 0
            && !receipt.is_empty())
        .then(|| DayPass {
            receipt: receipt.clone(),
            paid_at: now.naive_local(),
        });

        Ok(PreparedSubmission {
            origin,
            destination,
            receipt,
            notes,
            ticket10,
            ticket5,
            day_pass,
            trip: TripSubmission {
                plate: self.plate.trim().to_uppercase(),
                ..self
            },
        })
    }
}

fn required_place(value: Option<&str>, what: &str) -> TicketResult<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(place) => Ok(place.to_string()),
        None => Err(TicketError::InvalidArgument(format!("{what} is required"))),
    }
}

impl PreparedSubmission {
    pub fn receipt(&self) -> &str {
        &self.receipt
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn plate(&self) -> &str {
        &self.trip.plate
    }

    /// The day pass to record once the upstream store accepts this trip.
    pub fn day_pass(&self) -> Option<&DayPass> {
        self.day_pass.as_ref()
    }

    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let trip = &self.trip;
        let p = &trip.passengers;
        vec![
            ("tripDate", trip.trip_date.format("%Y-%m-%d").to_string()),
            ("tripTime", trip.trip_time.format("%H:%M").to_string()),
            ("type", trip.trip.as_str().to_string()),
            ("denomination", trip.class.as_str().to_string()),
            ("transportGroup", trip.transport_group.clone()),
            ("origin", self.origin.clone()),
            ("destination", self.destination.clone()),
            ("plateNumber", trip.plate.clone()),
            ("adultMale", p.adult_male.to_string()),
            ("adultFemale", p.adult_female.to_string()),
            ("adultTotal", p.adult_total().to_string()),
            ("childMale", p.child_male.to_string()),
            ("childFemale", p.child_female.to_string()),
            ("childTotal", p.child_total().to_string()),
            ("seniorMale", p.senior_male.to_string()),
            ("seniorFemale", p.senior_female.to_string()),
            ("seniorTotal", p.senior_total().to_string()),
            ("pwdMale", p.pwd_male.to_string()),
            ("pwdFemale", p.pwd_female.to_string()),
            ("pwdTotal", p.pwd_total().to_string()),
            ("pregnant", p.pregnant.to_string()),
            ("totalPassengers", p.total_passengers().to_string()),
            ("username", trip.username.clone()),
            ("terminalFee", trip.fee.to_string()),
            ("paymentMethod", trip.payment_method.clone()),
            ("paymentStatus", trip.payment_status.clone()),
            ("receiptNumber", self.receipt.clone()),
            ("feeNotes", self.notes.clone()),
            ("ticket10", self.ticket10.clone()),
            ("ticket5", self.ticket5.clone()),
        ]
    }

    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_fields() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}
