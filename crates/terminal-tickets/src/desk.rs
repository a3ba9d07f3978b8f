use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use tracing::{debug, info};

use crate::daypass::{normalize_plate, DayPassStore};
use crate::error::{TicketError, TicketResult};
use crate::fees::{FeeResolver, TripType, VehicleClass};
use crate::reconcile::reconcile;
use crate::registry::{VehicleRegistry, VehicleRegistryStore};
use crate::serial::Serial;
use crate::submission::{PassengerCounts, PreparedSubmission, TripSubmission};

/// What the operator entered for one trip. Class and transport group may be
/// left out for a plate the registry already knows.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionRequest {
    pub trip_date: NaiveDate,
    pub trip_time: NaiveTime,
    pub trip: TripType,
    pub plate: String,
    pub class: Option<VehicleClass>,
    pub transport_group: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub passengers: PassengerCounts,
    pub username: String,
    pub start10: Option<Serial>,
    pub start5: Option<Serial>,
    pub payment_method: String,
    pub payment_status: String,
    pub receipt: Option<String>,
    pub notes: String,
    pub allow_invalid_tickets: bool,
}

/// The terminal's data-entry desk: fee lookup with day passes, the vehicle
/// registry, and ticket reconciliation feeding one outbound record.
#[derive(Debug)]
pub struct TerminalDesk<D, R> {
    fees: FeeResolver<D>,
    registry: VehicleRegistry<R>,
}

impl<D: DayPassStore, R: VehicleRegistryStore> TerminalDesk<D, R> {
    pub fn new(fees: FeeResolver<D>, registry: VehicleRegistry<R>) -> Self {
        Self { fees, registry }
    }

    pub fn fees_mut(&mut self) -> &mut FeeResolver<D> {
        &mut self.fees
    }

    pub fn registry(&self) -> &VehicleRegistry<R> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut VehicleRegistry<R> {
        &mut self.registry
    }

    /// Settles class, group, fee and tickets for a trip. A plate not yet on
    /// file is registered once its class and group check out.
    pub fn prepare<Tz: TimeZone>(
        &mut self,
        request: SubmissionRequest,
        now: DateTime<Tz>,
    ) -> TicketResult<PreparedSubmission> {
        let plate = normalize_plate(&request.plate)?;
        let on_file = self.registry.lookup(&plate);
        let (class, group) = match (request.class, request.transport_group, on_file) {
            (Some(class), Some(group), _) => (class, group),
            (class, group, Some((known_class, known_group))) => {
                debug!(%plate, %known_class, "vehicle found in registry");
                let class = class.unwrap_or(known_class);
                let group = group.unwrap_or(if class == known_class {
                    known_group
                } else {
                    String::new()
                });
                (class, group)
            }
            (None, _, None) => {
                return Err(TicketError::InvalidArgument(format!(
                    "plate '{plate}' is not registered; give its vehicle class"
                )))
            }
            (Some(class), None, None) => {
                return Err(TicketError::InvalidArgument(format!(
                    "plate '{plate}' is not registered; give its {class} transport group"
                )))
            }
        };
        let group = self.fees.table().check_transport_group(class, &group)?;

        let local = now.naive_local();
        if self
            .registry
            .register(&plate, class, &group, &request.username, local)?
        {
            info!(%plate, %class, "new vehicle registered from submission");
        }

        let quote = self
            .fees
            .resolve(class, request.trip, Some(&plate), local.date())?;
        let tickets = reconcile(quote.fee, request.start10.as_ref(), request.start5.as_ref());
        if !tickets.valid && !request.allow_invalid_tickets {
            return Err(TicketError::InvalidArgument(format!(
                "tickets do not cover the fee: {}",
                tickets.diagnostic_message
            )));
        }
        info!(fee = quote.fee, code = tickets.diagnostic.code(), "preparing submission");

        let mut receipt = request.receipt;
        let mut notes = request.notes;
        let mut payment_status = request.payment_status;
        if let Some(pass) = &quote.day_pass {
            receipt.get_or_insert_with(|| pass.receipt.clone());
            payment_status = "Paid".to_string();
            if notes.trim().is_empty() {
                notes = format!("Day pass paid at {}", pass.time_label());
            }
        }

        TripSubmission {
            trip_date: request.trip_date,
            trip_time: request.trip_time,
            trip: request.trip,
            class,
            transport_group: group,
            origin: request.origin,
            destination: request.destination,
            plate,
            passengers: request.passengers,
            username: request.username,
            fee: quote.fee,
            payment_method: request.payment_method,
            payment_status,
            receipt,
            notes,
            tickets: Some(tickets),
        }
        .prepare(now)
    }

    /// Records what an accepted submission implies, namely the day pass a
    /// paid tricycle departure earns.
    pub fn confirm(&mut self, submission: &PreparedSubmission) -> TicketResult<()> {
        if let Some(pass) = submission.day_pass() {
            self.fees.day_passes_mut().mark_paid(
                submission.plate(),
                &pass.receipt,
                pass.paid_at,
            )?;
        }
        Ok(())
    }
}
