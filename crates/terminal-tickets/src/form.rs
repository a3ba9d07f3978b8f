use tracing::debug;

use crate::error::TicketResult;
use crate::reconcile::{reconcile, Denomination, Reconciliation};
use crate::serial::{extract_serial_candidate, Serial};

/// Ticket section of the trip form. Each edit re-runs reconciliation from
/// scratch; the returned value replaces whatever was shown before.
#[derive(Clone, Debug, Default)]
pub struct TicketForm {
    fee: i64,
    serial10_text: String,
    serial5_text: String,
    serial10: Option<Serial>,
    serial5: Option<Serial>,
}

impl TicketForm {
    pub fn new(fee: i64) -> Self {
        Self {
            fee,
            ..Self::default()
        }
    }

    pub fn fee(&self) -> i64 {
        self.fee
    }

    pub fn serial_text(&self, denomination: Denomination) -> &str {
        match denomination {
            Denomination::Ten => &self.serial10_text,
            Denomination::Five => &self.serial5_text,
        }
    }

    pub fn set_fee(&mut self, fee: i64) -> Reconciliation {
        self.fee = fee;
        self.current()
    }

    /// Rejected text leaves the field as it was.
    pub fn set_serial_text(
        &mut self,
        denomination: Denomination,
        text: &str,
    ) -> TicketResult<Reconciliation> {
        let parsed = Serial::parse(text)?;
        match denomination {
            Denomination::Ten => {
                self.serial10_text = text.to_string();
                self.serial10 = parsed;
            }
            Denomination::Five => {
                self.serial5_text = text.to_string();
                self.serial5 = parsed;
            }
        }
        Ok(self.current())
    }

    /// Puts a serial read from a ticket photo into the ₱10 field, where staff
    /// can move or correct it. `None` when no serial could be picked out.
    pub fn apply_ocr_text(&mut self, recognized: &str) -> TicketResult<Option<Reconciliation>> {
        let Some(candidate) = extract_serial_candidate(recognized) else {
            debug!("no serial candidate in recognised text");
            return Ok(None);
        };
        self.set_serial_text(Denomination::Ten, &candidate).map(Some)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn current(&self) -> Reconciliation {
        let result = reconcile(self.fee, self.serial10.as_ref(), self.serial5.as_ref());
        debug!(
            fee = self.fee,
            mode = ?result.mode,
            code = result.diagnostic.code(),
            "tickets reconciled"
        );
        result
    }
}
