//! Ticket-serial reconciliation.
//!
//! Staff record only the first serial they tear from each roll; everything
//! else (how many stubs of each face value, where each run ends, whether the
//! runs add up to the terminal fee) is derived here. The result is advisory:
//! nothing in this module fails, an unusable combination of inputs comes back
//! as an invalid [`Reconciliation`] carrying a [`Diagnostic`] for the
//! operator, and the caller decides whether to block submission on it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::serial::Serial;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Denomination {
    Ten,
    Five,
}

impl Denomination {
    pub const fn value(self) -> u64 {
        match self {
            Self::Ten => 10,
            Self::Five => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ten => "₱10",
            Self::Five => "₱5",
        }
    }
}

impl Serialize for Denomination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value())
    }
}

/// One contiguous run of stubs of a single face value, inclusive at both ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TicketRecord {
    pub denomination: Denomination,
    pub start: Serial,
    pub end: Serial,
    pub quantity: u64,
}

impl TicketRecord {
    fn run(denomination: Denomination, start: &Serial, quantity: u64) -> Self {
        Self {
            denomination,
            start: start.clone(),
            end: start.end_of_run(quantity),
            quantity,
        }
    }

    pub fn covered(&self) -> u64 {
        self.quantity * self.denomination.value()
    }
}

impl fmt::Display for TicketRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}",
            self.denomination.value(),
            self.start,
            self.end
        )
    }
}

/// Which serial fields the operator filled in, after the fee checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    NothingDue,
    FiveOnly,
    TenOnly,
    Mixed,
    NoSerials,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Diagnostic {
    Valid {
        covered: u64,
    },
    NothingDue,
    NegativeFee {
        fee: i64,
    },
    FeeNotMultipleOf5 {
        fee: i64,
    },
    NoSerialsProvided,
    IncompleteTenOnlyCoverage {
        fee: u64,
        remainder: u64,
    },
    QuantityNotIntegral {
        amount: u64,
        denomination: Denomination,
    },
}

impl Diagnostic {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "valid",
            Self::NothingDue => "nothing_due",
            Self::NegativeFee { .. } => "negative_fee",
            Self::FeeNotMultipleOf5 { .. } => "fee_not_multiple_of_5",
            Self::NoSerialsProvided => "no_serials_provided",
            Self::IncompleteTenOnlyCoverage { .. } => "incomplete_ten_only_coverage",
            Self::QuantityNotIntegral { .. } => "quantity_not_integral",
        }
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. } | Self::NothingDue)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid { covered } => write!(f, "tickets cover the ₱{covered} fee"),
            Self::NothingDue => write!(f, "no ticket needed: nothing to collect"),
            Self::NegativeFee { fee } => {
                write!(f, "fee ₱{fee} is negative; check the fee table")
            }
            Self::FeeNotMultipleOf5 { fee } => write!(
                f,
                "fee ₱{fee} is not a multiple of ₱5 and cannot be paid with ₱10/₱5 tickets; check the fee table"
            ),
            Self::NoSerialsProvided => {
                write!(f, "enter a starting serial for the ₱10 or ₱5 tickets")
            }
            Self::IncompleteTenOnlyCoverage { fee, remainder } => write!(
                f,
                "fee ₱{fee} needs a ₱5 ticket too; enter the ₱5 starting serial for the remaining ₱{remainder}"
            ),
            Self::QuantityNotIntegral {
                amount,
                denomination,
            } => write!(
                f,
                "₱{amount} is not a whole number of {} tickets",
                denomination.label()
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub fee: i64,
    pub mode: InputMode,
    pub records: Vec<TicketRecord>,
    pub total_covered: u64,
    pub valid: bool,
    pub diagnostic: Diagnostic,
    pub diagnostic_message: String,
}

impl Reconciliation {
    fn new(fee: i64, mode: InputMode, records: Vec<TicketRecord>, diagnostic: Diagnostic) -> Self {
        let total_covered = records.iter().map(TicketRecord::covered).sum();
        Self {
            fee,
            mode,
            records,
            total_covered,
            valid: diagnostic.is_valid(),
            diagnostic_message: diagnostic.to_string(),
            diagnostic,
        }
    }

    /// The combined record (`10-…:…+5-…:…`). Only a valid, non-empty
    /// reconciliation produces one; partial runs are for display only.
    pub fn record_string(&self) -> Option<String> {
        if !self.valid || self.records.is_empty() {
            return None;
        }
        Some(
            self.records
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("+"),
        )
    }

    pub fn record_for(&self, denomination: Denomination) -> Option<&TicketRecord> {
        self.records
            .iter()
            .find(|record| record.denomination == denomination)
    }

    pub fn hint(&self) -> String {
        match self.record_string() {
            Some(record) => format!("Total: ₱{}  |  Record: {record}", self.total_covered),
            None => self.diagnostic_message.clone(),
        }
    }
}

/// Works out which stubs pay `fee` given the first ₱10 and ₱5 serials in use.
pub fn reconcile(fee: i64, start10: Option<&Serial>, start5: Option<&Serial>) -> Reconciliation {
    let mode = match (start10, start5) {
        (None, None) => InputMode::NoSerials,
        (None, Some(_)) => InputMode::FiveOnly,
        (Some(_), None) => InputMode::TenOnly,
        (Some(_), Some(_)) => InputMode::Mixed,
    };
    let Ok(amount) = u64::try_from(fee) else {
        return Reconciliation::new(fee, mode, Vec::new(), Diagnostic::NegativeFee { fee });
    };
    if amount == 0 {
        return Reconciliation::new(fee, InputMode::NothingDue, Vec::new(), Diagnostic::NothingDue);
    }
    if amount % Denomination::Five.value() != 0 {
        return Reconciliation::new(
            fee,
            mode,
            Vec::new(),
            Diagnostic::FeeNotMultipleOf5 { fee },
        );
    }

    match (start10, start5) {
        (None, None) => {
            Reconciliation::new(fee, mode, Vec::new(), Diagnostic::NoSerialsProvided)
        }
        (None, Some(start5)) => match exact_quantity(amount, Denomination::Five) {
            Some(quantity) => Reconciliation::new(
                fee,
                mode,
                vec![TicketRecord::run(Denomination::Five, start5, quantity)],
                Diagnostic::Valid { covered: amount },
            ),
            None => not_integral(fee, mode, amount, Denomination::Five),
        },
        (Some(start10), None) => {
            let remainder = amount % Denomination::Ten.value();
            if remainder == 0 {
                return match exact_quantity(amount, Denomination::Ten) {
                    Some(quantity) => Reconciliation::new(
                        fee,
                        mode,
                        vec![TicketRecord::run(Denomination::Ten, start10, quantity)],
                        Diagnostic::Valid { covered: amount },
                    ),
                    None => not_integral(fee, mode, amount, Denomination::Ten),
                };
            }
            // Partial ₱10 run is reported for display; the ₱5 serial is never guessed.
            let quantity = amount / Denomination::Ten.value();
            let records = if quantity > 0 {
                vec![TicketRecord::run(Denomination::Ten, start10, quantity)]
            } else {
                Vec::new()
            };
            Reconciliation::new(
                fee,
                mode,
                records,
                Diagnostic::IncompleteTenOnlyCoverage {
                    fee: amount,
                    remainder,
                },
            )
        }
        (Some(start10), Some(start5)) => {
            let quantity10 = amount / Denomination::Ten.value();
            let remainder = amount % Denomination::Ten.value();
            let Some(quantity5) = exact_quantity(remainder, Denomination::Five) else {
                return not_integral(fee, mode, remainder, Denomination::Five);
            };
            let mut records = Vec::with_capacity(2);
            if quantity10 > 0 {
                records.push(TicketRecord::run(Denomination::Ten, start10, quantity10));
            }
            if quantity5 > 0 {
                records.push(TicketRecord::run(Denomination::Five, start5, quantity5));
            }
            Reconciliation::new(fee, mode, records, Diagnostic::Valid { covered: amount })
        }
    }
}

fn exact_quantity(amount: u64, denomination: Denomination) -> Option<u64> {
    let face = denomination.value();
    (amount % face == 0).then_some(amount / face)
}

fn not_integral(fee: i64, mode: InputMode, amount: u64, denomination: Denomination) -> Reconciliation {
    Reconciliation::new(
        fee,
        mode,
        Vec::new(),
        Diagnostic::QuantityNotIntegral {
            amount,
            denomination,
        },
    )
}
