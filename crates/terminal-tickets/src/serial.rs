use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Serialize, Serializer};

use crate::error::{TicketError, TicketResult};

/// Printed width of a serial on the ticket roll. Presentation only: values
/// wider than this are rendered in full.
pub const SERIAL_DISPLAY_WIDTH: usize = 6;

const OCR_MIN_DIGITS: usize = 4;
const OCR_MAX_DIGITS: usize = 8;

/// A physical ticket-stub serial number. Always positive; zero means the
/// denomination is not in use and is represented by `None` instead.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Serial(BigUint);

impl Serial {
    pub fn new(value: impl Into<BigUint>) -> Option<Self> {
        let value = value.into();
        if value.is_zero() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Parses staff input. Blank input and zero both mean "unset".
    pub fn parse(input: &str) -> TicketResult<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_digit()) {
            return Err(TicketError::InvalidSerial {
                input: input.to_string(),
                reason: format!("unexpected character '{bad}'; serials are digits only"),
            });
        }
        let value = BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(|| {
            TicketError::InvalidSerial {
                input: input.to_string(),
                reason: "not a decimal number".to_string(),
            }
        })?;
        Ok(Self::new(value))
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Last serial of a contiguous run of `quantity` tickets starting here.
    pub fn end_of_run(&self, quantity: u64) -> Self {
        debug_assert!(quantity >= 1, "a ticket run holds at least one ticket");
        Self(&self.0 + quantity - BigUint::one())
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_str_radix(10);
        write!(f, "{digits:0>width$}", width = SERIAL_DISPLAY_WIDTH)
    }
}

impl Serialize for Serial {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Picks the serial out of text recognised from a ticket photo: all
/// non-digits are dropped, then the first 4 to 8 digits are taken and padded
/// to display width.
pub fn extract_serial_candidate(recognized: &str) -> Option<String> {
    let digits: String = recognized.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < OCR_MIN_DIGITS {
        return None;
    }
    let run = &digits[..digits.len().min(OCR_MAX_DIGITS)];
    Some(format!("{run:0>width$}", width = SERIAL_DISPLAY_WIDTH))
}
