use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use crate::error::{TicketError, TicketResult};
use crate::fees::{load_fee_table, FeeTable, TripType, VehicleClass};
use crate::serial::Serial;
use crate::submission::PassengerCounts;

#[derive(Debug, Parser)]
#[command(
    name = "terminal-tickets",
    about = "bus terminal fee and ticket-serial reconciliation"
)]
pub struct Args {
    /// YAML fee table replacing the built-in ordinance fees.
    #[arg(long, env = "TERMINAL_TICKETS_FEE_TABLE")]
    pub fee_table: Option<PathBuf>,
    #[arg(long, env = "TERMINAL_TICKETS_OPERATOR", default_value = "terminal")]
    pub operator: String,
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work out ticket runs and end serials for a fee.
    Reconcile {
        #[arg(long, allow_negative_numbers = true)]
        fee: i64,
        #[arg(long = "start10")]
        start10: Option<String>,
        #[arg(long = "start5")]
        start5: Option<String>,
    },
    /// Look up the terminal fee for a trip.
    Fee {
        #[arg(long)]
        class: VehicleClass,
        #[arg(long, default_value = "departure")]
        trip: TripType,
        #[arg(long)]
        plate: Option<String>,
        /// Receipt of a tricycle day pass already paid today.
        #[arg(long, requires = "plate")]
        day_pass_receipt: Option<String>,
    },
    /// Show the ticket combinations that pay a fee.
    Hint {
        #[arg(long)]
        fee: u64,
    },
    /// Print the encoded trip record that would be sent upstream.
    Submit(SubmitArgs),
    Doctor,
}

#[derive(Debug, clap::Args)]
pub struct SubmitArgs {
    /// Needed only for a plate the registry does not know.
    #[arg(long)]
    pub class: Option<VehicleClass>,
    #[arg(long)]
    pub trip: TripType,
    #[arg(long)]
    pub plate: String,
    #[arg(long = "group")]
    pub transport_group: Option<String>,
    /// Known vehicle as PLATE=CLASS:GROUP; repeatable.
    #[arg(long = "vehicle")]
    pub vehicles: Vec<String>,
    /// Receipt of a tricycle day pass this plate already paid today.
    #[arg(long)]
    pub day_pass_receipt: Option<String>,
    #[arg(long)]
    pub origin: Option<String>,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub time: Option<NaiveTime>,
    #[command(flatten)]
    pub passengers: PassengerArgs,
    #[arg(long = "start10")]
    pub start10: Option<String>,
    #[arg(long = "start5")]
    pub start5: Option<String>,
    #[arg(long, default_value = "Cash")]
    pub payment_method: String,
    #[arg(long, default_value = "Paid")]
    pub payment_status: String,
    #[arg(long)]
    pub receipt: Option<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Submit even when the ticket serials do not cover the fee.
    #[arg(long)]
    pub allow_invalid_tickets: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct PassengerArgs {
    #[arg(long, default_value_t = 0)]
    pub adult_male: u32,
    #[arg(long, default_value_t = 0)]
    pub adult_female: u32,
    #[arg(long, default_value_t = 0)]
    pub child_male: u32,
    #[arg(long, default_value_t = 0)]
    pub child_female: u32,
    #[arg(long, default_value_t = 0)]
    pub senior_male: u32,
    #[arg(long, default_value_t = 0)]
    pub senior_female: u32,
    #[arg(long, default_value_t = 0)]
    pub pwd_male: u32,
    #[arg(long, default_value_t = 0)]
    pub pwd_female: u32,
    #[arg(long, default_value_t = 0)]
    pub pregnant: u32,
}

impl From<PassengerArgs> for PassengerCounts {
    fn from(args: PassengerArgs) -> Self {
        Self {
            adult_male: args.adult_male,
            adult_female: args.adult_female,
            child_male: args.child_male,
            child_female: args.child_female,
            senior_male: args.senior_male,
            senior_female: args.senior_female,
            pwd_male: args.pwd_male,
            pwd_female: args.pwd_female,
            pregnant: args.pregnant,
        }
    }
}

pub fn validate_operator(operator: &str) -> TicketResult<()> {
    if operator.trim().is_empty() {
        return Err(TicketError::InvalidArgument(
            "operator must not be empty".to_string(),
        ));
    }
    if !operator
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
    {
        return Err(TicketError::InvalidArgument(
            "operator contains invalid characters; allowed: [A-Za-z0-9._-]".to_string(),
        ));
    }
    Ok(())
}

pub fn parse_serial_arg(value: Option<&str>) -> TicketResult<Option<Serial>> {
    match value {
        Some(text) => Serial::parse(text),
        None => Ok(None),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleSeed {
    pub plate: String,
    pub class: VehicleClass,
    pub transport_group: String,
}

pub fn parse_vehicle_seeds(entries: &[String]) -> TicketResult<Vec<VehicleSeed>> {
    let mut seeds = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some((plate, rest)) = entry.split_once('=') else {
            return Err(TicketError::InvalidArgument(format!(
                "invalid vehicle '{entry}'; expected PLATE=CLASS:GROUP"
            )));
        };
        let Some((class, group)) = rest.split_once(':') else {
            return Err(TicketError::InvalidArgument(format!(
                "invalid vehicle '{entry}'; expected PLATE=CLASS:GROUP"
            )));
        };
        if plate.trim().is_empty() || group.trim().is_empty() {
            return Err(TicketError::InvalidArgument(format!(
                "invalid vehicle '{entry}'; plate and group must not be empty"
            )));
        }
        seeds.push(VehicleSeed {
            plate: plate.trim().to_string(),
            class: class.parse()?,
            transport_group: group.trim().to_string(),
        });
    }
    Ok(seeds)
}

pub fn resolve_fee_table(path: Option<&Path>) -> TicketResult<FeeTable> {
    match path {
        Some(path) => load_fee_table(path),
        None => Ok(FeeTable::default()),
    }
}
