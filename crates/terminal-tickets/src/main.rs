use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use terminal_tickets::cli::{
    parse_serial_arg, parse_vehicle_seeds, resolve_fee_table, validate_operator, Args, Command,
    SubmitArgs,
};
use terminal_tickets::daypass::{DayPassLedger, MemoryDayPassStore};
use terminal_tickets::desk::{SubmissionRequest, TerminalDesk};
use terminal_tickets::error::TicketResult;
use terminal_tickets::fees::{FeeResolver, FeeTable};
use terminal_tickets::hints::{denomination_hint, quantity_line};
use terminal_tickets::reconcile::{reconcile, Reconciliation};
use terminal_tickets::registry::{MemoryVehicleRegistry, VehicleRegistry};

fn main() -> TicketResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let table = resolve_fee_table(args.fee_table.as_deref())?;

    match args.command {
        Command::Reconcile {
            fee,
            start10,
            start5,
        } => {
            let start10 = parse_serial_arg(start10.as_deref())?;
            let start5 = parse_serial_arg(start5.as_deref())?;
            let result = reconcile(fee, start10.as_ref(), start5.as_ref());
            print_reconciliation(&result, args.json)?;
        }
        Command::Fee {
            class,
            trip,
            plate,
            day_pass_receipt,
        } => {
            let now = Local::now().naive_local();
            let mut resolver = FeeResolver::new(table, DayPassLedger::new(MemoryDayPassStore::default()));
            if let (Some(plate), Some(receipt)) = (plate.as_deref(), day_pass_receipt.as_deref()) {
                resolver.day_passes_mut().mark_paid(plate, receipt, now)?;
            }
            let quote = resolver.resolve(class, trip, plate.as_deref(), now.date())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("class={}", quote.class);
                println!("trip={}", quote.trip.as_str());
                println!("fee={}", quote.fee);
                if let Some(pass) = &quote.day_pass {
                    println!("day_pass_receipt={} ({})", pass.receipt, pass.time_label());
                }
                if let Ok(fee) = u64::try_from(quote.fee) {
                    if fee > 0 {
                        println!("hint={}", denomination_hint(fee));
                    }
                }
            }
        }
        Command::Hint { fee } => println!("{}", denomination_hint(fee)),
        Command::Submit(submit) => {
            validate_operator(&args.operator)?;
            let query = prepare_submission(submit, &table, &args.operator)?;
            println!("{query}");
        }
        Command::Doctor => {
            println!("terminal-tickets doctor");
            println!(
                "fee_table={}",
                args.fee_table
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string())
            );
            println!("operator={}", args.operator);
            println!(
                "ordinance={}",
                table.ordinance.as_deref().unwrap_or("none")
            );
            for (class, fee) in &table.fees {
                println!(
                    "fee.{class}={fee} groups={}",
                    table.transport_groups(*class).join(",")
                );
            }
        }
    }

    Ok(())
}

fn print_reconciliation(result: &Reconciliation, json: bool) -> TicketResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!("valid={}", result.valid);
    println!("code={}", result.diagnostic.code());
    for record in &result.records {
        println!("{}: {}", record.denomination.label(), quantity_line(record));
    }
    if let Some(record) = result.record_string() {
        println!("record={record}");
    }
    println!("hint={}", result.hint());
    Ok(())
}

fn prepare_submission(submit: SubmitArgs, table: &FeeTable, operator: &str) -> TicketResult<String> {
    let now = Local::now();
    let local = now.naive_local();

    let mut registry = VehicleRegistry::new(MemoryVehicleRegistry::default());
    for seed in parse_vehicle_seeds(&submit.vehicles)? {
        let group = table.check_transport_group(seed.class, &seed.transport_group)?;
        registry.register(&seed.plate, seed.class, &group, operator, local)?;
    }
    let mut fees = FeeResolver::new(table.clone(), DayPassLedger::new(MemoryDayPassStore::default()));
    if let Some(receipt) = submit.day_pass_receipt.as_deref() {
        fees.day_passes_mut().mark_paid(&submit.plate, receipt, local)?;
    }
    let mut desk = TerminalDesk::new(fees, registry);

    let request = SubmissionRequest {
        trip_date: submit.date.unwrap_or(local.date()),
        trip_time: submit.time.unwrap_or(local.time()),
        trip: submit.trip,
        plate: submit.plate,
        class: submit.class,
        transport_group: submit.transport_group,
        origin: submit.origin,
        destination: submit.destination,
        passengers: submit.passengers.into(),
        username: operator.to_string(),
        start10: parse_serial_arg(submit.start10.as_deref())?,
        start5: parse_serial_arg(submit.start5.as_deref())?,
        payment_method: submit.payment_method,
        payment_status: submit.payment_status,
        receipt: submit.receipt,
        notes: submit.notes,
        allow_invalid_tickets: submit.allow_invalid_tickets,
    };
    let prepared = desk.prepare(request, now)?;
    if let Some(pass) = prepared.day_pass() {
        info!(receipt = %pass.receipt, "submission earns a tricycle day pass");
    }
    Ok(prepared.to_query())
}
