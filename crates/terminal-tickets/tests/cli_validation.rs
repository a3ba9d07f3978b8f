use clap::Parser;
use terminal_tickets::cli::{
    parse_serial_arg, parse_vehicle_seeds, validate_operator, Args, Command, VehicleSeed,
};
use terminal_tickets::fees::{TripType, VehicleClass};

#[test]
fn rejects_invalid_operator_names() {
    for operator in ["", "   ", "bad/name", "two words"] {
        let err = validate_operator(operator).expect_err("invalid operator must fail");
        assert!(err.to_string().contains("operator"), "unexpected error: {err}");
    }
    validate_operator("clerk_01.day-shift").expect("valid operator");
}

#[test]
fn reconcile_accepts_negative_fee_and_serial_text() {
    let args = Args::try_parse_from([
        "terminal-tickets",
        "reconcile",
        "--fee",
        "-5",
        "--start10",
        "000500",
    ])
    .expect("args parse");
    match args.command {
        Command::Reconcile {
            fee,
            start10,
            start5,
        } => {
            assert_eq!(fee, -5);
            assert_eq!(start10.as_deref(), Some("000500"));
            assert!(start5.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn fee_command_parses_class_and_trip() {
    let args = Args::try_parse_from([
        "terminal-tickets",
        "--json",
        "fee",
        "--class",
        "shuttle-van",
        "--trip",
        "arrival",
    ])
    .expect("args parse");
    assert!(args.json);
    match args.command {
        Command::Fee { class, trip, .. } => {
            assert_eq!(class, VehicleClass::ShuttleVan);
            assert_eq!(trip, TripType::Arrival);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn day_pass_receipt_requires_plate() {
    let err = Args::try_parse_from([
        "terminal-tickets",
        "fee",
        "--class",
        "tricycle",
        "--day-pass-receipt",
        "R-1",
    ])
    .expect_err("receipt without plate must fail");
    assert!(err.to_string().contains("--plate"), "unexpected error: {err}");
}

#[test]
fn serial_args_reuse_serial_parsing() {
    assert!(parse_serial_arg(None).expect("absent").is_none());
    assert!(parse_serial_arg(Some("0")).expect("zero").is_none());
    parse_serial_arg(Some("12x")).expect_err("non-digit must fail");
}

#[test]
fn submit_class_is_optional_and_vehicles_repeat() {
    let args = Args::try_parse_from([
        "terminal-tickets",
        "submit",
        "--trip",
        "departure",
        "--plate",
        "TRK-77",
        "--destination",
        "TUBTUB",
        "--vehicle",
        "TRK-77=tricycle:TODA",
        "--vehicle",
        "BUS-9=bus:RORO",
        "--day-pass-receipt",
        "TF-2026-0042",
    ])
    .expect("args parse");
    match args.command {
        Command::Submit(submit) => {
            assert!(submit.class.is_none());
            assert!(submit.transport_group.is_none());
            assert_eq!(submit.vehicles.len(), 2);
            assert_eq!(submit.day_pass_receipt.as_deref(), Some("TF-2026-0042"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn vehicle_seeds_parse_plate_class_and_group() {
    let seeds = parse_vehicle_seeds(&[
        " TRK-77 = tricycle:TODA".to_string(),
        "VAN-1=shuttle-van:RIO TUBA EXP.".to_string(),
    ])
    .expect("seeds");
    assert_eq!(
        seeds,
        vec![
            VehicleSeed {
                plate: "TRK-77".to_string(),
                class: VehicleClass::Tricycle,
                transport_group: "TODA".to_string(),
            },
            VehicleSeed {
                plate: "VAN-1".to_string(),
                class: VehicleClass::ShuttleVan,
                transport_group: "RIO TUBA EXP.".to_string(),
            },
        ]
    );
}

#[test]
fn malformed_vehicle_seeds_are_rejected() {
    for entry in ["TRK-77", "TRK-77=tricycle", "=tricycle:TODA", "TRK-77=tricycle: ", "X=boat:Y"] {
        let err = parse_vehicle_seeds(&[entry.to_string()]).expect_err("malformed seed must fail");
        let message = err.to_string();
        assert!(
            message.contains("vehicle"),
            "unexpected error for {entry}: {message}"
        );
    }
}
