use chrono::NaiveDate;
use terminal_tickets::daypass::{DayPassLedger, MemoryDayPassStore};
use terminal_tickets::fees::{
    load_fee_table, FeeResolver, FeeTable, TripType, VehicleClass, INTERMUNICIPAL, INTRAMUNICIPAL,
};
use terminal_tickets::reconcile::{reconcile, Diagnostic};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

fn resolver(table: FeeTable) -> FeeResolver<MemoryDayPassStore> {
    FeeResolver::new(table, DayPassLedger::new(MemoryDayPassStore::default()))
}

#[test]
fn built_in_table_matches_ordinance() {
    let table = FeeTable::default();
    let expected = [
        (VehicleClass::Bus, 60),
        (VehicleClass::ShuttleVan, 30),
        (VehicleClass::Jeep, 15),
        (VehicleClass::Multicab, 10),
        (VehicleClass::Filcab, 10),
        (VehicleClass::Tricycle, 10),
    ];
    for (class, fee) in expected {
        assert_eq!(table.fee_for(class).expect("configured"), fee, "{class}");
    }
    assert_eq!(
        table.transport_groups(VehicleClass::Bus),
        ["RORO".to_string(), "CHERRY".to_string()]
    );
    assert_eq!(table.transport_groups(VehicleClass::ShuttleVan).len(), 8);
}

#[test]
fn departures_pay_and_arrivals_do_not() {
    let mut resolver = resolver(FeeTable::default());
    let departure = resolver
        .resolve(VehicleClass::Bus, TripType::Departure, Some("AAA111"), today())
        .expect("departure fee");
    assert_eq!(departure.fee, 60);
    assert!(!departure.is_exempt());

    let arrival = resolver
        .resolve(VehicleClass::Bus, TripType::Arrival, Some("AAA111"), today())
        .expect("arrival fee");
    assert_eq!(arrival.fee, 0);
}

#[test]
fn tricycle_day_pass_waives_the_fee() {
    let mut resolver = resolver(FeeTable::default());
    let paid_at = today().and_hms_opt(7, 30, 0).expect("valid time");
    resolver
        .day_passes_mut()
        .mark_paid("trc-01", "TF-2026-1234", paid_at)
        .expect("mark paid");

    let quote = resolver
        .resolve(VehicleClass::Tricycle, TripType::Departure, Some("TRC-01"), today())
        .expect("quote");
    assert_eq!(quote.fee, 0);
    assert_eq!(
        quote.day_pass.as_ref().map(|pass| pass.receipt.as_str()),
        Some("TF-2026-1234")
    );
    assert_eq!(
        reconcile(quote.fee, None, None).diagnostic,
        Diagnostic::NothingDue
    );

    let tomorrow = today().succ_opt().expect("next day");
    let quote = resolver
        .resolve(VehicleClass::Tricycle, TripType::Departure, Some("TRC-01"), tomorrow)
        .expect("quote");
    assert_eq!(quote.fee, 10);
}

#[test]
fn day_pass_applies_to_tricycles_only() {
    let mut resolver = resolver(FeeTable::default());
    let paid_at = today().and_hms_opt(7, 30, 0).expect("valid time");
    resolver
        .day_passes_mut()
        .mark_paid("JEEP-9", "R-9", paid_at)
        .expect("mark paid");
    let quote = resolver
        .resolve(VehicleClass::Jeep, TripType::Departure, Some("JEEP-9"), today())
        .expect("quote");
    assert_eq!(quote.fee, 15);
}

#[test]
fn vehicle_class_parses_registry_spellings() {
    assert_eq!("BUS".parse::<VehicleClass>().expect("bus"), VehicleClass::Bus);
    assert_eq!(
        "shuttle-van".parse::<VehicleClass>().expect("van"),
        VehicleClass::ShuttleVan
    );
    assert_eq!(
        "Shuttle Van".parse::<VehicleClass>().expect("van"),
        VehicleClass::ShuttleVan
    );
    let err = "ferry".parse::<VehicleClass>().expect_err("unknown class");
    assert!(err.to_string().contains("vehicle class"), "unexpected error: {err}");
}

#[test]
fn locations_depend_on_class() {
    assert_eq!(VehicleClass::Tricycle.locations(), INTRAMUNICIPAL);
    assert_eq!(VehicleClass::Bus.locations(), INTERMUNICIPAL);
}

#[test]
fn loads_fee_table_overrides_from_yaml() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("fees.yaml");
    std::fs::write(
        &file,
        r#"
ordinance: test ordinance
fees:
  BUS: 70
  SHUTTLE VAN: 35
  TRICYCLE: 12
transport_groups:
  BUS: [RORO]
"#,
    )
    .expect("write fee table");

    let table = load_fee_table(&file).expect("fee table should load");
    assert_eq!(table.ordinance.as_deref(), Some("test ordinance"));
    assert_eq!(table.fee_for(VehicleClass::ShuttleVan).expect("van"), 35);
    assert_eq!(table.transport_groups(VehicleClass::Bus), ["RORO".to_string()]);
    assert!(table.transport_groups(VehicleClass::Jeep).is_empty());

    let err = table
        .fee_for(VehicleClass::Jeep)
        .expect_err("unconfigured class must fail");
    assert!(err.to_string().contains("JEEP"), "unexpected error: {err}");

    // Misconfigured fees load; reconciliation is what flags them.
    let fee = table.fee_for(VehicleClass::Tricycle).expect("tricycle");
    assert_eq!(
        reconcile(fee, None, None).diagnostic,
        Diagnostic::FeeNotMultipleOf5 { fee: 12 }
    );
}

#[test]
fn malformed_fee_table_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("fees.yaml");
    std::fs::write(&file, "fees:\n  HOVERCRAFT: 5\n").expect("write fee table");
    let err = load_fee_table(&file).expect_err("unknown class must fail");
    assert!(
        err.to_string().contains("invalid fee table"),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_fee_table_is_an_io_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = load_fee_table(temp.path().join("absent.yaml")).expect_err("missing file");
    assert!(err.to_string().contains("io error"), "unexpected error: {err}");
}

#[test]
fn transport_group_must_belong_to_the_class() {
    let table = FeeTable::default();
    assert_eq!(
        table
            .check_transport_group(VehicleClass::Bus, " roro ")
            .expect("bus group"),
        "RORO"
    );
    assert_eq!(
        table
            .check_transport_group(VehicleClass::ShuttleVan, "rio tuba exp.")
            .expect("van group"),
        "RIO TUBA EXP."
    );

    let err = table
        .check_transport_group(VehicleClass::Bus, "TODA")
        .expect_err("tricycle group on a bus must fail");
    assert!(err.to_string().contains("RORO, CHERRY"), "unexpected error: {err}");
    table
        .check_transport_group(VehicleClass::Tricycle, "  ")
        .expect_err("empty group must fail");
}

#[test]
fn class_without_configured_groups_accepts_any_group() {
    let mut table = FeeTable::default();
    table.transport_groups.remove(&VehicleClass::Jeep);
    assert_eq!(
        table
            .check_transport_group(VehicleClass::Jeep, "bayan line")
            .expect("free-form group"),
        "BAYAN LINE"
    );
}
