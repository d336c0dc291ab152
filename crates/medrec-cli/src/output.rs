use colored::Colorize;
use medrec_auth::OperationDescriptor;
use medrec_core::{Encounter, Visit, VisitType};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use time::format_description::well_known::Rfc3339;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_denied(msg: &str) {
    println!("{} {}", "✗".red(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_operations_table(operations: &[OperationDescriptor]) {
    if operations.is_empty() {
        println!("No operations registered.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Operation", "Module", "Mode", "Privileges"]);
    for op in operations {
        let mode = match (op.privileges.is_empty(), op.require_all) {
            (true, _) if op.authorized => "authenticated",
            (true, _) => "open",
            (false, true) => "all of",
            (false, false) => "any of",
        };
        let privileges = op.privileges.join(", ");
        builder.push_record([op.id.as_str(), op.module.as_str(), mode, privileges.as_str()]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

pub fn print_visit_type(visit_type: &VisitType) {
    println!("{}: {}", "Visit type".cyan(), visit_type.name);
    println!("{}: {}", "Id".cyan(), visit_type.visit_type_id);
    println!("{}: {}", "Uuid".cyan(), visit_type.uuid);
}

pub fn print_encounter(encounter: &Encounter) {
    if let Some(id) = encounter.encounter_id {
        println!("{}: {}", "Encounter".cyan(), id);
    }
    println!(
        "{}: {} ({})",
        "Encounter type".cyan(),
        encounter.encounter_type.name,
        encounter.encounter_type.encounter_type_id
    );
    match &encounter.visit {
        Some(visit) => print_visit(visit),
        None => println!("{}: {}", "Visit".cyan(), "none".yellow()),
    }
}

fn print_visit(visit: &Visit) {
    let status = if visit.is_persisted() { "existing" } else { "new" };
    println!(
        "{}: {} [{}]",
        "Visit".cyan(),
        visit.visit_id.map_or_else(|| visit.uuid.clone(), |id| id.to_string()),
        status
    );
    println!("{}: {}", "Visit type".cyan(), visit.visit_type.name);
    println!("{}: {}", "Start".cyan(), format_datetime(visit.start_datetime));
    println!(
        "{}: {}",
        "Stop".cyan(),
        visit
            .stop_datetime
            .map_or_else(|| "open".to_string(), format_datetime)
    );
    if let Some(location) = &visit.location {
        println!("{}: {}", "Location".cyan(), location.name);
    }
}

fn format_datetime(value: time::OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}
