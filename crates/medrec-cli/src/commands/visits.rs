use anyhow::{Context, Result};
use medrec_core::{Encounter, Patient, now_utc};
use medrec_services::MedrecSystem;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::{AssignVisitArgs, OutputFormat, ResolveVisitTypeArgs};
use crate::output::{print_encounter, print_json, print_visit_type};

pub async fn resolve_visit_type(
    system: &MedrecSystem,
    args: &ResolveVisitTypeArgs,
    format: OutputFormat,
) -> Result<()> {
    let encounter_type = system.find_encounter_type(&args.encounter_type).await?;
    let visit_type = system.mapping_cache.get(&encounter_type).await?;

    match format {
        OutputFormat::Json => print_json(&visit_type),
        OutputFormat::Table => {
            print_visit_type(&visit_type);
            Ok(())
        }
    }
}

pub async fn assign_visit(
    system: &MedrecSystem,
    args: &AssignVisitArgs,
    format: OutputFormat,
) -> Result<()> {
    let encounter_type = system.find_encounter_type(&args.encounter_type).await?;
    let at = match &args.at {
        Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
            .with_context(|| format!("invalid --at datetime: {raw}"))?,
        None => now_utc(),
    };

    let mut encounter = Encounter::new(Patient::new(args.patient), encounter_type, at);
    if let Some(location_id) = args.location {
        let location = system
            .location(location_id)
            .with_context(|| format!("unknown location: {location_id}"))?;
        encounter = encounter.with_location(location);
    }

    let encounter = match &args.user {
        Some(username) => {
            let ctx = system.context_for(username)?;
            system.encounters.save_encounter(&ctx, encounter).await?
        }
        None => {
            let handler = system.handlers.active().await?;
            tracing::debug!(handler = handler.name(), "Running visit assignment handler");
            handler.before_create_encounter(&mut encounter).await?;
            encounter
        }
    };

    match format {
        OutputFormat::Json => print_json(&encounter),
        OutputFormat::Table => {
            print_encounter(&encounter);
            Ok(())
        }
    }
}
