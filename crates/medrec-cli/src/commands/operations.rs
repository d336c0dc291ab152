use anyhow::Result;
use medrec_services::MedrecSystem;

use crate::cli::OutputFormat;
use crate::output::{print_json, print_operations_table};

pub fn list(system: &MedrecSystem, format: OutputFormat) -> Result<()> {
    let operations = system.operations();
    match format {
        OutputFormat::Json => print_json(&operations),
        OutputFormat::Table => {
            print_operations_table(&operations);
            Ok(())
        }
    }
}
