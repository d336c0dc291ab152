use anyhow::Result;
use colored::Colorize;
use medrec_auth::Invocation;
use medrec_services::MedrecSystem;
use serde_json::json;

use crate::cli::{CheckArgs, OutputFormat};
use crate::output::{print_denied, print_json, print_success};

/// Username that selects an unauthenticated context.
pub const ANONYMOUS_USER: &str = "anonymous";

pub fn check(system: &MedrecSystem, args: &CheckArgs, format: OutputFormat) -> Result<()> {
    let ctx = if args.user == ANONYMOUS_USER {
        system.anonymous_context()
    } else {
        system.context_for(&args.user)?
    };

    if !system.registry.contains(&args.operation) {
        tracing::warn!(operation = %args.operation, "Operation is not registered; it is unrestricted");
    }

    let result = system
        .gate
        .before(&ctx, &Invocation::new("medrec-cli", &args.operation));

    match format {
        OutputFormat::Json => print_json(&json!({
            "user": args.user,
            "operation": args.operation,
            "allowed": result.is_ok(),
            "reason": result.as_ref().err().map(|e| e.to_string()),
        })),
        OutputFormat::Table => {
            match result {
                Ok(()) => print_success(&format!(
                    "{} may call {}",
                    args.user.cyan(),
                    args.operation.cyan()
                )),
                Err(err) => print_denied(&format!(
                    "{} may not call {}: {}",
                    args.user.cyan(),
                    args.operation.cyan(),
                    err
                )),
            }
            Ok(())
        }
    }
}
