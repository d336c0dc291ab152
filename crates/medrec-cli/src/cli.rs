use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "medrec")]
#[command(about = "Medrec CLI: inspect authorization rules and visit assignment")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to ./medrec.toml when present)
    #[arg(short, long, global = true, env = "MEDREC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List guarded operations and the privileges they require
    Operations,
    /// Check whether a user may call an operation
    Check(CheckArgs),
    /// Resolve the visit type mapped to an encounter type
    ResolveVisitType(ResolveVisitTypeArgs),
    /// Run visit assignment for a new encounter
    AssignVisit(AssignVisitArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Username, or "anonymous"
    pub user: String,
    /// Operation ID (e.g. encounter.create)
    pub operation: String,
}

#[derive(Args)]
pub struct ResolveVisitTypeArgs {
    /// Encounter type id, uuid or name
    pub encounter_type: String,
}

#[derive(Args)]
pub struct AssignVisitArgs {
    /// Patient id
    #[arg(long)]
    pub patient: i32,

    /// Location id
    #[arg(long)]
    pub location: Option<i32>,

    /// Encounter type id, uuid or name
    #[arg(long)]
    pub encounter_type: String,

    /// Encounter datetime (RFC 3339), defaults to now
    #[arg(long)]
    pub at: Option<String>,

    /// Save the encounter as this user instead of only running the handler
    #[arg(long = "as")]
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_assign_visit() {
        let cli = Cli::try_parse_from([
            "medrec",
            "--format",
            "json",
            "assign-visit",
            "--patient",
            "7",
            "--encounter-type",
            "Admission",
            "--as",
            "nurse",
        ])
        .unwrap();

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Commands::AssignVisit(args) => {
                assert_eq!(args.patient, 7);
                assert_eq!(args.encounter_type, "Admission");
                assert_eq!(args.user.as_deref(), Some("nurse"));
                assert!(args.location.is_none());
            }
            _ => panic!("expected assign-visit"),
        }
    }

    #[test]
    fn test_check_requires_operation() {
        assert!(Cli::try_parse_from(["medrec", "check", "nurse"]).is_err());
    }
}
