//! Northwind CLI
//!
//! Create, read, update and delete `TestClass` records kept in a JSON data
//! file, through a Northwind group with transactions and document state on.
//!
//! # Commands
//!
//! - `create` - Insert a record
//! - `read` - List records matching an id and/or name
//! - `update` - Rename the record with an id
//! - `delete` - Delete the record with an id
//! - `groups` - Show the registered group

mod commands;
mod data_file;
mod error;
mod model;

use clap::{Parser, Subcommand};
use commands::Format;
use error::CliResult;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Northwind command-line CRUD tool.
#[derive(Parser)]
#[command(name = "northwind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON data file
    #[arg(global = true, short, long, default_value = "northwind.json")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Encrypt text fields with a key derived from this password
    #[arg(global = true, long)]
    password: Option<String>,

    /// Enforce unique names
    #[arg(global = true, long)]
    unique_names: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value = "text")]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a record
    Create {
        /// Record id
        #[arg(long)]
        id: i64,

        /// Record name
        #[arg(long)]
        name: String,
    },

    /// List records matching every given condition
    Read {
        /// Match this id
        #[arg(long)]
        id: Option<i64>,

        /// Match this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Rename the record with an id
    Update {
        /// Record id
        #[arg(long)]
        id: i64,

        /// New name
        #[arg(long)]
        name: String,
    },

    /// Delete the record with an id
    Delete {
        /// Record id
        #[arg(long)]
        id: i64,
    },

    /// Show the registered group
    Groups,
}

fn run(cli: Cli) -> CliResult<()> {
    let store = Arc::new(data_file::load(&cli.path, model::GROUP_NAME)?);
    let service = model::open_service(
        Arc::clone(&store),
        cli.password.as_deref(),
        cli.unique_names,
    )?;

    let result = match cli.command {
        Commands::Create { id, name } => commands::create::run(&service, id, name)?,
        Commands::Update { id, name } => commands::update::run(&service, id, name)?,
        Commands::Delete { id } => commands::delete::run(&service, id)?,
        Commands::Read { id, name } => {
            let records = commands::read::run(&service, id, name)?;
            print_records(&records, cli.format)?;
            return Ok(());
        }
        Commands::Groups => return commands::groups::run(&service, cli.format),
    };

    commands::print_result(&result, cli.format)?;
    if result.is_success() {
        data_file::save(&cli.path, &store)?;
    }
    Ok(())
}

fn print_records(records: &[model::TestClass], format: Format) -> CliResult<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(records)?),
        Format::Text => {
            if records.is_empty() {
                println!("no records");
            }
            for r in records {
                println!("Id={} Name={}", r.id, r.name);
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use northwind_core::StatusCode;
    use northwind_store::InMemoryStore;
    use tempfile::tempdir;

    fn open(
        path: &std::path::Path,
        password: Option<&str>,
    ) -> (Arc<InMemoryStore>, northwind_core::Service<model::TestClass>) {
        let store = Arc::new(data_file::load(path, model::GROUP_NAME).unwrap());
        let service = model::open_service(Arc::clone(&store), password, true).unwrap();
        (store, service)
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "northwind", "create", "--id", "1", "--name", "x", "-p", "db.json", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.path, PathBuf::from("db.json"));
        assert_eq!(cli.format, Format::Json);
        assert!(matches!(cli.command, Commands::Create { id: 1, .. }));
    }

    #[test]
    fn records_survive_across_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let (store, service) = open(&path, None);
        let created = commands::create::run(&service, 1, "x".into()).unwrap();
        assert_eq!(created.status_code, StatusCode::CreationSuccess);
        data_file::save(&path, &store).unwrap();

        let (store, service) = open(&path, None);
        let renamed = commands::update::run(&service, 1, "y".into()).unwrap();
        assert_eq!(renamed.new_data.map(|t| t.name), Some("y".to_string()));
        data_file::save(&path, &store).unwrap();

        let (_, service) = open(&path, None);
        let found = commands::read::run(&service, None, Some("y".into())).unwrap();
        assert_eq!(found, vec![model::TestClass { id: 1, name: "y".into() }]);

        let missing = commands::delete::run(&service, 99).unwrap();
        assert_eq!(missing.status_code, StatusCode::NotFound);
    }

    #[test]
    fn unique_names_are_enforced() {
        let dir = tempdir().unwrap();
        let (_, service) = open(&dir.path().join("data.json"), None);
        commands::create::run(&service, 1, "x".into()).unwrap();
        let clash = commands::create::run(&service, 2, "x".into()).unwrap();
        assert_eq!(clash.status_code, StatusCode::UniqueIndexViolation);
    }

    #[test]
    fn password_encrypts_names_at_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let (store, service) = open(&path, Some("hunter2"));
        commands::create::run(&service, 1, "secret".into()).unwrap();
        data_file::save(&path, &store).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret"));

        let (_, service) = open(&path, Some("hunter2"));
        let found = commands::read::run(&service, None, Some("secret".into())).unwrap();
        assert_eq!(found, vec![model::TestClass { id: 1, name: "secret".into() }]);

        let clash = commands::create::run(&service, 2, "secret".into()).unwrap();
        assert_eq!(clash.status_code, StatusCode::UniqueIndexViolation);

        let (_, wrong) = open(&path, Some("other"));
        assert!(commands::read::run(&wrong, Some(1), None).unwrap().is_empty());
    }

    #[test]
    fn groups_lists_index() {
        let dir = tempdir().unwrap();
        let (_, service) = open(&dir.path().join("data.json"), None);
        let groups = commands::groups::collect(&service).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "TestClass");
        assert_eq!(groups[0].indexes, vec!["Name_1".to_string()]);
        assert!(!groups[0].encrypted);
    }
}
