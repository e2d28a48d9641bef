//! Command-line front end for staffing records.
//!
//! # Responsibility
//! - Map `<entity> <action>` commands onto the core services.
//! - Print results as pretty JSON on stdout and failures as JSON error
//!   descriptors on stderr.
//!
//! # Invariants
//! - Exit code 0 on success, 1 for operation failures, 2 for startup
//!   failures (logging configuration).

use clap::{Parser, Subcommand};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use staffing_core::db::{open_db, DbError};
use staffing_core::{
    default_log_level, init_logging, EntityKind, ErrorDescriptor, ErrorKind, LogLevel,
    LoggingError, RepoError, ServiceError, SqliteStaffing,
};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "staffing")]
#[command(version)]
#[command(about = "Manage areas, managers, departments and employees")]
#[command(long_about = r#"
Staffing keeps areas, managers, departments and employees in one SQLite file.
Departments reference an area and a manager; employees reference departments.

Example usage:
  staffing area create --json '{"name":"Finance","building":"B1"}'
  staffing department list
  staffing employee update <id> --json '{"name":"New Name"}'
"#)]
struct Cli {
    /// Path to the database file
    #[arg(long, global = true, env = "STAFFING_DB", default_value = "staffing.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when absent
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    entity: EntityCommand,
}

#[derive(Subcommand)]
enum EntityCommand {
    /// Areas: name and building
    Area {
        #[command(subcommand)]
        action: Action,
    },
    /// Managers: name, education and shift
    Manager {
        #[command(subcommand)]
        action: Action,
    },
    /// Departments: name, area and manager
    Department {
        #[command(subcommand)]
        action: Action,
    },
    /// Employees: name, surname, age, gender and departments
    Employee {
        #[command(subcommand)]
        action: Action,
    },
}

#[derive(Subcommand)]
enum Action {
    /// Create a record from a JSON object of fields
    Create {
        #[arg(long)]
        json: String,
    },
    /// Show one record
    Get { id: String },
    /// Show every record in creation order
    List,
    /// Merge a JSON object of fields over an existing record
    Update {
        id: String,
        #[arg(long)]
        json: String,
    },
    /// Delete a record; references to it are left dangling
    Delete { id: String },
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Open(DbError),
    Wiring(RepoError),
    Payload(serde_json::Error),
    Service(ServiceError),
    Output(serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Logging(_) => 2,
            _ => 1,
        }
    }

    fn descriptor(&self) -> ErrorDescriptor {
        match self {
            Self::Service(err) => err.descriptor(),
            Self::Payload(_) => ErrorDescriptor {
                kind: ErrorKind::ValidationError,
                message: self.to_string(),
            },
            _ => ErrorDescriptor {
                kind: ErrorKind::StorageUnavailable,
                message: self.to_string(),
            },
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Open(err) => write!(f, "cannot open database: {err}"),
            Self::Wiring(err) => write!(f, "database is not usable: {err}"),
            Self::Payload(err) => write!(f, "payload is not a valid JSON object: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "cannot render result: {err}"),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err @ CliError::Logging(_)) => {
            eprintln!("staffing: {err}");
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            let descriptor = err.descriptor();
            match serde_json::to_string_pretty(&descriptor) {
                Ok(text) => eprintln!("{text}"),
                Err(_) => eprintln!("staffing: {err}"),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.unwrap_or_else(default_log_level);
        init_logging(level, log_dir).map_err(CliError::Logging)?;
    }

    let conn = open_db(&cli.db).map_err(CliError::Open)?;
    let staffing = SqliteStaffing::try_new(&conn).map_err(CliError::Wiring)?;

    let value = match cli.entity {
        EntityCommand::Area { action } => run_area(&staffing, action)?,
        EntityCommand::Manager { action } => run_manager(&staffing, action)?,
        EntityCommand::Department { action } => run_department(&staffing, action)?,
        EntityCommand::Employee { action } => run_employee(&staffing, action)?,
    };
    serde_json::to_string_pretty(&value).map_err(CliError::Output)
}

fn run_area(staffing: &SqliteStaffing<'_>, action: Action) -> Result<Value, CliError> {
    let service = &staffing.areas;
    match action {
        Action::Create { json } => render(service.create_area(parse_fields(&json)?)?),
        Action::Get { id } => render(service.get_area(&id)?),
        Action::List => render(service.list_areas()?),
        Action::Update { id, json } => render(service.update_area(&id, parse_fields(&json)?)?),
        Action::Delete { id } => {
            service.delete_area(&id)?;
            Ok(deleted(EntityKind::Area))
        }
    }
}

fn run_manager(staffing: &SqliteStaffing<'_>, action: Action) -> Result<Value, CliError> {
    let service = &staffing.managers;
    match action {
        Action::Create { json } => render(service.create_manager(parse_fields(&json)?)?),
        Action::Get { id } => render(service.get_manager(&id)?),
        Action::List => render(service.list_managers()?),
        Action::Update { id, json } => {
            render(service.update_manager(&id, parse_fields(&json)?)?)
        }
        Action::Delete { id } => {
            service.delete_manager(&id)?;
            Ok(deleted(EntityKind::Manager))
        }
    }
}

fn run_department(staffing: &SqliteStaffing<'_>, action: Action) -> Result<Value, CliError> {
    let service = &staffing.departments;
    match action {
        Action::Create { json } => render(service.create_department(parse_fields(&json)?)?),
        Action::Get { id } => render(service.get_department(&id)?),
        Action::List => render(service.list_departments()?),
        Action::Update { id, json } => {
            render(service.update_department(&id, parse_fields(&json)?)?)
        }
        Action::Delete { id } => {
            service.delete_department(&id)?;
            Ok(deleted(EntityKind::Department))
        }
    }
}

fn run_employee(staffing: &SqliteStaffing<'_>, action: Action) -> Result<Value, CliError> {
    let service = &staffing.employees;
    match action {
        Action::Create { json } => render(service.create_employee(parse_fields(&json)?)?),
        Action::Get { id } => render(service.get_employee(&id)?),
        Action::List => render(service.list_employees()?),
        Action::Update { id, json } => {
            render(service.update_employee(&id, parse_fields(&json)?)?)
        }
        Action::Delete { id } => {
            service.delete_employee(&id)?;
            Ok(deleted(EntityKind::Employee))
        }
    }
}

/// Payloads must be JSON objects; arrays and scalars are rejected before
/// they reach the typed field structs.
fn parse_fields<T: DeserializeOwned>(json: &str) -> Result<T, CliError> {
    let object: Map<String, Value> = serde_json::from_str(json).map_err(CliError::Payload)?;
    serde_json::from_value(Value::Object(object)).map_err(CliError::Payload)
}

fn render<T: Serialize>(value: T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(CliError::Output)
}

fn deleted(entity: EntityKind) -> Value {
    info!("event=cli_delete module=cli status=ok entity={entity}");
    json!({ "message": format!("{entity} deleted") })
}
