//! Desk operator CLI.
//!
//! # Responsibility
//! - Drive the registration core from a terminal: login, register, look up,
//!   export.
//! - Own prompts, credentials entry, backup writes and file locations.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, FuzzySelect, Input, Password};
use log::info;
use onspot_core::{
    append_backup, default_log_level, init_logging, qr_payload, render_qr_svg,
    render_qr_terminal, write_export, DeskSession, ExportError, FormField, KioskConfig,
    OptionKind, Participant, ParticipantStore, ParticipantUid, RegistrationForm,
    RegistrationOutcome, RegistrationPayload, RegistrationService, ServiceError,
};
use std::path::{Path, PathBuf};

const DB_PATH_ENV: &str = "ONSPOT_DB_PATH";

/// On-spot event registration desk
#[derive(Parser)]
#[command(name = "onspot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; built-in defaults apply when omitted
    #[arg(short, long, global = true, env = "ONSPOT_CONFIG")]
    config: Option<PathBuf>,

    /// Desk login email
    #[arg(long, global = true)]
    operator: Option<String>,

    /// Desk login password; prompted when omitted
    #[arg(long, global = true, env = "ONSPOT_DESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core linkage info
    Ping,
    /// Create or upgrade the participant database
    Init,
    #[command(flatten)]
    Desk(DeskCommand),
}

/// Commands that require a desk login.
#[derive(Subcommand)]
enum DeskCommand {
    /// Register one participant and print the QR code
    Register(RegisterArgs),
    /// List every participant, most recent first
    List,
    /// Find participants whose fields contain the text
    Search {
        /// Case-insensitive text to look for
        query: String,
    },
    /// Write all participants to a CSV file
    Export {
        /// Output file
        path: PathBuf,
    },
    /// Print the QR code of a stored participant
    Qr {
        /// Registration uid
        uid: String,
        /// Also save the QR code as SVG
        #[arg(long, value_name = "FILE")]
        qr_out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    college: Option<String>,
    #[arg(long)]
    dept: Option<String>,
    /// Degree programme
    #[arg(long)]
    year: Option<String>,
    /// Re-issue the QR code without asking when the contact is already registered
    #[arg(short, long)]
    yes: bool,
    /// Store a new row even when the contact is already registered
    #[arg(long)]
    store_duplicate: bool,
    /// Also save the QR code as SVG
    #[arg(long, value_name = "FILE")]
    qr_out: Option<PathBuf>,
}

/// What the operator chose after a contact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchChoice {
    /// Show the QR code for the submitted details; store nothing.
    Reissue,
    /// Store the submission as a new participant.
    Store,
    Cancel,
}

#[derive(Debug)]
enum Submission {
    Stored {
        participant: Participant,
        backup: Result<(), ExportError>,
    },
    Reissued {
        existing_uid: ParticipantUid,
        payload: RegistrationPayload,
    },
    Cancelled,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    start_logging(&config)?;

    match cli.command {
        Commands::Ping => {
            println!("onspot_core ping={}", onspot_core::ping());
            println!("onspot_core version={}", onspot_core::core_version());
            Ok(())
        }
        Commands::Init => {
            ParticipantStore::new(&config.db_path)
                .initialize()
                .with_context(|| format!("cannot open {}", config.db_path.display()))?;
            println!("Database ready at {}", config.db_path.display());
            Ok(())
        }
        Commands::Desk(command) => {
            let mut session = DeskSession::new();
            login(&mut session, &config, cli.operator, cli.password)?;
            let operator = session.require_authenticated()?;
            info!("event=cli_command module=cli status=start operator={operator}");
            run_desk_command(command, &config)
        }
    }
}

fn run_desk_command(command: DeskCommand, config: &KioskConfig) -> Result<()> {
    let store = ParticipantStore::new(&config.db_path);
    store
        .initialize()
        .context("cannot save, try again: database unavailable")?;
    let service = RegistrationService::new(store);

    match command {
        DeskCommand::Register(args) => register(&service, config, args),
        DeskCommand::List => {
            print_participants(&service.list_all()?);
            Ok(())
        }
        DeskCommand::Search { query } => {
            let hits = service.search(&query)?;
            if hits.is_empty() {
                println!("No results found");
            } else {
                print_participants(&hits);
            }
            Ok(())
        }
        DeskCommand::Export { path } => {
            let participants = service.list_all()?;
            if participants.is_empty() {
                println!("Nothing to export");
                return Ok(());
            }
            write_export(&path, &participants)?;
            println!(
                "Exported {} participants to {}",
                participants.len(),
                path.display()
            );
            Ok(())
        }
        DeskCommand::Qr { uid, qr_out } => {
            let participant = service
                .find(&uid)?
                .ok_or_else(|| anyhow!("no participant with uid {uid}"))?;
            print_qr(&participant.payload(), qr_out.as_deref())
        }
    }
}

fn register(
    service: &RegistrationService<ParticipantStore>,
    config: &KioskConfig,
    args: RegisterArgs,
) -> Result<()> {
    let form = collect_form(config, &args)?;

    let unlisted = config.options.unlisted_fields(&form);
    if !unlisted.is_empty() {
        let labels: Vec<&str> = unlisted.iter().map(|field| field.label()).collect();
        println!("Note: not in the configured lists: {}", labels.join(", "));
    }

    let submission = submit(service, &config.backup_path, &form, |existing_uid| {
        println!("This contact is already registered as {existing_uid}.");
        if args.store_duplicate {
            return Ok(MatchChoice::Store);
        }
        let reissue = args.yes
            || Confirm::new()
                .with_prompt("Generate QR code anyway?")
                .default(false)
                .interact()?;
        Ok(if reissue {
            MatchChoice::Reissue
        } else {
            MatchChoice::Cancel
        })
    })?;

    match submission {
        Submission::Stored {
            participant,
            backup,
        } => {
            println!("Registration successful");
            print_qr(&participant.payload(), args.qr_out.as_deref())?;
            backup.context("participant stored, but the backup file could not be written")
        }
        Submission::Reissued {
            existing_uid,
            payload,
        } => {
            println!("Not stored; existing record is {existing_uid}");
            print_qr(&payload, args.qr_out.as_deref())
        }
        Submission::Cancelled => {
            println!("Nothing stored.");
            Ok(())
        }
    }
}

/// Runs one registration attempt; `on_match` decides what happens when the
/// contact is already registered. Only stored participants reach the backup.
fn submit(
    service: &RegistrationService<ParticipantStore>,
    backup_path: &Path,
    form: &RegistrationForm,
    on_match: impl FnOnce(&str) -> Result<MatchChoice>,
) -> Result<Submission> {
    let participant = match service.register(form) {
        Ok(RegistrationOutcome::Registered(participant)) => participant,
        Ok(RegistrationOutcome::ContactAlreadyRegistered {
            existing_uid,
            payload,
        }) => match on_match(&existing_uid)? {
            MatchChoice::Reissue => {
                info!(
                    "event=qr_reissue module=cli status=ok existing_uid={existing_uid} uid={}",
                    payload.uid
                );
                return Ok(Submission::Reissued {
                    existing_uid,
                    payload,
                });
            }
            MatchChoice::Cancel => return Ok(Submission::Cancelled),
            MatchChoice::Store => service
                .register_anyway(&payload)
                .context("cannot save, try again")?,
        },
        Err(ServiceError::Validation(err)) => bail!("{err}"),
        Err(err) => return Err(anyhow::Error::new(err).context("cannot save, try again")),
    };

    let backup = append_backup(backup_path, &participant);
    Ok(Submission::Stored {
        participant,
        backup,
    })
}

fn collect_form(config: &KioskConfig, args: &RegisterArgs) -> Result<RegistrationForm> {
    let name = text_or_prompt(args.name.clone(), "Full name")?;
    let email = text_or_prompt(args.email.clone(), "Email address")?;
    let phone = text_or_prompt(args.phone.clone(), "Phone number")?;
    let college = pick_or_prompt(config, args.college.clone(), OptionKind::College)?;
    let dept = pick_or_prompt(config, args.dept.clone(), OptionKind::Department)?;
    let year = pick_or_prompt(config, args.year.clone(), OptionKind::Degree)?;

    Ok(RegistrationForm::default()
        .with(FormField::Name, name)
        .with(FormField::Email, email)
        .with(FormField::Phone, phone)
        .with(FormField::College, college)
        .with(FormField::Dept, dept)
        .with(FormField::Year, year))
}

fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

fn pick_or_prompt(config: &KioskConfig, value: Option<String>, kind: OptionKind) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let options = config.options.list(kind);
    let index = FuzzySelect::new()
        .with_prompt(format!("Select {}", kind.field().label()))
        .items(options)
        .default(0)
        .interact()?;
    Ok(options[index].clone())
}

fn login(
    session: &mut DeskSession,
    config: &KioskConfig,
    operator: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = text_or_prompt(operator, "Desk email")?;
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Desk password").interact()?,
    };
    session
        .login(&config.desk, email.trim(), &password)
        .context("access denied")
}

fn print_qr(payload: &RegistrationPayload, svg_path: Option<&Path>) -> Result<()> {
    println!("UID: {}", payload.uid);
    println!("QR: {}", qr_payload(payload)?);
    println!("{}", render_qr_terminal(payload)?);
    if let Some(path) = svg_path {
        std::fs::write(path, render_qr_svg(payload)?)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("QR code saved to {}", path.display());
    }
    Ok(())
}

fn print_participants(participants: &[Participant]) {
    for participant in participants {
        println!("{}", participant.columns().join(" | "));
    }
    println!("{} participant(s)", participants.len());
}

fn load_config(path: Option<&Path>) -> Result<KioskConfig> {
    let mut config = match path {
        Some(path) => KioskConfig::load(path)?,
        None => KioskConfig::default(),
    };
    config.override_db_path(std::env::var(DB_PATH_ENV).ok().as_deref());
    Ok(config)
}

fn start_logging(config: &KioskConfig) -> Result<()> {
    let log_dir = if config.log_dir.is_absolute() {
        config.log_dir.clone()
    } else {
        std::env::current_dir()?.join(&config.log_dir)
    };
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| anyhow!("log_dir must be valid UTF-8"))?;
    init_logging(log_level(config), log_dir).map_err(|err| anyhow!(err))
}

fn log_level(config: &KioskConfig) -> &str {
    config.log_level.as_deref().unwrap_or(default_log_level())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use onspot_core::ParticipantRepository;

    fn form(email: &str, phone: &str) -> RegistrationForm {
        RegistrationForm::default()
            .with(FormField::Name, "Asha")
            .with(FormField::Email, email)
            .with(FormField::Phone, phone)
            .with(FormField::College, "Mepco Schlenk Engineering College")
            .with(FormField::Dept, "ECE")
            .with(FormField::Year, "B.E")
    }

    fn desk(dir: &Path) -> (RegistrationService<ParticipantStore>, PathBuf) {
        let store = ParticipantStore::new(dir.join("desk.db"));
        store.initialize().unwrap();
        (RegistrationService::new(store), dir.join("backup.csv"))
    }

    fn backup_rows(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count() - 1
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn desk_commands_parse_at_top_level() {
        let cli = Cli::try_parse_from(["onspot", "qr", "ONSPOT-1", "--qr-out", "a.svg"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Desk(DeskCommand::Qr { ref uid, qr_out: Some(_) }) if uid == "ONSPOT-1"
        ));
        let cli = Cli::try_parse_from(["onspot", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn log_level_prefers_config_value() {
        let mut config = KioskConfig::default();
        config.log_level = None;
        assert_eq!(log_level(&config), default_log_level());

        config.log_level = Some("warn".to_string());
        assert_eq!(log_level(&config), "warn");
    }

    #[test]
    fn contact_match_reissues_without_storing() {
        let dir = tempfile::tempdir().unwrap();
        let (service, backup_path) = desk(dir.path());

        let first = submit(&service, &backup_path, &form("a@gmail.com", "1111111111"), |_| {
            panic!("first registration has no match")
        })
        .unwrap();
        let Submission::Stored { participant, backup } = first else {
            panic!("expected stored participant");
        };
        backup.unwrap();

        let mut seen = None;
        let again = submit(
            &service,
            &backup_path,
            &form("a@gmail.com", "2222222222"),
            |existing_uid| {
                seen = Some(existing_uid.to_string());
                Ok(MatchChoice::Reissue)
            },
        )
        .unwrap();

        assert_eq!(seen.as_deref(), Some(participant.uid.as_str()));
        match again {
            Submission::Reissued {
                existing_uid,
                payload,
            } => {
                assert_eq!(existing_uid, participant.uid);
                assert_ne!(payload.uid, participant.uid);
                assert_eq!(payload.phone, "2222222222");
            }
            other => panic!("expected reissue, got {other:?}"),
        }
        assert_eq!(service.repository().list_all().unwrap().len(), 1);
        assert_eq!(backup_rows(&backup_path), 1);
    }

    #[test]
    fn contact_match_cancel_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (service, backup_path) = desk(dir.path());
        submit(&service, &backup_path, &form("a@gmail.com", "1111111111"), |_| {
            Ok(MatchChoice::Cancel)
        })
        .unwrap();

        let again = submit(&service, &backup_path, &form("b@gmail.com", "1111111111"), |_| {
            Ok(MatchChoice::Cancel)
        })
        .unwrap();

        assert!(matches!(again, Submission::Cancelled));
        assert_eq!(service.list_all().unwrap().len(), 1);
        assert_eq!(backup_rows(&backup_path), 1);
    }

    #[test]
    fn store_duplicate_choice_adds_row_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let (service, backup_path) = desk(dir.path());
        submit(&service, &backup_path, &form("a@gmail.com", "1111111111"), |_| {
            Ok(MatchChoice::Reissue)
        })
        .unwrap();

        let again = submit(&service, &backup_path, &form("a@gmail.com", "1111111111"), |_| {
            Ok(MatchChoice::Store)
        })
        .unwrap();

        assert!(matches!(again, Submission::Stored { backup: Ok(()), .. }));
        assert_eq!(service.list_all().unwrap().len(), 2);
        assert_eq!(backup_rows(&backup_path), 2);
    }

    #[test]
    fn invalid_form_is_rejected_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let (service, backup_path) = desk(dir.path());

        let result = submit(&service, &backup_path, &form("a@yahoo.com", "1111111111"), |_| {
            Ok(MatchChoice::Store)
        });

        assert!(result.is_err());
        assert!(service.list_all().unwrap().is_empty());
        assert!(!backup_path.exists());
    }
}
