//! grantsync - manage delegated OAuth2 permission grants on a service principal
//!
//! # Configuration
//!
//! - `DIRECTORY_TOKEN`: bearer token for the directory API (or `--token`)
//! - `DIRECTORY_BASE_URL`: API base URL override (or `--base-url`)
//! - `RUST_LOG`: log filtering; `--verbose` is shorthand for debug level
//!
//! Exit code is 0 on success - including no-op changes and empty views -
//! and 1 on any fatal failure (invalid arguments, ambiguous grant state,
//! authorization or network errors).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use grantsync_core::{
    Action, ChangeReport, ConsentType, Engine, GrantView, Operation, Outcome, Request, ScopeSet,
};
use grantsync_directory_sdk::Directory;
use tracing_subscriber::EnvFilter;

/// Manage delegated OAuth2 permission grants on a client service principal
#[derive(Parser, Debug)]
#[command(name = "grantsync")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Bearer token for the directory API (also: DIRECTORY_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Directory API base URL (also: DIRECTORY_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List grants on a resource and their scopes
    View {
        #[command(flatten)]
        target: Target,
    },

    /// Add scopes to a grant, creating the grant when absent
    Add {
        #[command(flatten)]
        target: Target,

        /// Report the intended change without applying it
        #[arg(long)]
        dry_run: bool,

        /// Scopes to add (space or comma delimited)
        #[arg(required = true)]
        scopes: Vec<String>,
    },

    /// Remove scopes from a grant, deleting the grant once its scope set empties
    Remove {
        #[command(flatten)]
        target: Target,

        /// Report the intended change without applying it
        #[arg(long)]
        dry_run: bool,

        /// Scopes to remove (space or comma delimited)
        #[arg(required = true)]
        scopes: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct Target {
    /// Client service principal object id
    #[arg(long)]
    client: String,

    /// Resource service principal object id
    #[arg(long)]
    resource: String,

    /// Consent type: required for add/remove, optional filter for view
    #[arg(long, value_enum)]
    consent: Option<ConsentArg>,

    /// Granting user's object id (Principal consent)
    #[arg(long)]
    principal: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConsentArg {
    /// Tenant-wide admin consent on behalf of all users
    AllPrincipals,

    /// Consent for a single user
    Principal,
}

impl From<ConsentArg> for ConsentType {
    fn from(arg: ConsentArg) -> Self {
        match arg {
            ConsentArg::AllPrincipals => ConsentType::AllPrincipals,
            ConsentArg::Principal => ConsentType::Principal,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let directory = build_directory(cli.token.as_deref(), cli.base_url.as_deref())?;
    let request = build_request(&cli.command);
    tracing::debug!(?request, "running operation");

    let engine = Engine::new(directory);
    match engine.run(&request).await? {
        Outcome::Changed(report) => print_report(&report),
        Outcome::Listing(views) => print_listing(&views),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_directory(token: Option<&str>, base_url: Option<&str>) -> Result<Directory> {
    let token = match token {
        Some(token) => token.to_string(),
        None => std::env::var("DIRECTORY_TOKEN")
            .context("no bearer token: pass --token or set DIRECTORY_TOKEN")?,
    };

    let mut builder = Directory::builder().bearer_token(token);
    let base_url = base_url
        .map(str::to_owned)
        .or_else(|| std::env::var("DIRECTORY_BASE_URL").ok());
    if let Some(base) = base_url {
        builder = builder.base_url(base);
    }

    builder.build().context("failed to create directory client")
}

fn build_request(command: &Command) -> Request {
    match command {
        Command::View { target } => Request {
            operation: Operation::View,
            client_id: target.client.clone(),
            resource_id: target.resource.clone(),
            consent_type: target.consent.map(ConsentType::from),
            principal_id: target.principal.clone(),
            scopes: Vec::new(),
            dry_run: false,
        },
        Command::Add {
            target,
            dry_run,
            scopes,
        } => change_request(Operation::Add, target, *dry_run, scopes),
        Command::Remove {
            target,
            dry_run,
            scopes,
        } => change_request(Operation::Remove, target, *dry_run, scopes),
    }
}

fn change_request(
    operation: Operation,
    target: &Target,
    dry_run: bool,
    scopes: &[String],
) -> Request {
    Request {
        operation,
        client_id: target.client.clone(),
        resource_id: target.resource.clone(),
        consent_type: target.consent.map(ConsentType::from),
        principal_id: target.principal.clone(),
        scopes: scopes.to_vec(),
        dry_run,
    }
}

fn print_report(report: &ChangeReport) {
    let grant_id = report.change.grant_id.as_deref().unwrap_or("?");

    match (report.change.action, report.dry_run) {
        (Action::NoOp, _) => println!("no change needed"),
        (Action::Create, false) => println!("created grant {}", grant_id),
        (Action::Create, true) => println!("[dry-run] would create a new grant"),
        (Action::Update, false) => println!("updated grant {}", grant_id),
        (Action::Update, true) => println!("[dry-run] would update grant {}", grant_id),
        (Action::Delete, false) => println!("deleted grant {} (scope set emptied)", grant_id),
        (Action::Delete, true) => {
            println!("[dry-run] would delete grant {} (scope set would empty)", grant_id)
        }
    }

    print_scopes("added", &report.change.added);
    print_scopes("removed", &report.change.removed);
    print_scopes("skipped", &report.change.skipped);
    print_scopes("resulting", &report.change.resulting);
}

fn print_scopes(label: &str, scopes: &ScopeSet) {
    if !scopes.is_empty() {
        println!("  {}: {}", label, scopes);
    }
}

fn print_listing(views: &[GrantView]) {
    if views.is_empty() {
        println!("no matching grants");
        return;
    }

    for view in views {
        let principal = view.principal.as_deref().unwrap_or("all principals");
        println!("{} [{}] {}", view.grant_id, view.consent_type, principal);
        println!("  scopes: {}", view.scopes);
    }
}
