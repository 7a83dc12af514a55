//! `Folio` CLI: operator tooling for a `Folio` installation.
//!
//! Works directly on the files the server reads: the credential file and
//! the document directory. It does not talk to a running server.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use folio_core::credentials::{self, CredentialStore};
use folio_core::renderer::RenderMode;
use folio_storage::{DocumentStore, FsDocumentStore};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

// ── CLI structure ────────────────────────────────────────────────────

/// Folio, a small document CMS.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Folio CLI: manage sign-in credentials and inspect documents",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         FOLIO_USERS_FILE   Credential file (default: users.yml)\n  \
         FOLIO_DATA_DIR     Document directory (default: data)\n\n\
         {DIM}Examples:{RESET}\n  \
         folio add-user admin --password secret\n  \
         folio hash-password secret\n  \
         folio list"
    ),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bcrypt hash for a password.
    HashPassword {
        /// Plaintext password.
        password: String,
        /// bcrypt cost factor (4-31).
        #[arg(long, default_value_t = credentials::DEFAULT_COST)]
        cost: u32,
    },
    /// Add a user to the credential file, or replace their password.
    AddUser {
        /// Username to add.
        username: String,
        /// Plaintext password; stored only as a bcrypt hash.
        #[arg(long)]
        password: String,
        /// Credential file to update.
        #[arg(long, env = "FOLIO_USERS_FILE", default_value = "users.yml")]
        users_file: PathBuf,
        /// bcrypt cost factor (4-31).
        #[arg(long, default_value_t = credentials::DEFAULT_COST)]
        cost: u32,
    },
    /// Check a username and password against the credential file.
    Verify {
        /// Username to check.
        username: String,
        /// Plaintext password.
        #[arg(long)]
        password: String,
        /// Credential file to read.
        #[arg(long, env = "FOLIO_USERS_FILE", default_value = "users.yml")]
        users_file: PathBuf,
    },
    /// List the documents in a document directory.
    List {
        /// Document directory.
        #[arg(long, env = "FOLIO_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{RED}{BOLD}✗ Error:{RESET} {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::HashPassword { password, cost } => cmd_hash_password(&password, cost),
        Commands::AddUser {
            username,
            password,
            users_file,
            cost,
        } => cmd_add_user(&users_file, &username, &password, cost).await,
        Commands::Verify {
            username,
            password,
            users_file,
        } => cmd_verify(&users_file, &username, &password).await,
        Commands::List { data_dir } => cmd_list(&data_dir).await,
    }
}

// ── Commands ─────────────────────────────────────────────────────────

/// Print only the hash so the output can be pasted or piped.
fn cmd_hash_password(password: &str, cost: u32) -> Result<()> {
    let hash = credentials::hash_password(password, cost)?;
    println!("{hash}");
    Ok(())
}

async fn cmd_add_user(users_file: &Path, username: &str, password: &str, cost: u32) -> Result<()> {
    if password.is_empty() {
        bail!("password must not be empty");
    }
    let hash = credentials::hash_password(password, cost)?;
    CredentialStore::new(users_file)
        .set(username, &hash)
        .await
        .with_context(|| format!("failed to update {}", users_file.display()))?;

    success(&format!(
        "{username} saved to {} (signs in as admin)",
        users_file.display()
    ));
    Ok(())
}

async fn cmd_verify(users_file: &Path, username: &str, password: &str) -> Result<()> {
    let store = CredentialStore::new(users_file);
    store
        .load()
        .await
        .with_context(|| format!("cannot use {}", users_file.display()))?;

    if store.verify(username, password).await {
        success("credentials are valid");
        Ok(())
    } else {
        bail!("invalid credentials for {username}")
    }
}

async fn cmd_list(data_dir: &Path) -> Result<()> {
    let store = FsDocumentStore::new(data_dir);
    let names = store
        .list()
        .await
        .with_context(|| format!("cannot list {}", data_dir.display()))?;

    if names.is_empty() {
        println!("{DIM}no documents in {}{RESET}", data_dir.display());
        return Ok(());
    }

    for name in names {
        let mode = match RenderMode::for_name(&name) {
            RenderMode::PlainText => "text",
            RenderMode::Markdown => "markdown",
            RenderMode::Unsupported => "unsupported",
        };
        println!("{CYAN}{name:<40}{RESET} {DIM}{mode}{RESET}");
    }
    Ok(())
}

// ── Pretty output helpers ────────────────────────────────────────────

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}
