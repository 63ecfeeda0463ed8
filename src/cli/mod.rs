// src/cli/mod.rs
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::core::auth::AuthSession;
use crate::core::config::Config;
use crate::core::store::PasswordStore;
use crate::db::Storage;
use crate::sync::{DriveSync, SyncBackend};

pub mod commands;
pub mod display;
pub mod handlers;
pub mod menu;

pub use commands::{CliCommand, GenerateArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate, score and keep passwords", long_about = None)]
pub struct Args {
    /// Use JSON for output
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding passwords.json, settings.json and the session
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Do not mirror changes to the cloud
    #[arg(long, global = true)]
    pub no_sync: bool,

    /// Debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Everything a command needs, built once at startup.
pub struct AppContext {
    pub config: Config,
    pub auth: Arc<AuthSession>,
    pub store: Arc<PasswordStore>,
}

impl AppContext {
    pub fn build(config: Config) -> Result<Self, Box<dyn Error>> {
        let auth = Arc::new(AuthSession::load(config.session_file()));

        let sync = if config.sync_enabled && auth.is_authenticated() {
            let drive = DriveSync::new(config.drive_config(), Arc::clone(&auth))?;
            log::debug!("Cloud sync enabled");
            Some(SyncBackend::GoogleDrive(drive))
        } else {
            log::debug!("Cloud sync disabled");
            None
        };

        let store = PasswordStore::open(Storage::json(&config.data_dir), sync)?;

        Ok(Self {
            config,
            auth,
            store: Arc::new(store),
        })
    }
}

pub async fn run(ctx: &AppContext, command: CliCommand, json: bool) -> Result<(), Box<dyn Error>> {
    let store = ctx.store.as_ref();

    match command {
        CliCommand::Generate(args) => {
            let options = args.apply_to(&store.password_options());
            let mut outcome = handlers::handle_generate(store, &ctx.config, &options, !args.no_remember)?;

            if let Some(title) = &args.save {
                let id = handlers::handle_save(
                    store,
                    title,
                    &outcome.password,
                    &args.tags,
                    args.notes.as_deref(),
                )?;
                outcome.saved_id = Some(id);
            }

            if json {
                display::print_json(&outcome)?;
            } else {
                display::print_generated(&outcome);
            }
        }
        CliCommand::Spaces { length } => {
            let length = length.unwrap_or_else(|| store.password_options().length);
            let outcome = handlers::handle_generate_spaces(&ctx.config, length)?;
            if json {
                display::print_json(&outcome)?;
            } else {
                display::print_generated(&outcome);
            }
        }
        CliCommand::Check { password } => {
            let report = handlers::handle_check(&password);
            if json {
                display::print_json(&report)?;
            } else {
                display::print_strength(&report);
            }
        }
        CliCommand::Save { title, password, tags, notes } => {
            let id = handlers::handle_save(store, &title, &password, &tags, notes.as_deref())?;
            if json {
                display::print_json(&serde_json::json!({ "id": id }))?;
            } else {
                println!("✅ Password saved with ID: {}", id);
            }
        }
        CliCommand::List => {
            let records = handlers::handle_list(store);
            if json {
                display::print_json(&records)?;
            } else {
                display::print_table(&records);
            }
        }
        CliCommand::Get { id } => {
            let record = handlers::handle_get(store, &id)?;
            if json {
                display::print_json(&record)?;
            } else {
                display::print_record(&record, true);
            }
        }
        CliCommand::Search { query } => {
            let records = handlers::handle_search(store, &query);
            if json {
                display::print_json(&records)?;
            } else {
                display::print_table(&records);
            }
        }
        CliCommand::Tag { tag } => {
            let records = handlers::handle_tag(store, &tag);
            if json {
                display::print_json(&records)?;
            } else {
                display::print_table(&records);
            }
        }
        CliCommand::Update { id, title, password, tags, notes } => {
            let record = handlers::handle_update(
                store,
                &id,
                title.as_deref(),
                password.as_deref(),
                tags.as_deref(),
                notes.as_deref(),
            )?;
            if json {
                display::print_json(&record)?;
            } else {
                println!("✅ Password {} updated", record.id);
            }
        }
        CliCommand::Delete { id } => {
            handlers::handle_delete(store, &id)?;
            if !json {
                println!("🗑️  Password {} deleted", id);
            }
        }
        CliCommand::Clear { yes } => {
            let confirmed = yes
                || inquire::Confirm::new("Delete every saved password?")
                    .with_default(false)
                    .prompt()?;
            if confirmed {
                let count = handlers::handle_clear(store)?;
                if !json {
                    println!("🗑️  Deleted {} password(s)", count);
                }
            }
        }
        CliCommand::Options => {
            let options = store.password_options();
            if json {
                display::print_json(&options)?;
            } else {
                println!("{:#?}", options);
            }
        }
        CliCommand::Login { token } => {
            let user = handlers::handle_login(&ctx.auth, &ctx.config, &token).await?;
            if json {
                display::print_json(&serde_json::json!({ "id": user.id, "email": user.email, "name": user.name }))?;
            } else {
                display::print_user(Some(&user));
            }
        }
        CliCommand::Logout => {
            handlers::handle_logout(&ctx.auth)?;
            if !json {
                println!("Signed out.");
            }
        }
        CliCommand::Whoami => {
            let user = ctx.auth.current_user();
            if json {
                display::print_json(&user.as_ref().map(|u| {
                    serde_json::json!({ "id": u.id, "email": u.email, "name": u.name })
                }))?;
            } else {
                display::print_user(user.as_ref());
            }
        }
        CliCommand::Push => {
            let count = handlers::handle_push(store).await?;
            if !json {
                println!("☁️  Uploaded {} password(s)", count);
            }
        }
        CliCommand::Pull { replace } => {
            let records = handlers::handle_pull(store, replace).await?;
            if json {
                display::print_json(&records)?;
            } else {
                display::print_table(&records);
                if replace {
                    println!("Local collection replaced with the remote copy.");
                }
            }
        }
        CliCommand::Files { delete: Some(file_id) } => {
            handlers::handle_delete_file(store, &file_id).await?;
            if !json {
                println!("🗑️  Remote file {} deleted", file_id);
            }
        }
        CliCommand::Files { delete: None } => {
            let files = handlers::handle_files(store).await?;
            if json {
                display::print_json(&files)?;
            } else {
                display::print_files(&files);
            }
        }
        CliCommand::Menu => menu::run_cli_menu(ctx).await?,
    }

    Ok(())
}
