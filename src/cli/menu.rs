// src/cli/menu.rs
use inquire::{Confirm, Password, Select, Text};
use std::error::Error;

use crate::cli::display;
use crate::cli::handlers;
use crate::cli::AppContext;
use crate::models::{PasswordOptions, SavedPassword};

const GENERATE: &str = "🔐  Generate secure password";
const SPACES: &str = "␣  Generate spaces-only password";
const CHECK: &str = "📊  Check password strength";
const ADD: &str = "➕  Add a password";
const VIEW: &str = "📋  View saved passwords";
const SEARCH: &str = "🔍  Search passwords";
const EDIT: &str = "✏️  Edit password";
const DELETE: &str = "🗑️  Delete password";
const PUSH: &str = "☁️  Upload to cloud";
const PULL: &str = "📥  Download from cloud";
const EXIT: &str = "❌  Exit";

pub async fn run_cli_menu(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    println!("╔══════════════════════════════════════╗");
    println!("║          🔑 LOCKKEY PASSWORDS        ║");
    println!("╚══════════════════════════════════════╝");
    display::print_user(ctx.auth.current_user().as_ref());

    loop {
        let options = vec![GENERATE, SPACES, CHECK, ADD, VIEW, SEARCH, EDIT, DELETE, PUSH, PULL, EXIT];

        let selection = tokio::task::spawn_blocking(move || {
            Select::new("Choose an option:", options)
                .with_help_message("Use arrow keys to navigate, Enter to select, Esc to exit.")
                .with_page_size(20)
                .prompt_skippable()
        })
        .await??;

        let Some(selection) = selection else {
            break;
        };

        let result = match selection {
            GENERATE => generate(ctx),
            SPACES => generate_spaces(ctx),
            CHECK => check(),
            ADD => add(ctx),
            VIEW => view(ctx),
            SEARCH => search(ctx),
            EDIT => edit(ctx),
            DELETE => delete(ctx),
            PUSH => match handlers::handle_push(&ctx.store).await {
                Ok(count) => {
                    println!("☁️  Uploaded {} password(s)", count);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            PULL => pull(ctx).await,
            _ => break,
        };

        if let Err(e) = result {
            println!("❌ {}", e);
        }
    }

    ctx.store.wait_for_sync().await;
    println!("👋 Goodbye!");
    Ok(())
}

fn prompt_options(defaults: &PasswordOptions) -> Result<PasswordOptions, Box<dyn Error>> {
    let length: usize = Text::new("Password length:")
        .with_default(&defaults.length.to_string())
        .prompt()
        .and_then(|s| {
            s.trim()
                .parse()
                .map_err(|_| inquire::InquireError::Custom("Invalid number".into()))
        })?;

    Ok(PasswordOptions {
        length,
        include_uppercase: Confirm::new("Include uppercase letters?")
            .with_default(defaults.include_uppercase)
            .prompt()?,
        include_lowercase: Confirm::new("Include lowercase letters?")
            .with_default(defaults.include_lowercase)
            .prompt()?,
        include_numbers: Confirm::new("Include numbers?")
            .with_default(defaults.include_numbers)
            .prompt()?,
        include_symbols: Confirm::new("Include symbols?")
            .with_default(defaults.include_symbols)
            .prompt()?,
        include_spaces: Confirm::new("Include spaces?")
            .with_default(defaults.include_spaces)
            .prompt()?,
        exclude_similar: Confirm::new("Exclude similar characters (i, l, 1, L, o, 0, O)?")
            .with_default(defaults.exclude_similar)
            .prompt()?,
        exclude_ambiguous: Confirm::new("Exclude ambiguous characters ({ } [ ] ( ) / \\ ' \" ` ~ , ; . < >)?")
            .with_default(defaults.exclude_ambiguous)
            .prompt()?,
    })
}

fn generate(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let options = prompt_options(&ctx.store.password_options())?;

    if !options.has_category() {
        println!("❗ Select at least one character type.");
        return Ok(());
    }

    let outcome = handlers::handle_generate(&ctx.store, &ctx.config, &options, true)?;
    display::print_generated(&outcome);
    offer_save(ctx, &outcome.password)
}

fn generate_spaces(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let length = ctx.store.password_options().length;
    let outcome = handlers::handle_generate_spaces(&ctx.config, length)?;
    display::print_generated(&outcome);
    offer_save(ctx, &outcome.password)
}

fn offer_save(ctx: &AppContext, password: &str) -> Result<(), Box<dyn Error>> {
    let save = Confirm::new("Save this password?")
        .with_default(false)
        .prompt()?;
    if !save {
        return Ok(());
    }

    let title = Text::new("Title:").prompt()?;
    let (tags, notes) = prompt_metadata()?;
    let id = handlers::handle_save(&ctx.store, &title, password, &tags, notes.as_deref())?;
    println!("✅ Password saved with ID: {}", id);
    Ok(())
}

fn prompt_metadata() -> Result<(Vec<String>, Option<String>), Box<dyn Error>> {
    let tags = Text::new("Tags (comma-separated, optional):").prompt()?;
    let tags: Vec<String> = tags.split(',').map(|t| t.trim().to_string()).collect();

    let notes = Text::new("Notes (optional):").prompt()?;
    let notes = if notes.trim().is_empty() { None } else { Some(notes) };

    Ok((tags, notes))
}

fn check() -> Result<(), Box<dyn Error>> {
    let password = Password::new("Password to check:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    display::print_strength(&handlers::handle_check(&password));
    Ok(())
}

fn add(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let title = Text::new("Title:").prompt()?;
    let password = Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .prompt()?;
    display::print_strength(&handlers::handle_check(&password));

    let (tags, notes) = prompt_metadata()?;
    let id = handlers::handle_save(&ctx.store, &title, &password, &tags, notes.as_deref())?;
    println!("✅ Password saved with ID: {}", id);
    Ok(())
}

fn view(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let records = handlers::handle_list(&ctx.store);
    display::print_table(&records);

    if let Some(record) = pick(&records, "Show details for:")? {
        let reveal = Confirm::new("Reveal password?").with_default(false).prompt()?;
        display::print_record(&record, reveal);
    }
    Ok(())
}

fn search(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let query = Text::new("Search:").prompt()?;
    display::print_table(&handlers::handle_search(&ctx.store, &query));
    Ok(())
}

fn edit(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let records = handlers::handle_list(&ctx.store);
    let Some(record) = pick(&records, "Edit which password?")? else {
        return Ok(());
    };

    let title = Text::new("Title:").with_default(&record.title).prompt()?;
    let change_password = Confirm::new("Change the password?").with_default(false).prompt()?;
    let password = if change_password {
        Some(
            Password::new("New password:")
                .with_display_mode(inquire::PasswordDisplayMode::Hidden)
                .prompt()?,
        )
    } else {
        None
    };
    let tags = Text::new("Tags (comma-separated):")
        .with_default(&record.tags.join(","))
        .prompt()?;
    let tags: Vec<String> = tags.split(',').map(|t| t.trim().to_string()).collect();
    let notes = Text::new("Notes:")
        .with_default(record.notes.as_deref().unwrap_or(""))
        .prompt()?;

    handlers::handle_update(
        &ctx.store,
        &record.id,
        Some(&title),
        password.as_deref(),
        Some(&tags),
        Some(&notes),
    )?;
    println!("✅ Password updated");
    Ok(())
}

fn delete(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let records = handlers::handle_list(&ctx.store);
    let Some(record) = pick(&records, "Delete which password?")? else {
        return Ok(());
    };

    let confirm = Confirm::new(&format!("Delete \"{}\"?", record.title))
        .with_default(false)
        .prompt()?;
    if confirm {
        handlers::handle_delete(&ctx.store, &record.id)?;
        println!("✅ Password deleted successfully!");
    }
    Ok(())
}

async fn pull(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let remote = handlers::handle_pull(&ctx.store, false).await?;
    println!("Remote copy holds {} password(s).", remote.len());
    if remote.is_empty() {
        return Ok(());
    }

    let replace = Confirm::new("Replace the local passwords with the remote copy?")
        .with_default(false)
        .prompt()?;
    if replace {
        ctx.store.replace_all(remote)?;
        println!("✅ Local passwords replaced");
    }
    Ok(())
}

fn pick(records: &[SavedPassword], prompt: &str) -> Result<Option<SavedPassword>, Box<dyn Error>> {
    if records.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = records
        .iter()
        .map(|r| format!("{}  [{}]", r.title, r.id))
        .collect();
    let choice = Select::new(prompt, labels.clone()).prompt_skippable()?;

    Ok(choice
        .and_then(|c| labels.iter().position(|l| *l == c))
        .map(|i| records[i].clone()))
}
