// src/cli/display.rs
use std::error::Error;

use console::style;
use serde::Serialize;

use crate::cli::handlers::GenerateOutcome;
use crate::models::{DriveFile, GoogleUser, SavedPassword, StrengthReport};
use crate::utils::{format_time_ago, mask_password, truncate_string};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_strength(report: &StrengthReport) {
    let verdict = if report.valid {
        style("strong").green().bold()
    } else {
        style("weak").red().bold()
    };
    println!("Strength: {} (score {})", verdict, report.score);
    for hint in &report.feedback {
        println!("  • {}", hint);
    }
}

pub fn print_generated(outcome: &GenerateOutcome) {
    if outcome.options.include_spaces && outcome.password.trim().is_empty() {
        println!("\nGenerated Password: \"{}\"", outcome.password);
    } else {
        println!("\nGenerated Password: {}", style(&outcome.password).cyan().bold());
    }
    print_strength(&outcome.strength);
    if let Some(id) = &outcome.saved_id {
        println!("✅ Saved as {}", id);
    }
}

pub fn print_table(records: &[SavedPassword]) {
    if records.is_empty() {
        println!("No saved passwords.");
        return;
    }

    println!(
        "{:<36}  {:<24}  {:<20}  {}",
        style("ID").bold(),
        style("Title").bold(),
        style("Tags").bold(),
        style("Updated").bold()
    );
    for record in records {
        println!(
            "{:<36}  {:<24}  {:<20}  {}",
            record.id,
            truncate_string(&record.title, 24),
            truncate_string(&record.tags.join(","), 20),
            format_time_ago(record.updated_at)
        );
    }
    println!("\n{} password(s)", records.len());
}

pub fn print_record(record: &SavedPassword, reveal: bool) {
    println!("{}  {}", style("ID:").bold(), record.id);
    println!("{}  {}", style("Title:").bold(), record.title);
    let secret = if reveal {
        record.password.clone()
    } else {
        mask_password(&record.password)
    };
    println!("{}  {}", style("Password:").bold(), secret);
    if !record.tags.is_empty() {
        println!("{}  {}", style("Tags:").bold(), record.tags.join(", "));
    }
    if let Some(notes) = &record.notes {
        println!("{}  {}", style("Notes:").bold(), notes);
    }
    println!(
        "{}  {}",
        style("Created:").bold(),
        record.created_at.to_rfc3339()
    );
    println!(
        "{}  {} ({})",
        style("Updated:").bold(),
        record.updated_at.to_rfc3339(),
        format_time_ago(record.updated_at)
    );
}

pub fn print_user(user: Option<&GoogleUser>) {
    match user {
        Some(user) => println!("Signed in as {} <{}>", user.name, user.email),
        None => println!("Not signed in. Use `lockkey login --token <TOKEN>` to enable cloud sync."),
    }
}

pub fn print_files(files: &[DriveFile]) {
    if files.is_empty() {
        println!("The remote folder is empty.");
        return;
    }
    for file in files {
        println!(
            "{}  {}  {}",
            file.id,
            file.name,
            file.modified_time.as_deref().unwrap_or("-")
        );
    }
}
