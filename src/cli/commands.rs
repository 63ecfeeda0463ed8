// src/cli/commands.rs
use clap::{Args as ClapArgs, Subcommand};

use crate::models::PasswordOptions;

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Generate a password
    Generate(GenerateArgs),

    /// Generate a password made only of spaces
    Spaces {
        /// Password length (clamped to the configured range)
        #[arg(long, short)]
        length: Option<usize>,
    },

    /// Score the strength of a password
    Check {
        #[arg(required = true)]
        password: String,
    },

    /// Save a password
    Save {
        #[arg(long, short)]
        title: String,

        #[arg(long, short)]
        password: String,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List all saved passwords
    List,

    /// Show a saved password by ID
    Get {
        #[arg(required = true)]
        id: String,
    },

    /// Search titles, notes and tags
    Search {
        /// Empty query lists everything
        #[arg(default_value = "")]
        query: String,
    },

    /// List passwords carrying a tag
    Tag {
        #[arg(required = true)]
        tag: String,
    },

    /// Update a saved password
    Update {
        #[arg(required = true)]
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Replaces the tag list; comma-separated
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Empty string removes the notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a saved password
    Delete {
        #[arg(required = true)]
        id: String,
    },

    /// Delete every saved password
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show the remembered generator options
    Options,

    /// Sign in to Google Drive with an OAuth access token
    Login {
        #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Upload all passwords to the cloud, overwriting the remote copy
    Push,

    /// Download passwords from the cloud
    Pull {
        /// Replace the local collection with the remote one
        #[arg(long)]
        replace: bool,
    },

    /// List files in the remote app folder
    Files {
        /// Delete the remote file with this ID instead of listing
        #[arg(long)]
        delete: Option<String>,
    },

    /// Interactive menu
    Menu,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Password length (clamped to the configured range)
    #[arg(long, short)]
    pub length: Option<usize>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub uppercase: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub lowercase: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub numbers: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub symbols: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub spaces: Option<bool>,

    /// Leave out i l 1 L o 0 O
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub exclude_similar: Option<bool>,

    /// Leave out brackets, quotes and punctuation that are easy to mistype
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub exclude_ambiguous: Option<bool>,

    /// Save the generated password under this title
    #[arg(long)]
    pub save: Option<String>,

    /// Comma-separated tags for --save
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Notes for --save
    #[arg(long)]
    pub notes: Option<String>,

    /// Do not remember these options for the next run
    #[arg(long)]
    pub no_remember: bool,
}

impl GenerateArgs {
    /// Layer the flags given on the command line over `base`.
    pub fn apply_to(&self, base: &PasswordOptions) -> PasswordOptions {
        let mut options = base.clone();

        if let Some(length) = self.length {
            options.length = length;
        }
        if let Some(v) = self.uppercase {
            options.include_uppercase = v;
        }
        if let Some(v) = self.lowercase {
            options.include_lowercase = v;
        }
        if let Some(v) = self.numbers {
            options.include_numbers = v;
        }
        if let Some(v) = self.symbols {
            options.include_symbols = v;
        }
        if let Some(v) = self.spaces {
            options.include_spaces = v;
        }
        if let Some(v) = self.exclude_similar {
            options.exclude_similar = v;
        }
        if let Some(v) = self.exclude_ambiguous {
            options.exclude_ambiguous = v;
        }

        options
    }
}
