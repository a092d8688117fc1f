//! Command implementations.

pub mod checkout;
pub mod recent;
pub mod wishlist;

use clap::Args;
use serde::Serialize;
use thiserror::Error;
use trendhora_core::{ItemDescriptor, Price};
use trendhora_storefront::error::AppError;
use trendhora_storefront::storage::StorageError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Product fields accepted on the command line.
#[derive(Debug, Args)]
pub struct ItemArgs {
    /// Item ID
    #[arg(long)]
    pub id: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Unit price (e.g. 19.99)
    #[arg(long)]
    pub price: Price,

    /// Image URL
    #[arg(long, default_value = "")]
    pub image: String,

    /// Category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Available size (repeatable; the first is the default)
    #[arg(long)]
    pub size: Vec<String>,
}

impl From<ItemArgs> for ItemDescriptor {
    fn from(args: ItemArgs) -> Self {
        Self::new(args.id, args.name, args.price)
            .with_image(args.image)
            .with_category(args.category)
            .with_sizes(args.size)
    }
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn emit(value: &impl Serialize) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a single line on stdout.
#[allow(clippy::print_stdout)]
pub fn emit_line(line: &str) {
    println!("{line}");
}
