//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart.
    Add {
        /// Product ID.
        #[arg(short, long)]
        product: String,

        /// Product name.
        #[arg(short, long)]
        name: String,

        /// Unit price in major units (e.g. 19.99).
        #[arg(long)]
        price: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        qty: i64,

        /// Image URL.
        #[arg(long)]
        image: Option<String>,

        /// Variant selection as name=value; a bare name records it unselected.
        #[arg(short, long = "attr")]
        attrs: Vec<String>,
    },
    /// Remove a line from the cart.
    Remove {
        /// Line item key (see `cart show`).
        key: String,
    },
    /// Set the quantity of a line.
    Update {
        /// Line item key (see `cart show`).
        key: String,

        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove every line.
    Clear {
        /// Skip confirmation prompt (required with --json).
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the cart contents and subtotal.
    Show,
    /// Print the line item key for a product and selection.
    Key {
        /// Product ID.
        #[arg(short, long)]
        product: String,

        /// Variant selection as name=value.
        #[arg(short, long = "attr")]
        attrs: Vec<String>,
    },
    /// Place an order for the cart contents.
    Checkout {
        /// Customer email.
        #[arg(short, long)]
        email: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
