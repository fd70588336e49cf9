//! Marigold CLI - storefront client front end.
//!
//! # Usage
//!
//! ```bash
//! # Authenticate against the backend and store the credential
//! mg-cli login -e user@example.com -p secret
//!
//! # Show the profile for the stored credential
//! mg-cli whoami
//!
//! # Show where the stored credential routes on startup
//! mg-cli route
//!
//! # Log out (best-effort remote invalidation, unconditional local cleanup)
//! mg-cli logout
//!
//! # Validate an address form
//! mg-cli address validate -n "Asha Rao" -p 9876543210 --pincode 560001 \
//!     -a "12 MG Road" -c Bengaluru -s Karnataka
//!
//! # Prefill an address draft from coordinates (needs GEOCODE_API_KEY)
//! mg-cli address prefill --lat 12.97 --lon 77.59
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` - session management
//! - `whoami` - bootstrap the session and show the resolved user
//! - `route` - show the startup routing decision
//! - `forgot-password` - request a password-reset email
//! - `address validate` / `address prefill` - address form helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mg-cli")]
#[command(author, version, about = "Marigold Market CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the returned credential
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Contact phone (10 digits)
        #[arg(long)]
        phone: Option<String>,
    },
    /// Invalidate the session and clear the stored credential
    Logout,
    /// Bootstrap the session and show the resolved user
    Whoami,
    /// Show the startup routing decision for the stored credential
    Route,
    /// Request a password-reset email
    ForgotPassword {
        /// Account email
        #[arg(short, long)]
        email: String,
    },
    /// Address form helpers
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
}

#[derive(Subcommand)]
enum AddressAction {
    /// Validate an address form
    Validate {
        /// Recipient name
        #[arg(short, long)]
        name: String,

        /// Contact phone (10 digits)
        #[arg(short, long)]
        phone: String,

        /// Postal pincode (6 digits)
        #[arg(long)]
        pincode: String,

        /// Street address
        #[arg(short, long)]
        address: String,

        /// City
        #[arg(short, long)]
        city: String,

        /// State or region
        #[arg(short, long)]
        state: String,
    },
    /// Prefill an address draft from GPS coordinates
    Prefill {
        /// Latitude
        #[arg(long)]
        lat: f64,

        /// Longitude
        #[arg(long)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&email, &password).await?,
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => commands::auth::register(&name, &email, &password, phone).await?,
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::Route => commands::auth::route()?,
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&email).await?,
        Commands::Address { action } => match action {
            AddressAction::Validate {
                name,
                phone,
                pincode,
                address,
                city,
                state,
            } => commands::address::validate(&name, &phone, &pincode, &address, &city, &state)?,
            AddressAction::Prefill { lat, lon } => commands::address::prefill(lat, lon).await?,
        },
    }
    Ok(())
}
