//! Grin payment CLI
//!
//! Sends or receives grins using a chat backend to carry the slates. A grin
//! wallet must be running locally and the selected backend installed.

use clap::{Parser, Subcommand};
use gringotts::{
    amount, config, handshake, Backend, ForeignApi, OwnerApi, ReceiveOutcome, Result, SendOptions,
    SendOutcome,
};
use secrecy::SecretString;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gringotts")]
#[command(version)]
#[command(about = "Send and receive grins over an ephemeral chat backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send AMOUNT grins to RECIPIENT and wait for the signed reply
    Send {
        /// Amount in GRINs
        #[arg(value_parser = amount::parse_amount_arg)]
        amount: u64,

        /// Chat handle of the receiving party
        recipient: String,

        /// Which backend to use for communication
        #[arg(short, long, value_enum, default_value_t = Backend::Keybase)]
        backend: Backend,

        /// Duration in seconds before the transaction is reversed
        #[arg(short, long, default_value_t = config::DEFAULT_SEND_TTL_SECS)]
        ttl: u64,

        /// Number of confirmations required on spent inputs
        #[arg(short, long, default_value_t = config::DEFAULT_CONFIRMATIONS)]
        confirmations: u64,

        /// Fluff the transaction upon broadcasting
        #[arg(short, long)]
        fluff: bool,

        /// Maximum outputs to use
        #[arg(short, long, default_value_t = config::DEFAULT_MAX_OUTPUTS)]
        outputs: u32,

        /// Address the grin owner api is listening on
        #[arg(long, default_value = config::hosts::OWNER)]
        host: String,

        /// Grin owner api username
        #[arg(short, long, default_value = config::OWNER_API_USERNAME)]
        username: String,

        /// Grin owner api secret; read from ~/.grin/.api_secret when omitted
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// Wait for an incoming slate from SENDER, sign it and reply
    Receive {
        /// Chat handle of the sending party
        sender: String,

        /// Which backend to use for communication
        #[arg(short, long, value_enum, default_value_t = Backend::Keybase)]
        backend: Backend,

        /// Address the grin foreign api is listening on
        #[arg(long, default_value = config::hosts::FOREIGN)]
        host: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Send {
            amount,
            recipient,
            backend,
            ttl,
            confirmations,
            fluff,
            outputs,
            host,
            username,
            secret,
        } => {
            let transport = backend.connect()?;
            let secret = match secret.filter(|s| !s.is_empty()) {
                Some(s) => SecretString::from(s),
                None => config::read_api_secret(None)?,
            };
            let owner = OwnerApi::new(&host, &username, secret)?;
            let opts = SendOptions {
                amount,
                recipient,
                ttl_secs: ttl,
                confirmations,
                max_outputs: outputs,
                fluff,
            };
            match handshake::send(&owner, transport.as_ref(), &opts).await? {
                SendOutcome::Broadcast { slate_id } => {
                    println!("Transaction {slate_id} broadcasted");
                }
                SendOutcome::TimedOut { slate_id } => {
                    println!(
                        "No reply from {} after {ttl} seconds, transaction {slate_id} rolled back",
                        opts.recipient
                    );
                }
            }
            Ok(())
        }
        Commands::Receive {
            sender,
            backend,
            host,
        } => {
            let transport = backend.connect()?;
            let foreign = ForeignApi::new(&host)?;
            let wait = Duration::from_secs(config::RECEIVE_WAIT_SECS);
            match handshake::receive(&foreign, transport.as_ref(), &sender, wait).await? {
                ReceiveOutcome::Signed { .. } => println!("Done"),
                ReceiveOutcome::TimedOut => println!(
                    "Did not receive message from {sender} after {} seconds.",
                    config::RECEIVE_WAIT_SECS
                ),
            }
            Ok(())
        }
    }
}
