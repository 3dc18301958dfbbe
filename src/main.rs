//! Token Ledger CLI Application
//!
//! A command-line host for a single token ledger stored on disk.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use token_ledger::cli::{self, AppState};
use token_ledger::config::LedgerConfig;
use token_ledger::ledger::Address;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(version)]
#[command(about = "An ERC-20 style token ledger", long_about = None)]
struct Cli {
    /// Data directory for ledger storage
    #[arg(short, long, default_value = ".ledger_data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Identity the operation runs as
#[derive(Args)]
struct CallerArgs {
    /// Caller address
    #[arg(long, conflicts_with = "key")]
    caller: Option<Address>,

    /// Caller private key (hex); the caller is its address
    #[arg(long)]
    key: Option<String>,
}

impl CallerArgs {
    fn resolve(&self) -> cli::CliResult<Address> {
        cli::resolve_caller(self.caller, self.key.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init {
        /// JSON config file; overrides the flags below
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Token name
        #[arg(long, required_unless_present = "config")]
        name: Option<String>,

        /// Token symbol
        #[arg(long, required_unless_present = "config")]
        symbol: Option<String>,

        /// Decimal places
        #[arg(long, default_value = "18")]
        decimals: u8,

        /// Restrict minting to this address
        #[arg(long)]
        minter: Option<Address>,

        /// Account receiving the initial supply
        #[arg(long)]
        holder: Option<Address>,

        /// Initial supply
        #[arg(long, default_value = "0")]
        supply: u128,

        /// Replace an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Mint new tokens
    Mint {
        #[command(flatten)]
        caller: CallerArgs,

        /// Recipient address
        #[arg(short, long)]
        to: Address,

        /// Amount to mint
        #[arg(short, long)]
        amount: u128,
    },

    /// Transfer tokens from the caller
    Transfer {
        #[command(flatten)]
        caller: CallerArgs,

        /// Recipient address
        #[arg(short, long)]
        to: Address,

        /// Amount to transfer
        #[arg(short, long)]
        amount: u128,
    },

    /// Let a spender move up to an amount of the caller's tokens
    Approve {
        #[command(flatten)]
        caller: CallerArgs,

        /// Spender address
        #[arg(short, long)]
        spender: Address,

        /// Allowance (replaces any previous one)
        #[arg(short, long)]
        amount: u128,
    },

    /// Transfer tokens on behalf of an owner who approved the caller
    TransferFrom {
        #[command(flatten)]
        caller: CallerArgs,

        /// Owner address
        #[arg(short, long)]
        from: Address,

        /// Recipient address
        #[arg(short, long)]
        to: Address,

        /// Amount to transfer
        #[arg(short, long)]
        amount: u128,
    },

    /// Show an account balance
    Balance {
        /// Account address
        #[arg(short, long)]
        address: Address,
    },

    /// Show an allowance
    Allowance {
        /// Owner address
        #[arg(short, long)]
        owner: Address,

        /// Spender address
        #[arg(short, long)]
        spender: Address,
    },

    /// Display ledger information
    Info,

    /// List holders by balance
    Holders {
        /// Number of holders to show
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Generate a new key pair
    Keygen,

    /// Export ledger to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import ledger from file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Commands that don't need a stored ledger
    match &cli.command {
        Commands::Init {
            config,
            name,
            symbol,
            decimals,
            minter,
            holder,
            supply,
            force,
        } => {
            let config = match config {
                Some(path) => LedgerConfig::from_file(path)?,
                None => LedgerConfig {
                    decimals: *decimals,
                    minter: *minter,
                    initial_holder: *holder,
                    initial_supply: *supply,
                    ..LedgerConfig::new(
                        name.clone().unwrap_or_default(),
                        symbol.clone().unwrap_or_default(),
                    )
                },
            };
            return cli::cmd_init(&cli.data_dir, &config, *force);
        }
        Commands::Keygen => return cli::cmd_keygen(),
        _ => {}
    }

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } | Commands::Keygen => unreachable!(),

        Commands::Mint { caller, to, amount } => {
            cli::cmd_mint(&mut state, caller.resolve()?, to, amount)?;
        }

        Commands::Transfer { caller, to, amount } => {
            cli::cmd_transfer(&mut state, caller.resolve()?, to, amount)?;
        }

        Commands::Approve {
            caller,
            spender,
            amount,
        } => {
            cli::cmd_approve(&mut state, caller.resolve()?, spender, amount)?;
        }

        Commands::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => {
            cli::cmd_transfer_from(&mut state, caller.resolve()?, from, to, amount)?;
        }

        Commands::Balance { address } => {
            cli::cmd_balance(&state, address)?;
        }

        Commands::Allowance { owner, spender } => {
            cli::cmd_allowance(&state, owner, spender)?;
        }

        Commands::Info => {
            cli::cmd_info(&state)?;
        }

        Commands::Holders { count } => {
            cli::cmd_holders(&state, count)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }
    }

    Ok(())
}
