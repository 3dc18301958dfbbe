//! CLI commands for the ledger
//!
//! Each mutating command loads the stored ledger, applies one operation as
//! the given caller and saves the result.

use crate::config::LedgerConfig;
use crate::crypto::KeyPair;
use crate::ledger::{Address, LedgerCore, MintPolicy};
use crate::storage::{self, Storage, StorageConfig};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub ledger: LedgerCore,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(storage_config)?)
}

impl AppState {
    /// Load the existing ledger from `data_dir`
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage = open_storage(&data_dir)?;

        if !storage.exists() {
            return Err(format!(
                "No ledger found in {:?}. Create one with: ledger init",
                data_dir
            )
            .into());
        }

        let ledger = storage.load()?;

        Ok(Self {
            ledger,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.ledger)?;
        Ok(())
    }
}

/// Work out the caller from `--caller` or `--key`
pub fn resolve_caller(caller: Option<Address>, key: Option<&str>) -> CliResult<Address> {
    match (caller, key) {
        (_, Some(key)) => Ok(KeyPair::from_private_key_hex(key)?.address()),
        (Some(caller), None) => Ok(caller),
        (None, None) => {
            Err("Pass the caller with --caller <address> or --key <private key>".into())
        }
    }
}

/// Initialize a new ledger
pub fn cmd_init(data_dir: &Path, config: &LedgerConfig, force: bool) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() && !force {
        println!("⚠️  Ledger already exists at {:?}", data_dir);
        println!("   Use --force to reinitialize (this will replace existing data)");
        return Ok(());
    }

    let ledger = config.build()?;
    storage.save(&ledger)?;

    println!("✅ Ledger initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🪙 Token: {} ({})", ledger.name(), ledger.symbol());
    println!("   🔢 Decimals: {}", ledger.decimals());
    println!("   💰 Total supply: {}", ledger.total_supply());

    Ok(())
}

/// Mint new tokens
pub fn cmd_mint(state: &mut AppState, caller: Address, to: Address, amount: u128) -> CliResult<()> {
    state.ledger.mint(caller, to, amount)?;
    state.save()?;

    println!("✅ Minted {} {} to {}", amount, state.ledger.symbol(), to);
    println!("   Total supply: {}", state.ledger.total_supply());

    Ok(())
}

/// Transfer tokens from the caller
pub fn cmd_transfer(
    state: &mut AppState,
    caller: Address,
    to: Address,
    amount: u128,
) -> CliResult<()> {
    state.ledger.transfer(caller, to, amount)?;
    state.save()?;

    println!("📤 Transferred {} {}", amount, state.ledger.symbol());
    println!("   From: {} (now {})", caller, state.ledger.balance_of(caller));
    println!("   To:   {} (now {})", to, state.ledger.balance_of(to));

    Ok(())
}

/// Set an allowance for a spender
pub fn cmd_approve(
    state: &mut AppState,
    caller: Address,
    spender: Address,
    amount: u128,
) -> CliResult<()> {
    state.ledger.approve(caller, spender, amount);
    state.save()?;

    println!("✅ Allowance set");
    println!("   Owner:   {}", caller);
    println!("   Spender: {}", spender);
    println!("   Amount:  {}", amount);

    Ok(())
}

/// Transfer tokens on behalf of an owner
pub fn cmd_transfer_from(
    state: &mut AppState,
    caller: Address,
    owner: Address,
    to: Address,
    amount: u128,
) -> CliResult<()> {
    state.ledger.transfer_from(caller, owner, to, amount)?;
    state.save()?;

    println!("📤 Transferred {} {} on behalf of {}", amount, state.ledger.symbol(), owner);
    println!("   To: {} (now {})", to, state.ledger.balance_of(to));
    println!(
        "   Remaining allowance: {}",
        state.ledger.allowance(owner, caller)
    );

    Ok(())
}

/// Show an account balance
pub fn cmd_balance(state: &AppState, address: Address) -> CliResult<()> {
    println!("💰 Balance for {}", address);
    println!(
        "   {} {}",
        state.ledger.balance_of(address),
        state.ledger.symbol()
    );
    Ok(())
}

/// Show an allowance
pub fn cmd_allowance(state: &AppState, owner: Address, spender: Address) -> CliResult<()> {
    println!("🔓 Allowance of {} over {}", spender, owner);
    println!("   {} {}", state.ledger.allowance(owner, spender), state.ledger.symbol());
    Ok(())
}

/// Display ledger info
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    let ledger = &state.ledger;
    let minter = match ledger.mint_policy() {
        MintPolicy::Open => "anyone".to_string(),
        MintPolicy::Minter(address) => address.to_string(),
    };
    let stats = state.storage.stats()?;

    println!("🪙  Ledger Info");
    println!("   ├─ Name: {}", ledger.name());
    println!("   ├─ Symbol: {}", ledger.symbol());
    println!("   ├─ Decimals: {}", ledger.decimals());
    println!("   ├─ Total supply: {}", ledger.total_supply());
    println!("   ├─ Holders: {}", ledger.holder_count());
    println!("   ├─ Minter: {}", minter);
    println!("   ├─ Snapshot size: {} bytes", stats.file_size);
    println!("   └─ Backups: {}", stats.backup_count);

    Ok(())
}

/// List the largest holders
pub fn cmd_holders(state: &AppState, count: usize) -> CliResult<()> {
    let mut holders = state.ledger.holders();
    if holders.is_empty() {
        println!("📭 No holders yet. Mint with: ledger mint");
        return Ok(());
    }

    holders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!("📋 Holders ({}):", holders.len());
    for (address, balance) in holders.iter().take(count) {
        println!("   {} - {}", address, balance);
    }
    if holders.len() > count {
        println!("   ... and {} more", holders.len() - count);
    }

    Ok(())
}

/// Generate a key pair for signing calls
pub fn cmd_keygen() -> CliResult<()> {
    let key = KeyPair::generate();

    println!("🔐 New key pair");
    println!("   📍 Address: {}", key.address());
    println!("   🔑 Public key: {}", key.public_key_hex());
    println!("   🗝️  Private key: {}", key.private_key_hex());
    println!("\n   ⚠️  Anyone holding the private key can act as this address.");

    Ok(())
}

/// Export ledger to file
pub fn cmd_export(state: &AppState, path: &Path) -> CliResult<()> {
    storage::save_to_file(&state.ledger, path)?;
    println!("✅ Ledger exported to {:?}", path);
    Ok(())
}

/// Import ledger from file, replacing the stored one
pub fn cmd_import(state: &mut AppState, path: &Path) -> CliResult<()> {
    state.ledger = storage::load_from_file(path)?;
    state.save()?;

    println!("✅ Ledger imported from {:?}", path);
    println!("   Holders: {}", state.ledger.holder_count());
    println!("   Total supply: {}", state.ledger.total_supply());
    Ok(())
}
