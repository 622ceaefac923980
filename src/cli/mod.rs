use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::application::SupplyChainLedger;
use crate::config::{Overrides, Settings};
use crate::domain::{Principal, RecordId};
use crate::error::LedgerError;

/// Clearway - supply-chain record ledgers
#[derive(Parser)]
#[command(name = "clearway")]
#[command(
    about = "Authorization-gated ledgers for customs documents, insurance claims, shipments and tokenized assets"
)]
#[command(version)]
pub struct Cli {
    /// Database file path [default: clearway.db]
    #[arg(short, long, global = true, env = "CLEARWAY_DATABASE")]
    pub database: Option<String>,

    /// Principal acting on the ledger
    #[arg(long = "as", global = true, env = "CLEARWAY_PRINCIPAL")]
    pub principal: Option<String>,

    /// Configuration file (TOML) [default: ./clearway.toml if present]
    #[arg(short, long, global = true, env = "CLEARWAY_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Customs clearance documents
    #[command(subcommand)]
    Document(DocumentCommands),

    /// Insurance claims
    #[command(subcommand)]
    Claim(ClaimCommands),

    /// Shipment tracking
    #[command(subcommand)]
    Shipment(ShipmentCommands),

    /// Tokenized asset ownership
    #[command(subcommand)]
    Asset(AssetCommands),

    /// Verify id sequences and asset supply conservation
    Check,
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Submit a document as shipper
    Submit {
        /// Document contents
        contents: String,

        /// Principal that must approve the document
        #[arg(long)]
        recipient: String,

        /// Place of origin
        #[arg(long)]
        origin: String,

        /// Destination
        #[arg(long)]
        destination: String,
    },

    /// Approve a document (recipient only)
    Approve {
        /// Document ID
        id: RecordId,
    },

    /// Show a document
    Show {
        /// Document ID
        id: RecordId,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all documents
    List,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Resolution {
    Approve,
    Reject,
}

#[derive(Subcommand)]
pub enum ClaimCommands {
    /// File a claim against a shipment
    File {
        /// Description of the damage or loss
        description: String,

        /// Shipment ID the claim refers to
        #[arg(long)]
        shipment: RecordId,

        /// Claimed amount
        #[arg(short, long)]
        amount: i64,
    },

    /// Approve or reject a claim (claimant only)
    Resolve {
        /// Claim ID
        id: RecordId,

        /// Outcome
        #[arg(value_enum)]
        resolution: Resolution,
    },

    /// Show a claim
    Show {
        /// Claim ID
        id: RecordId,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all claims
    List,
}

#[derive(Subcommand)]
pub enum ShipmentCommands {
    /// Register a shipment as its owner
    Create {
        /// Carrier tracking number
        tracking_number: String,
    },

    /// Post a status and location update (owner only)
    Update {
        /// Shipment ID
        id: RecordId,

        /// New status (e.g., "in-transit")
        #[arg(short, long)]
        status: String,

        /// New location
        #[arg(short, long)]
        location: String,
    },

    /// Show a shipment
    Show {
        /// Shipment ID
        id: RecordId,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all shipments
    List,
}

#[derive(Subcommand)]
pub enum AssetCommands {
    /// Create an asset; its whole supply is credited to you
    Create {
        /// Asset name
        name: String,

        /// Asset type (e.g., "container")
        #[arg(short = 't', long = "type")]
        asset_type: String,

        /// Total supply
        #[arg(short, long)]
        supply: i64,
    },

    /// Transfer units of an asset to another owner
    Transfer {
        /// Asset ID
        asset: RecordId,

        /// Recipient principal
        #[arg(long)]
        to: String,

        /// Amount to transfer
        #[arg(short, long)]
        amount: i64,
    },

    /// Show an asset
    Show {
        /// Asset ID
        id: RecordId,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an owner's balance (defaults to the acting principal)
    Balance {
        /// Asset ID
        asset: RecordId,

        /// Owner principal
        owner: Option<String>,
    },

    /// List owners of an asset
    Holders {
        /// Asset ID
        asset: RecordId,
    },

    /// List all assets
    List,
}

impl Cli {
    pub fn settings(&self) -> Result<Settings> {
        let overrides = Overrides {
            database: self.database.clone(),
            principal: self.principal.clone(),
            verbose: self.verbose,
        };
        Settings::load(self.config.as_deref(), &overrides)
    }

    pub async fn run(self, settings: Settings) -> Result<()> {
        self.dispatch(settings).await.map_err(|err| {
            match err.downcast::<LedgerError>() {
                Ok(ledger_err) => anyhow::anyhow!("[{}] {}", ledger_err.code(), ledger_err),
                Err(err) => err,
            }
        })
    }

    async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Init => {
                SupplyChainLedger::init(&settings.database).await?;
                println!("Database initialized: {}", settings.database);
            }

            Commands::Document(cmd) => {
                let ledger = SupplyChainLedger::connect(&settings.database).await?;
                run_document_command(&ledger, &settings, cmd).await?;
            }

            Commands::Claim(cmd) => {
                let ledger = SupplyChainLedger::connect(&settings.database).await?;
                run_claim_command(&ledger, &settings, cmd).await?;
            }

            Commands::Shipment(cmd) => {
                let ledger = SupplyChainLedger::connect(&settings.database).await?;
                run_shipment_command(&ledger, &settings, cmd).await?;
            }

            Commands::Asset(cmd) => {
                let ledger = SupplyChainLedger::connect(&settings.database).await?;
                run_asset_command(&ledger, &settings, cmd).await?;
            }

            Commands::Check => {
                let ledger = SupplyChainLedger::connect(&settings.database).await?;
                run_check_command(&ledger).await?;
            }
        }

        Ok(())
    }
}

async fn run_document_command(
    ledger: &SupplyChainLedger,
    settings: &Settings,
    cmd: DocumentCommands,
) -> Result<()> {
    match cmd {
        DocumentCommands::Submit {
            contents,
            recipient,
            origin,
            destination,
        } => {
            let caller = settings.require_principal()?;
            let recipient = parse_principal(&recipient)?;
            let id = ledger
                .documents
                .submit_document(caller, contents, origin, destination, recipient)
                .await?;
            println!("Submitted document {}", id);
        }

        DocumentCommands::Approve { id } => {
            let caller = settings.require_principal()?;
            ledger.documents.approve_document(caller, id).await?;
            println!("Approved document {}", id);
        }

        DocumentCommands::Show { id, json } => {
            let document = ledger.documents.get_document(id).await?;
            if json {
                print_json(&document)?;
            } else {
                println!("Document: {}", id);
                println!("  Shipper:     {}", document.shipper);
                println!("  Recipient:   {}", document.recipient);
                println!("  Origin:      {}", document.origin);
                println!("  Destination: {}", document.destination);
                println!("  Status:      {}", document.status);
                println!("  Contents:    {}", document.contents);
            }
        }

        DocumentCommands::List => {
            let documents = ledger.documents.list_documents().await?;
            if documents.is_empty() {
                println!("No documents found.");
            } else {
                println!(
                    "{:>6} {:<20} {:<20} {:<16} {:<16} {:<10}",
                    "ID", "SHIPPER", "RECIPIENT", "ORIGIN", "DESTINATION", "STATUS"
                );
                println!("{}", "-".repeat(93));
                for (id, doc) in documents {
                    println!(
                        "{:>6} {:<20} {:<20} {:<16} {:<16} {:<10}",
                        id,
                        truncate(doc.shipper.as_str(), 20),
                        truncate(doc.recipient.as_str(), 20),
                        truncate(&doc.origin, 16),
                        truncate(&doc.destination, 16),
                        doc.status
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_claim_command(
    ledger: &SupplyChainLedger,
    settings: &Settings,
    cmd: ClaimCommands,
) -> Result<()> {
    match cmd {
        ClaimCommands::File {
            description,
            shipment,
            amount,
        } => {
            let caller = settings.require_principal()?;
            let id = ledger
                .claims
                .file_claim(caller, shipment, amount, description)
                .await?;
            println!("Filed claim {} for shipment {}", id, shipment);
        }

        ClaimCommands::Resolve { id, resolution } => {
            let caller = settings.require_principal()?;
            let approved = matches!(resolution, Resolution::Approve);
            ledger.claims.resolve_claim(caller, id, approved).await?;
            println!(
                "Claim {} {}",
                id,
                if approved { "approved" } else { "rejected" }
            );
        }

        ClaimCommands::Show { id, json } => {
            let claim = ledger.claims.get_claim(id).await?;
            if json {
                print_json(&claim)?;
            } else {
                println!("Claim: {}", id);
                println!("  Claimant:    {}", claim.claimant);
                println!("  Shipment:    {}", claim.shipment_id);
                println!("  Amount:      {}", claim.amount);
                println!("  Status:      {}", claim.status);
                println!("  Description: {}", claim.description);
            }
        }

        ClaimCommands::List => {
            let claims = ledger.claims.list_claims().await?;
            if claims.is_empty() {
                println!("No claims found.");
            } else {
                println!(
                    "{:>6} {:<20} {:>8} {:>12} {:<10} {:<30}",
                    "ID", "CLAIMANT", "SHIPMENT", "AMOUNT", "STATUS", "DESCRIPTION"
                );
                println!("{}", "-".repeat(91));
                for (id, claim) in claims {
                    println!(
                        "{:>6} {:<20} {:>8} {:>12} {:<10} {:<30}",
                        id,
                        truncate(claim.claimant.as_str(), 20),
                        claim.shipment_id,
                        claim.amount,
                        claim.status,
                        truncate(&claim.description, 30)
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_shipment_command(
    ledger: &SupplyChainLedger,
    settings: &Settings,
    cmd: ShipmentCommands,
) -> Result<()> {
    match cmd {
        ShipmentCommands::Create { tracking_number } => {
            let caller = settings.require_principal()?;
            let id = ledger
                .shipments
                .create_shipment(caller, tracking_number.clone())
                .await?;
            println!("Created shipment {} ({})", id, tracking_number);
        }

        ShipmentCommands::Update {
            id,
            status,
            location,
        } => {
            let caller = settings.require_principal()?;
            ledger
                .shipments
                .update_shipment(caller, id, status.clone(), location.clone())
                .await?;
            println!("Shipment {}: {} at {}", id, status, location);
        }

        ShipmentCommands::Show { id, json } => {
            let shipment = ledger.shipments.get_shipment(id).await?;
            if json {
                print_json(&shipment)?;
            } else {
                println!("Shipment: {}", id);
                println!("  Owner:        {}", shipment.owner);
                println!("  Tracking:     {}", shipment.tracking_number);
                println!("  Status:       {}", shipment.status);
                println!("  Location:     {}", shipment.location);
                println!("  Last updated: {}", format_tick(shipment.last_updated));
            }
        }

        ShipmentCommands::List => {
            let shipments = ledger.shipments.list_shipments().await?;
            if shipments.is_empty() {
                println!("No shipments found.");
            } else {
                println!(
                    "{:>6} {:<16} {:<20} {:<14} {:<20}",
                    "ID", "TRACKING", "OWNER", "STATUS", "LOCATION"
                );
                println!("{}", "-".repeat(80));
                for (id, shipment) in shipments {
                    println!(
                        "{:>6} {:<16} {:<20} {:<14} {:<20}",
                        id,
                        truncate(&shipment.tracking_number, 16),
                        truncate(shipment.owner.as_str(), 20),
                        truncate(&shipment.status, 14),
                        truncate(&shipment.location, 20)
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_asset_command(
    ledger: &SupplyChainLedger,
    settings: &Settings,
    cmd: AssetCommands,
) -> Result<()> {
    match cmd {
        AssetCommands::Create {
            name,
            asset_type,
            supply,
        } => {
            let caller = settings.require_principal()?;
            let id = ledger
                .ownership
                .create_asset(caller, name.clone(), asset_type, supply)
                .await?;
            println!("Created asset {} '{}' with supply {}", id, name, supply);
        }

        AssetCommands::Transfer { asset, to, amount } => {
            let caller = settings.require_principal()?;
            let recipient = parse_principal(&to)?;
            let asset = ledger.ownership.asset(asset);
            asset.transfer_ownership(caller, &recipient, amount).await?;
            println!(
                "Transferred {} of asset {}: {} -> {}",
                amount,
                asset.id(),
                caller,
                recipient
            );
        }

        AssetCommands::Show { id, json } => {
            let asset = ledger.ownership.get_asset(id).await?;
            if json {
                print_json(&asset)?;
            } else {
                println!("Asset: {}", id);
                println!("  Name:         {}", asset.name);
                println!("  Type:         {}", asset.asset_type);
                println!("  Total supply: {}", asset.total_supply);
            }
        }

        AssetCommands::Balance { asset, owner } => {
            let owner = match owner {
                Some(owner) => parse_principal(&owner)?,
                None => settings.require_principal()?.clone(),
            };
            let balance = ledger.ownership.asset(asset).get_balance(&owner).await?;
            println!("{}", balance);
        }

        AssetCommands::Holders { asset } => {
            let holders = ledger.ownership.asset(asset).holders().await?;
            if holders.is_empty() {
                println!("No holders.");
            } else {
                println!("{:<44} {:>14}", "OWNER", "BALANCE");
                println!("{}", "-".repeat(59));
                for (owner, amount) in holders {
                    println!("{:<44} {:>14}", owner, amount);
                }
            }
        }

        AssetCommands::List => {
            let assets = ledger.ownership.list_assets().await?;
            if assets.is_empty() {
                println!("No assets found.");
            } else {
                println!("{:>6} {:<30} {:<14} {:>14}", "ID", "NAME", "TYPE", "SUPPLY");
                println!("{}", "-".repeat(67));
                for (id, asset) in assets {
                    println!(
                        "{:>6} {:<30} {:<14} {:>14}",
                        id,
                        truncate(&asset.name, 30),
                        truncate(&asset.asset_type, 14),
                        asset.total_supply
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_check_command(ledger: &SupplyChainLedger) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = ledger.check_integrity().await?;

    println!("Stores:");
    for store in &report.stores {
        println!(
            "  {:<12} {:>6} records  {}",
            format!("{}:", store.store),
            store.record_count,
            if store.is_contiguous() { "OK" } else { "GAPS!" }
        );
    }
    println!();

    if !report.assets.is_empty() {
        println!("Asset supply:");
        for asset in &report.assets {
            println!(
                "  #{:<5} {:<24} supply {:>12}  held {:>12}  {}",
                asset.asset_id,
                truncate(&asset.name, 24),
                asset.total_supply,
                asset
                    .balance_sum
                    .map_or_else(|| "overflow".to_string(), |sum| sum.to_string()),
                if asset.is_conserved() {
                    "OK"
                } else {
                    "UNBALANCED!"
                }
            );
        }
        println!();
    }

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}

fn parse_principal(s: &str) -> Result<Principal> {
    s.parse()
        .with_context(|| format!("Invalid principal '{}'", s))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a clock tick; wall-clock seconds are also shown as a UTC date.
fn format_tick(tick: i64) -> String {
    match chrono::DateTime::from_timestamp(tick, 0) {
        Some(dt) if tick > 0 => format!("{} ({})", tick, dt.format("%Y-%m-%d %H:%M:%S")),
        _ => tick.to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
