//! CLI command implementations

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cardvault_core::{
    CardMeta, CardRecord, CardSecrets, CardType, DocumentMeta, DocumentRecord, DocumentSecrets,
    DocumentType, Issuer, OwnerId, Pin, RecordId,
};
use cardvault_store::{StoreClient, StoreConfig};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::output;
use crate::reveal;

/// Card Vault - PIN-protected storage for payment cards and identity documents
#[derive(Parser)]
#[command(name = "cardvault")]
#[command(about = "PIN-protected vault for payment cards and identity documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to $CARDVAULT_CONFIG or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this user instead of the configured owner
    #[arg(long, global = true)]
    pub owner: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a payment card
    AddCard {
        /// Card name, e.g. "Groceries"
        #[arg(long)]
        name: String,

        /// Card number (13-16 digits)
        #[arg(long)]
        number: String,

        /// Expiry as MMYY
        #[arg(long)]
        expiry: String,

        /// CVV (3-4 digits)
        #[arg(long)]
        cvv: Option<String>,

        /// 4-digit PIN guarding the card; prompted for when omitted
        #[arg(long)]
        pin: Option<String>,

        /// 4-digit ATM PIN
        #[arg(long)]
        atm_pin: Option<String>,

        #[arg(long)]
        bank: Option<String>,

        #[arg(long)]
        holder: Option<String>,

        #[arg(long, default_value = "credit")]
        card_type: CardType,

        #[arg(long, default_value = "other")]
        issuer: Issuer,
    },

    /// Store an identity document
    AddDocument {
        #[arg(long)]
        name: String,

        #[arg(long)]
        number: String,

        #[arg(long = "type", default_value = "other")]
        document_type: DocumentType,

        #[arg(long)]
        holder: Option<String>,

        #[arg(long)]
        issue_date: Option<String>,

        #[arg(long)]
        expiry_date: Option<String>,

        #[arg(long)]
        authority: Option<String>,

        /// Optional 4-digit PIN guarding the document
        #[arg(long)]
        pin: Option<String>,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List stored records with sensitive fields masked
    List {
        /// Only cards
        #[arg(long, conflicts_with = "documents")]
        cards: bool,

        /// Only documents
        #[arg(long)]
        documents: bool,
    },

    /// Enter a record's PIN to reveal its sensitive fields
    Reveal {
        /// Record ID or a unique prefix of it
        id: String,
    },

    /// Delete a record
    Delete {
        /// Record ID or a unique prefix of it
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete every record of the current user
    DeleteAll {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Card statistics and categories
    Stats,

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the current profile
    Show,

    /// Set the display name; omit to clear it
    SetName { name: Option<String> },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Run the CLI
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(StoreConfig::default_path);

    if let Commands::Config(cmd) = &cli.command {
        return handle_config_command(cmd, &config_path, cli.owner.as_deref());
    }

    let config = load_config(&config_path, cli.owner.as_deref())?;
    let mut client = StoreClient::open(config)
        .await
        .context("Failed to open vault")?;
    if client.session().is_err() {
        bail!(
            "No user signed in. Pass --owner, set CARDVAULT_OWNER or set \"owner\" in {}",
            config_path.display()
        );
    }

    let result = dispatch(&client, cli.command).await;
    client.close();
    result
}

async fn dispatch(client: &StoreClient, command: Commands) -> Result<()> {
    match command {
        Commands::AddCard {
            name,
            number,
            expiry,
            cvv,
            pin,
            atm_pin,
            bank,
            holder,
            card_type,
            issuer,
        } => {
            let pin = match pin {
                Some(pin) => pin,
                None => prompt("Card PIN (4 digits): ")?,
            };
            let card = CardRecord::new(
                CardMeta {
                    card_name: name,
                    bank_name: non_empty(bank),
                    card_holder_name: non_empty(holder),
                    card_type,
                    issuer,
                },
                CardSecrets {
                    card_number: number.chars().filter(|c| !c.is_whitespace()).collect(),
                    expiry: expiry.replace('/', ""),
                    cvv: cvv.unwrap_or_default(),
                    pin: Pin::new(pin)?,
                    atm_pin: non_empty(atm_pin).map(Pin::new).transpose()?,
                },
            )?;
            let stored = client.add(card).await?;
            println!("✓ Card saved");
            println!("  ID: {}", stored.id);
        }

        Commands::AddDocument {
            name,
            number,
            document_type,
            holder,
            issue_date,
            expiry_date,
            authority,
            pin,
            notes,
        } => {
            let document = DocumentRecord::new(
                DocumentMeta {
                    document_name: name,
                    document_type,
                    holder_name: non_empty(holder),
                    issue_date: non_empty(issue_date),
                    expiry_date: non_empty(expiry_date),
                    issuing_authority: non_empty(authority),
                    has_pin: false,
                },
                DocumentSecrets {
                    document_number: number,
                    pin: non_empty(pin).map(Pin::new).transpose()?,
                    additional_info: non_empty(notes),
                },
            )?;
            let stored = client.add(document).await?;
            println!("✓ Document saved");
            println!("  ID: {}", stored.id);
        }

        Commands::List { cards, documents } => {
            let records = if cards {
                client.cards().await?
            } else if documents {
                client.documents().await?
            } else {
                client.list().await?
            };
            if records.is_empty() {
                println!("No records yet");
            }
            for stored in &records {
                output::print_summary(stored);
            }
        }

        Commands::Reveal { id } => {
            let id = resolve_id(client, &id).await?;
            reveal::run(client, id).await?;
        }

        Commands::Delete { id, yes } => {
            let id = resolve_id(client, &id).await?;
            let stored = client.get(id).await?;
            if !yes && !confirm(&format!("Delete \"{}\"? [y/N] ", stored.record.name()))? {
                println!("Cancelled");
                return Ok(());
            }
            client.delete(id).await?;
            output::print_notice(&cardvault_core::notice::deleted(stored.record.kind()));
        }

        Commands::DeleteAll { yes } => {
            if !yes {
                bail!("Refusing to delete every record without --yes");
            }
            let removed = client.delete_all().await?;
            println!("✓ Deleted {} records", removed);
        }

        Commands::Stats => {
            let today = chrono::Local::now().date_naive();
            let stats = client.stats(today).await?;
            output::print_stats(&stats);
        }

        Commands::Profile(ProfileCommands::Show) => {
            let profile = client.profile().await?;
            println!("Profile:");
            println!("  User: {}", profile.owner);
            println!("  Email: {}", profile.email.as_deref().unwrap_or("-"));
            println!(
                "  Display name: {}",
                profile.display_name.as_deref().unwrap_or("-")
            );
        }

        Commands::Profile(ProfileCommands::SetName { name }) => {
            let profile = client.set_display_name(name).await?;
            match profile.display_name {
                Some(name) => println!("✓ Display name set to {}", name),
                None => println!("✓ Display name cleared"),
            }
        }

        Commands::Config(_) => bail!("Config commands run without opening the vault"),
    }
    Ok(())
}

fn handle_config_command(
    cmd: &ConfigCommands,
    path: &std::path::Path,
    owner: Option<&str>,
) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            let mut config = StoreConfig::default();
            if let Some(owner) = owner {
                config.owner = Some(OwnerId::new(owner)?);
            }
            config.save(path)?;
            println!("✓ Wrote {}", path.display());
        }
        ConfigCommands::Show => {
            let config = load_config(path, owner)?;
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Load or create the config file, then apply overrides
fn load_config(path: &std::path::Path, owner: Option<&str>) -> Result<StoreConfig> {
    let (mut config, fresh) = StoreConfig::load_or_default(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if fresh {
        config.save(path)?;
        info!("Created default config at {:?}", path);
    }
    config.apply_env()?;
    if let Some(owner) = owner {
        config.owner = Some(OwnerId::new(owner)?);
    }
    Ok(config)
}

/// Accept a full record ID or a prefix matching exactly one record
async fn resolve_id(client: &StoreClient, input: &str) -> Result<RecordId> {
    if let Ok(id) = input.parse::<RecordId>() {
        return Ok(id);
    }
    let prefix = input.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("Empty record ID");
    }
    let matches: Vec<RecordId> = client
        .list()
        .await?
        .iter()
        .map(|r| r.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("No record matches {}", input),
        _ => bail!("{} matches {} records, use more characters", input, matches.len()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(message: &str) -> Result<bool> {
    let answer = prompt(message)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
