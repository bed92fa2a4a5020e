//! pvault: PocketVault command-line interface
//!
//! Commands:
//!   add                 - store a new record
//!   list                - list records (filter by category/tag/search)
//!   show <id>           - display one record
//!   edit <id>           - replace fields of an existing record
//!   rm <id>             - delete a record
//!   gen                 - generate a password or passphrase
//!   categories ...      - list/show/add/remove categories
//!   stats               - vault statistics
//!
//! The identity secret is read from $PVAULT_SECRET or prompted; the session
//! key is re-derived on every invocation and never touches disk.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;

use pvault_core::config::VaultConfig;
use pvault_core::{FieldValue, Record};
use pvault_crypto::codec::OpenedRecord;
use pvault_crypto::kdf::{derive_key_with, DerivedKey};
use pvault_crypto::passgen::{self, PasswordOptions};
use pvault_schema::{CategoryRegistry, CategorySchema, FieldType};
use pvault_store::{
    vault_stats, AuditAction, AuditEvent, AuditSink, JsonFileBackend, RecordFilter, RecordStore,
    TracingAuditSink,
};

#[derive(Parser, Debug)]
#[command(
    name = "pvault",
    version,
    about = "PocketVault encrypted records vault",
    long_about = "pvault: store schema-typed records with per-field client-side encryption"
)]
struct Cli {
    /// Path to pvault.toml configuration file
    #[arg(long, short = 'c', env = "PVAULT_CONFIG", default_value = "pvault.toml")]
    config: PathBuf,

    /// Vault scope (user identifier)
    #[arg(long, short = 'u', env = "PVAULT_USER", default_value = "local")]
    user: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PVAULT_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "PVAULT_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a new record
    Add {
        /// Category id (see `pvault categories list`)
        #[arg(long, short = 'C')]
        category: String,
        /// Field values as name=value (repeatable)
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Tags (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
    },

    /// List records
    List {
        #[arg(long, short = 'C')]
        category: Option<String>,
        #[arg(long, short = 't')]
        tag: Option<String>,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive substring search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Display one record
    Show {
        id: String,
        /// Print sensitive values instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Replace fields of an existing record (full replace on disk)
    Edit {
        id: String,
        /// Field values as name=value (repeatable)
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Toggle the favorite flag
        #[arg(long)]
        favorite: Option<bool>,
    },

    /// Delete a record
    Rm { id: String },

    /// Generate a password or passphrase
    Gen {
        /// Password preset
        #[arg(long, short = 'p', default_value = "strong")]
        preset: Preset,
        /// Override the preset's length
        #[arg(long, short = 'l')]
        length: Option<usize>,
        /// Generate a word-based passphrase instead
        #[arg(long)]
        passphrase: bool,
        /// Word count for --passphrase
        #[arg(long, default_value_t = 4)]
        words: usize,
    },

    /// Category management
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Vault statistics
    Stats,
}

#[derive(Clone, Debug, ValueEnum)]
enum Preset {
    Strong,
    Memorable,
    Pin,
    Maximum,
}

#[derive(Subcommand, Debug)]
enum CategoryAction {
    /// List all categories (built-in and custom)
    List,
    /// Show a category's field schema
    Show { id: String },
    /// Register a custom category from a JSON definition
    Add {
        /// Path to a JSON file with {id, label, fields: [...]}
        file: PathBuf,
    },
    /// Remove a custom category
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log, &cli.log_format);

    let config = VaultConfig::load(&cli.config)?;
    let registry = CategoryRegistry::load(&config.storage.registry_path())?;

    match cli.command {
        Commands::Gen {
            preset,
            length,
            passphrase,
            words,
        } => cmd_gen(preset, length, passphrase, words),
        Commands::Categories { action } => cmd_categories(&config, registry, action),
        command => {
            let key = unlock(&config, &cli.user)?;
            let backend = JsonFileBackend::new(config.storage.vault_path());
            let mut store = RecordStore::new(backend, registry);
            if config.audit.enabled {
                store = store.with_audit(Arc::new(TracingAuditSink));
            }
            run_vault_command(&store, &cli.user, &key, command).await
        }
    }
}

async fn run_vault_command(
    store: &RecordStore<JsonFileBackend>,
    user: &str,
    key: &DerivedKey,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Add {
            category,
            fields,
            tags,
            favorite,
        } => {
            let schema = store
                .registry()
                .resolve(&category)
                .with_context(|| format!("unknown category {category:?}"))?;
            let mut record = Record::new(&category);
            for pair in &fields {
                let (name, value) = parse_field(schema, pair)?;
                record.fields.insert(name, value);
            }
            record.tags = tags.into_iter().collect();
            record.is_favorite = favorite;

            let id = store.create(user, record, key).await?;
            println!("created {id}");
        }

        Commands::List {
            category,
            tag,
            favorites,
            search,
        } => {
            let filter = RecordFilter {
                search,
                category,
                tag,
                only_favorites: favorites,
            };
            let opened = store.list(user, key).await?;
            let records: Vec<Record> = opened.iter().map(|o| o.record.clone()).collect();
            let degraded: BTreeSet<&str> = opened
                .iter()
                .filter(|o| o.is_degraded())
                .map(|o| o.record.id.as_str())
                .collect();

            for record in filter.apply(&records) {
                let marker = if record.is_favorite { "*" } else { " " };
                let warn = if degraded.contains(record.id.as_str()) {
                    " [degraded]"
                } else {
                    ""
                };
                println!(
                    "{marker} {}  {:<18} {}{warn}",
                    record.id,
                    record.category,
                    display_name(store.registry(), record)
                );
            }
        }

        Commands::Show { id, reveal } => {
            let opened = store.get(user, &id, key).await?;
            print_record(store.registry(), &opened, reveal);
        }

        Commands::Edit {
            id,
            fields,
            favorite,
        } => {
            let existing = store.get(user, &id, key).await?;
            if existing.is_degraded() {
                bail!("record {id} has undecryptable fields; editing would overwrite them");
            }
            let mut record = existing.record;
            let schema = store
                .registry()
                .resolve(&record.category)
                .with_context(|| format!("unknown category {:?}", record.category))?;
            for pair in &fields {
                let (name, value) = parse_field(schema, pair)?;
                record.fields.insert(name, value);
            }
            if let Some(favorite) = favorite {
                record.is_favorite = favorite;
            }

            store.update(user, &id, record, key).await?;
            println!("updated {id}");
        }

        Commands::Rm { id } => {
            store.delete(user, &id).await?;
            println!("deleted {id}");
        }

        Commands::Stats => {
            let opened = store.list(user, key).await?;
            let records: Vec<Record> = opened.into_iter().map(|o| o.record).collect();
            let stats = vault_stats(&records);
            println!("records:   {}", stats.total);
            println!("favorites: {}", stats.favorites);
            for (category, count) in &stats.by_category {
                println!("  {category:<20} {count}");
            }
        }

        Commands::Gen { .. } | Commands::Categories { .. } => unreachable!("handled in main"),
    }
    Ok(())
}

fn cmd_gen(preset: Preset, length: Option<usize>, passphrase: bool, words: usize) -> Result<()> {
    if passphrase {
        println!("{}", passgen::generate_passphrase(words, '-', true));
        return Ok(());
    }

    let mut options = match preset {
        Preset::Strong => PasswordOptions::strong(),
        Preset::Memorable => PasswordOptions::memorable(),
        Preset::Pin => PasswordOptions::pin(),
        Preset::Maximum => PasswordOptions::maximum(),
    };
    if let Some(length) = length {
        options.length = length;
    }

    let password = passgen::generate_password(&options)?;
    let bits = passgen::entropy_bits(&password);
    println!("{password}");
    eprintln!("~{bits:.0} bits of entropy");
    Ok(())
}

fn cmd_categories(
    config: &VaultConfig,
    mut registry: CategoryRegistry,
    action: CategoryAction,
) -> Result<()> {
    match action {
        CategoryAction::List => {
            let custom_ids: BTreeSet<String> =
                registry.custom().iter().map(|c| c.id.clone()).collect();
            for schema in registry.all() {
                let origin = if custom_ids.contains(&schema.id) {
                    "custom"
                } else {
                    "built-in"
                };
                println!("{:<20} {:<10} {}", schema.id, origin, schema.label);
            }
        }
        CategoryAction::Show { id } => {
            let schema = registry
                .resolve(&id)
                .with_context(|| format!("unknown category {id:?}"))?;
            println!("{}: {}", schema.id, schema.label);
            for field in &schema.fields {
                let mut notes = Vec::new();
                if field.required {
                    notes.push("required");
                }
                if field.sensitive {
                    notes.push("sensitive");
                }
                println!(
                    "  {:<20} {:<10} {}",
                    field.name,
                    type_name(field.value_type),
                    notes.join(", ")
                );
            }
        }
        CategoryAction::Add { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let schema: CategorySchema = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", file.display()))?;
            let id = schema.id.clone();
            registry.register(schema)?;
            registry.save(&config.storage.registry_path())?;
            println!("registered {id}");
        }
        CategoryAction::Rm { id } => {
            registry.remove_custom(&id)?;
            registry.save(&config.storage.registry_path())?;
            println!("removed {id}");
        }
    }
    Ok(())
}

/// Derive the session key from the identity secret and the configured salt.
fn unlock(config: &VaultConfig, user: &str) -> Result<DerivedKey> {
    let secret = match std::env::var("PVAULT_SECRET") {
        Ok(secret) => SecretString::from(secret),
        Err(_) => SecretString::from(
            rpassword::prompt_password("identity secret: ").context("reading identity secret")?,
        ),
    };
    let key = derive_key_with(
        &secret,
        &config.crypto.salt,
        config.crypto.pbkdf2_iterations,
    );
    if config.audit.enabled {
        TracingAuditSink.record(AuditEvent::new(user, AuditAction::Login, None));
    }
    Ok(key)
}

/// Parse a `name=value` pair, typed per the category schema.
fn parse_field(schema: &CategorySchema, pair: &str) -> Result<(String, FieldValue)> {
    let Some((name, raw)) = pair.split_once('=') else {
        bail!("field {pair:?} is not in name=value form");
    };
    let value = match schema.field(name).map(|f| f.value_type) {
        Some(FieldType::Date) => {
            let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("field {name:?} expects a YYYY-MM-DD date"))?;
            FieldValue::Date(date)
        }
        // Unknown names pass through as text; the store rejects them with
        // a proper validation error.
        _ => FieldValue::text(raw),
    };
    Ok((name.to_string(), value))
}

/// Best display handle for a record: the first non-sensitive, non-empty
/// field in schema order, falling back to the id.
fn display_name(registry: &CategoryRegistry, record: &Record) -> String {
    registry
        .resolve(&record.category)
        .and_then(|schema| {
            schema
                .fields
                .iter()
                .filter(|f| !f.sensitive)
                .find_map(|f| record.rendered(&f.name))
        })
        .unwrap_or_else(|| record.id.clone())
}

fn print_record(registry: &CategoryRegistry, opened: &OpenedRecord, reveal: bool) {
    let record = &opened.record;
    println!("id:        {}", record.id);
    println!("category:  {}", record.category);
    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        println!("tags:      {}", tags.join(", "));
    }
    if record.is_favorite {
        println!("favorite:  yes");
    }
    if let Some(at) = record.updated_at {
        println!("updated:   {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    let schema = registry.resolve(&record.category);
    let specs: Vec<_> = schema.map(|s| s.fields.clone()).unwrap_or_default();
    for spec in &specs {
        let Some(value) = record.rendered(&spec.name) else {
            continue;
        };
        let shown = if spec.sensitive && !reveal && !opened.errors.contains_key(&spec.name) {
            "••••••••".to_string()
        } else {
            value
        };
        println!("  {:<20} {shown}", spec.label);
    }
    // Fields the schema doesn't know (e.g. written by a newer version).
    for (name, value) in &record.fields {
        if specs.iter().all(|s| &s.name != name) {
            println!("  {name:<20} {}", value.render());
        }
    }

    for (field, error) in &opened.errors {
        eprintln!("warning: field {field:?} could not be decrypted: {error}");
    }
}

fn type_name(value_type: FieldType) -> &'static str {
    match value_type {
        FieldType::Text => "text",
        FieldType::Password => "password",
        FieldType::Date => "date",
        FieldType::LongText => "longtext",
    }
}

fn init_tracing(level: &str, format: &LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
