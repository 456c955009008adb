//! All My Web operator CLI
//!
//! Manages a user script store on disk and previews what a browser session
//! would do with it: which scripts get registered, with which patterns and
//! timing, and which scripts apply to a given URL.

use all_my_web::coordinator::synchronizer;
use all_my_web::host::{InMemoryHost, UserScriptHost};
use all_my_web::llm::LlmClient;
use all_my_web::matcher::registration_matches_url;
use all_my_web::models::{LlmSettings, PageContext, ScriptEdit};
use all_my_web::parser::is_valid_match_pattern;
use all_my_web::repository::{ScriptRepository, SettingsStore};
use all_my_web::storage::JsonFileStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "amw")]
#[command(about = "Manage user scripts and preview their registration", long_about = None)]
#[command(version)]
struct Cli {
    /// Path of the JSON store holding scripts and settings
    #[arg(long, global = true, default_value = "amw.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all scripts with their parsed directives
    List,

    /// Create a new script
    Add {
        /// Name for the new script
        #[arg(short, long)]
        name: Option<String>,

        /// File to read the script body from
        #[arg(short, long)]
        body: Option<PathBuf>,
    },

    /// Edit an existing script
    Edit {
        id: u32,

        #[arg(short, long)]
        name: Option<String>,

        /// Requirement text the body was generated from
        #[arg(short, long)]
        requirement: Option<String>,

        /// File to read the new body from
        #[arg(short, long)]
        body: Option<PathBuf>,
    },

    /// Delete a script
    Rm {
        id: u32,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Toggle a script's paused state
    Pause { id: u32 },

    /// Validate a match pattern
    Check { pattern: String },

    /// Show which active scripts apply to a URL
    Match { url: String },

    /// Preview the registration set a browser session would push
    Sync,

    /// Show or update LLM settings
    Settings {
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        api_base: Option<String>,

        #[arg(long)]
        model: Option<String>,
    },

    /// Generate a script body from a requirement via the configured LLM
    Generate {
        requirement: String,

        /// URL of the page the script is for
        #[arg(long)]
        url: Option<String>,

        /// Title of the page the script is for
        #[arg(long)]
        title: Option<String>,

        /// Store the generated body as a new script
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = Arc::new(
        JsonFileStore::open(&cli.store)
            .with_context(|| format!("failed to open store {}", cli.store.display()))?,
    );
    let mut repository = ScriptRepository::new(store.clone());
    repository.load()?;

    match cli.command {
        Commands::List => list(&repository),

        Commands::Add { name, body } => {
            let script = repository.create()?;
            let edit = ScriptEdit {
                name,
                body: read_body(body)?,
                ..Default::default()
            };
            repository.update(script.id, &edit)?;
            let name = repository
                .get(script.id)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            println!("{}", format!("Created script {} ({})", script.id, name).green());
            Ok(())
        }

        Commands::Edit {
            id,
            name,
            requirement,
            body,
        } => {
            let edit = ScriptEdit {
                name,
                requirement,
                body: read_body(body)?,
            };
            repository.update(id, &edit)?;
            println!("{}", format!("Updated script {}", id).green());
            Ok(())
        }

        Commands::Rm { id, yes } => {
            let name = repository
                .get(id)
                .map(|s| s.name.clone())
                .with_context(|| format!("no script with id {}", id))?;
            if !yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete script {} ({})?", id, name))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            repository.delete(id)?;
            println!("{}", format!("Deleted script {}", id).green());
            Ok(())
        }

        Commands::Pause { id } => {
            let paused = repository.toggle_pause(id)?;
            let state = if paused { "paused" } else { "active" };
            println!("{}", format!("Script {} is now {}", id, state).green());
            Ok(())
        }

        Commands::Check { pattern } => {
            if is_valid_match_pattern(&pattern) {
                println!("{}", format!("{} is a valid match pattern", pattern).green());
            } else {
                println!("{}", format!("{} is not a valid match pattern", pattern).red());
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Match { url } => match_url(&repository, &url),

        Commands::Sync => sync_preview(&repository),

        Commands::Settings {
            api_key,
            api_base,
            model,
        } => settings(&SettingsStore::new(store), api_key, api_base, model),

        Commands::Generate {
            requirement,
            url,
            title,
            save,
        } => generate(&mut repository, &SettingsStore::new(store.clone()), requirement, url, title, save),
    }
}

fn list(repository: &ScriptRepository) -> Result<()> {
    if repository.scripts().is_empty() {
        println!("No scripts. Create one with `amw add`.");
        return Ok(());
    }

    println!("{}", "Scripts".bold().blue());
    println!("{}", "=".repeat(50).blue());
    for script in repository.scripts() {
        let state = if script.is_paused {
            "paused".yellow()
        } else {
            "active".green()
        };
        println!("{} [{}] {}", script.id, state, script.name.bold());
        let patterns = all_my_web::extract_match_patterns(&script.body);
        println!("    matches: {}", patterns.join(", "));
        println!(
            "    run-at:  {}",
            all_my_web::extract_run_at(&script.body).as_str()
        );
    }
    Ok(())
}

fn match_url(repository: &ScriptRepository, url: &str) -> Result<()> {
    let registered = synchronizer::desired_set(repository.scripts());
    let matching: Vec<_> = registered
        .iter()
        .filter(|r| registration_matches_url(r, url))
        .collect();

    println!(
        "{} active scripts match {}",
        matching.len().to_string().bold(),
        url
    );
    for registration in matching {
        println!("  - {} ({})", registration.id, registration.matches.join(", "));
    }
    Ok(())
}

fn sync_preview(repository: &ScriptRepository) -> Result<()> {
    let host = InMemoryHost::new();
    synchronizer::synchronize(&all_my_web::Capability::Available, repository, &host)?;

    let registered = host.registered_scripts()?;
    println!(
        "{}",
        format!("Registration set ({} entries)", registered.len())
            .bold()
            .blue()
    );
    for registration in registered {
        println!(
            "  {} [{}] {}",
            registration.id.bold(),
            registration.run_at.as_str(),
            registration.matches.join(", ")
        );
    }
    Ok(())
}

fn settings(
    store: &SettingsStore,
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let mut settings = store.load()?;

    if api_key.is_none() && api_base.is_none() && model.is_none() {
        let key = if settings.api_key.is_empty() {
            "(unset)".to_string()
        } else {
            format!("{}...", settings.api_key.chars().take(6).collect::<String>())
        };
        println!("api_key:  {}", key);
        println!("api_base: {}", settings.api_base);
        println!("model:    {}", settings.model);
        return Ok(());
    }

    if let Some(api_key) = api_key {
        settings.api_key = api_key;
    }
    if let Some(api_base) = api_base {
        settings.api_base = api_base;
    }
    if let Some(model) = model {
        settings.model = model;
    }
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid settings: {}", e))?;
    store.save(&settings)?;
    println!("{}", "Settings saved".green());
    Ok(())
}

fn generate(
    repository: &mut ScriptRepository,
    settings_store: &SettingsStore,
    requirement: String,
    url: Option<String>,
    title: Option<String>,
    save: bool,
) -> Result<()> {
    let settings: LlmSettings = settings_store.load()?;
    let client = LlmClient::new(settings)?;
    let page = url.map(|url| PageContext {
        url,
        title: title.unwrap_or_default(),
        selection: None,
    });

    println!("{}", "Generating script...".bold().blue());
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize async runtime")?;
    let body = runtime.block_on(client.generate_script(&requirement, page.as_ref()))?;

    println!("{}", body);

    if save {
        let script = repository.create()?;
        let edit = ScriptEdit {
            name: Some(requirement.chars().take(40).collect()),
            requirement: Some(requirement),
            body: Some(body),
        };
        repository.update(script.id, &edit)?;
        println!();
        println!("{}", format!("Saved as script {}", script.id).green());
    }
    Ok(())
}

fn read_body(path: Option<PathBuf>) -> Result<Option<String>> {
    match path {
        Some(path) => {
            let body = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Some(body))
        }
        None => Ok(None),
    }
}
