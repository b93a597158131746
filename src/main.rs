use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use yaml_patcher::workflow::{plan_remote, write_planned, UpdateOutcome, UpdateRequest};
use yaml_patcher::{ActionInputs, EditResult, GitHubStore, KeyPath, YamlEditor, YamlPlan};

#[derive(Parser)]
#[command(name = "yaml-patcher")]
#[command(about = "Rewrite one value in a YAML file by dotted key path", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update a value in a file on GitHub, reading inputs from INPUT_* variables
    Action {
        /// Repository as owner/name (INPUT_REPOSITORY)
        #[arg(long)]
        repository: Option<String>,

        /// Branch to read from and commit to (INPUT_BRANCH)
        #[arg(short, long)]
        branch: Option<String>,

        /// Path of the YAML file inside the repository (INPUT_VALUES_FILE)
        #[arg(short, long)]
        file: Option<String>,

        /// Dotted key path, e.g. app.version (INPUT_VERSION_KEY)
        #[arg(short, long)]
        key: Option<String>,

        /// New value (INPUT_VERSION)
        #[arg(short, long)]
        value: Option<String>,

        /// Commit message (INPUT_COMMIT_MESSAGE)
        #[arg(short, long)]
        message: Option<String>,

        /// API root, for GitHub Enterprise (GITHUB_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Dry run - fetch and patch, but do not commit
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Set a value in a local YAML file
    Set {
        file: PathBuf,

        /// Dotted key path, e.g. app.version
        key: String,

        value: String,

        /// Dry run - show what would be changed without modifying the file
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Print the current raw value at a key path in a local YAML file
    Get {
        file: PathBuf,

        /// Dotted key path, e.g. app.version
        key: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Action {
            repository,
            branch,
            file,
            key,
            value,
            message,
            api_url,
            dry_run,
            diff,
        } => {
            let overrides = [
                ("INPUT_REPOSITORY", repository),
                ("INPUT_BRANCH", branch),
                ("INPUT_VALUES_FILE", file),
                ("INPUT_VERSION_KEY", key),
                ("INPUT_VERSION", value),
                ("INPUT_COMMIT_MESSAGE", message),
                ("GITHUB_API_URL", api_url),
            ]
            .into_iter()
            .filter_map(|(var, v)| v.map(|v| (var, v)))
            .collect();

            // Workflow annotations instead of anyhow's report
            if let Err(e) = cmd_action(overrides, dry_run, diff) {
                println!("::error::{:#}", e);
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Set {
            file,
            key,
            value,
            dry_run,
            diff,
        } => cmd_set(&file, &key, &value, dry_run, diff),

        Commands::Get { file, key } => cmd_get(&file, &key),
    }
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &str, original: &str, modified: &str) {
    println!("\n{}", format!("--- {} (original)", file).dimmed());
    println!("{}", format!("+++ {} (patched)", file).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_action(
    overrides: HashMap<&'static str, String>,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let inputs = ActionInputs::from_lookup(|var| {
        overrides
            .get(var)
            .cloned()
            .or_else(|| env::var(var).ok())
    })
    .context("Input validation failed")?;

    let request = UpdateRequest::from_inputs(&inputs).context("Input validation failed")?;
    let store = GitHubStore::with_api_url(&inputs.api_url, &inputs.github_token);

    println!("Repository: {}", request.location.repository);
    println!("File: {} ({})", request.location.path, request.location.branch);
    println!("Key: {} -> {}", request.key, request.value);

    // One read: the diff shown is the document that gets committed
    let planned = plan_remote(&store, &request)?;
    match &planned.updated {
        Some(updated) => {
            if show_diff {
                display_diff(&request.location.path, &planned.original.content, updated);
            }
        }
        None => println!("{}", "Value already set, nothing to commit".yellow()),
    }

    if dry_run {
        println!("{}", "[DRY RUN - nothing committed]".cyan());
        return Ok(());
    }

    match write_planned(&store, &request, planned)? {
        UpdateOutcome::Updated { message, .. } => {
            println!("Commit: {}", message);
            println!(
                "::notice::Successfully updated {} in {}",
                request.key, request.location.path
            );
        }
        UpdateOutcome::Unchanged => {
            println!(
                "::notice::{} already set to {}, no commit made",
                request.key, request.value
            );
        }
    }

    Ok(())
}

fn cmd_set(file: &Path, key: &str, value: &str, dry_run: bool, show_diff: bool) -> Result<()> {
    let path = KeyPath::parse(key)?;
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let editor = YamlEditor::from_path(file, &content);

    let edit = match editor.plan(&path, value)? {
        YamlPlan::Edit(edit) => edit,
        YamlPlan::NoOp(reason) => {
            println!("{} {}", "⊙".yellow(), reason);
            return Ok(());
        }
    };

    if show_diff {
        let updated = edit.apply_to(&content)?;
        display_diff(&file.display().to_string(), &content, &updated);
    }

    if dry_run {
        println!("{} Would set {} in {}", "✓".green(), path, file.display());
        return Ok(());
    }

    match edit.apply()? {
        EditResult::Applied { .. } => {
            println!("{} Set {} in {}", "✓".green(), path, file.display());
        }
        EditResult::AlreadyApplied { .. } => {
            println!("{} {} already set in {}", "⊙".yellow(), path, file.display());
        }
    }

    Ok(())
}

fn cmd_get(file: &Path, key: &str) -> Result<()> {
    let path = KeyPath::parse(key)?;
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let editor = YamlEditor::from_path(file, &content);

    println!("{}", editor.current_value(&path)?);
    Ok(())
}
