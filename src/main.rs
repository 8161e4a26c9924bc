//! relman - CLI entry point.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use git2::Repository;
use tracing_subscriber::EnvFilter;

use relman::credentials::resolve_credentials;
use relman::git::GitSourceControl;
use relman::gradle::GradleTool;
use relman::npm::NpmTool;
use relman::publish::{
    gather_info, gather_status, publish_all, publish_maven, publish_npm, summarize_outcomes,
    PublishOutcome, PublishTarget,
};
use relman::release::{
    confirm_release, execute_release, validate_release, ReleaseOutcome, ReleasePlan,
};
use relman::version::{
    calculate_next_version, classify_commit, read_project_version, VersionCalculation,
};

/// Release automation: version calculation, release preparation, publishing.
#[derive(Parser, Debug)]
#[command(name = "relman")]
#[command(about = "Version and publish project artifacts from conventional commits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the current version, preview the next one, or prepare a release
    #[command(group(ArgGroup::new("target_version").args(["version", "auto"])))]
    Version {
        /// Version to release (format: X.Y.Z)
        version: Option<String>,

        /// Calculate the version from conventional commits
        #[arg(long)]
        auto: bool,

        /// Show the calculated next version without changing anything
        #[arg(long)]
        show_next: bool,

        /// Create a local release without pushing to the remote
        #[arg(long)]
        no_push: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Publish built artifacts to the package registries
    #[command(group(ArgGroup::new("target").required(true).args(["all", "npm", "maven"])))]
    Publish {
        /// Publish all artifacts (npm + Maven)
        #[arg(long)]
        all: bool,

        /// Publish npm packages only
        #[arg(long)]
        npm: bool,

        /// Publish Maven artifacts only
        #[arg(long)]
        maven: bool,

        /// Registry organization/user
        #[arg(short, long)]
        user: Option<String>,

        /// Registry access token
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Prepare a release and publish it
    #[command(group(ArgGroup::new("target_version").required(true).args(["version", "auto"])))]
    Release {
        /// Version to release (format: X.Y.Z)
        version: Option<String>,

        /// Calculate the version from conventional commits
        #[arg(long)]
        auto: bool,

        /// Only create the version, do not publish
        #[arg(long)]
        no_publish: bool,

        /// Registry organization/user
        #[arg(short, long)]
        user: Option<String>,

        /// Registry access token
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Report project and tooling status
    Status,

    /// Show package and artifact details
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let root = std::env::current_dir().context("Failed to resolve current directory")?;
    ensure_project_root(&root)?;

    match cli.command {
        Commands::Version {
            version,
            auto,
            show_next,
            no_push,
            yes,
        } => {
            if show_next {
                return show_next_version(&root);
            }

            match (version, auto) {
                (None, false) => {
                    let current = read_project_version(&root)?;
                    println!("Project version: {current}");
                    Ok(())
                }
                (Some(version), _) => prepare_release(&root, &version, no_push, yes).await,
                (None, true) => {
                    let next = auto_version(&root)?;
                    prepare_release(&root, &next, no_push, yes).await
                }
            }
        }

        Commands::Publish {
            all,
            npm,
            maven,
            user,
            token,
        } => run_publish(&root, all, npm, maven, user.as_deref(), token.as_deref()).await,

        Commands::Release {
            version,
            auto,
            no_publish,
            user,
            token,
        } => {
            let version = match (version, auto) {
                (Some(version), _) => version,
                (None, _) => auto_version(&root)?,
            };

            prepare_release(&root, &version, false, false).await?;

            if no_publish {
                println!("Skipping publish (--no-publish)");
                return Ok(());
            }

            run_publish(&root, true, false, false, user.as_deref(), token.as_deref()).await
        }

        Commands::Status => show_status(&root).await,

        Commands::Info => show_info(&root),
    }
}

/// Commands must run from the project root, where the Gradle build lives.
fn ensure_project_root(root: &Path) -> Result<()> {
    if !root.join("build.gradle.kts").exists() {
        bail!("Not in the project root directory (build.gradle.kts not found)");
    }
    Ok(())
}

/// Run the next-version calculation against the repository at `root`.
fn calculate(root: &Path) -> Result<Option<VersionCalculation>> {
    let base = read_project_version(root)?;
    let source = GitSourceControl::open(root).context("Not a git repository")?;
    let calc = calculate_next_version(&source, &base)?;
    Ok(calc)
}

/// Resolve the `--auto` version, failing when calculation is impossible.
fn auto_version(root: &Path) -> Result<String> {
    match calculate(root)? {
        Some(calc) => Ok(calc.next_version.to_string()),
        None => bail!("Could not calculate next version"),
    }
}

/// `version --show-next`: render the full calculation.
fn show_next_version(root: &Path) -> Result<()> {
    let Some(calc) = calculate(root)? else {
        bail!("Could not calculate next version");
    };

    println!("Next version calculation");
    println!();
    println!("Base version (VERSION.txt): {}", calc.base_version);
    match &calc.last_tag {
        Some(tag) => println!("Last release tag:           {tag}"),
        None => println!("No release tags found, using v0.0.0 as base"),
    }

    println!();
    if calc.commits.is_empty() {
        println!("No commits since the last release tag");
    } else {
        println!("Commits analyzed:");
        for commit in calc.commits.iter().take(10) {
            let label = classify_commit(commit)
                .map(|bump| bump.to_string())
                .unwrap_or_else(|| "OTHER".to_string());
            println!("  [{label:6}] {commit}");
        }
        if calc.commits.len() > 10 {
            println!("  ... and {} more commits", calc.commits.len() - 10);
        }
    }

    println!();
    println!("Bump type:     {}", calc.bump);
    println!("Next version:  {}", calc.next_version);
    println!("Maven version: {}", calc.snapshot_version);
    println!("npm version:   {}", calc.dev_version);

    Ok(())
}

/// Validate, confirm, and execute a release at the given version.
async fn prepare_release(root: &Path, version: &str, no_push: bool, yes: bool) -> Result<()> {
    let repo = Repository::open(root).context("Not a git repository")?;
    let version = validate_release(root, &repo, version)?;
    let current_version = read_project_version(root)?;

    let plan = ReleasePlan {
        current_version,
        version,
        no_push,
    };

    if !yes && !confirm_release(&plan)? {
        println!("Release cancelled");
        return Ok(());
    }

    let gradle = GradleTool::new(root);
    let outcome = execute_release(&gradle, root, &plan)
        .await
        .context("Release failed")?;

    show_release_outcome(&outcome);
    Ok(())
}

fn show_release_outcome(outcome: &ReleaseOutcome) {
    println!();
    println!("Release v{} completed successfully", outcome.version);

    if outcome.pushed {
        println!();
        println!("The branch and tag were pushed; CI/CD will publish the release.");
        println!("Monitor the release workflow and verify the published packages.");
    } else {
        println!();
        println!("This was a LOCAL release (--no-push). To publish it:");
        println!();
        println!("  1. Review the changes:");
        println!("     git log --oneline -5");
        println!("     git show v{}", outcome.version);
        println!();
        println!("  2. Push when ready:");
        println!("     git push origin main");
        println!("     git push origin v{}", outcome.version);
    }
}

/// Run the requested publishers and report each outcome.
async fn run_publish(
    root: &Path,
    all: bool,
    npm_only: bool,
    _maven_only: bool,
    user: Option<&str>,
    token: Option<&str>,
) -> Result<()> {
    let credentials =
        resolve_credentials(user, token, true).context("Failed to resolve registry credentials")?;

    let gradle = GradleTool::new(root);
    let npm = NpmTool::new(root);

    let outcomes: Vec<PublishOutcome> = if all {
        publish_all(&gradle, &npm, &credentials).await
    } else if npm_only {
        vec![PublishOutcome {
            target: PublishTarget::Npm,
            result: publish_npm(&npm, &credentials).await,
        }]
    } else {
        vec![PublishOutcome {
            target: PublishTarget::Maven,
            result: publish_maven(&gradle, &credentials).await,
        }]
    };

    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("[PASS] {} artifacts published", outcome.target),
            Err(e) => println!("[FAIL] {} publish failed: {e}", outcome.target),
        }
    }

    summarize_outcomes(&outcomes)?;
    Ok(())
}

async fn show_status(root: &Path) -> Result<()> {
    let gradle = GradleTool::new(root);
    let npm = NpmTool::new(root);
    let status = gather_status(root, &gradle, &npm).await;

    println!("Project status");
    println!();
    match &status.version {
        Some(version) => println!("  Version:        {version}"),
        None => println!("  Version:        VERSION.txt not found"),
    }
    println!(
        "  JS build:       {}",
        if status.js_build_exists {
            "present"
        } else {
            "missing"
        }
    );
    println!(
        "  Maven build:    {}",
        if status.maven_build_exists {
            "present"
        } else {
            "missing"
        }
    );
    println!(
        "  Gradle:         {}",
        status.gradle_version.as_deref().unwrap_or("not available")
    );
    match &status.npm_version {
        Some(version) => println!("  npm:            npm {version}"),
        None => println!("  npm:            not available"),
    }
    println!(
        "  Registry token: {}",
        if status.token_set { "set" } else { "not set" }
    );

    Ok(())
}

fn show_info(root: &Path) -> Result<()> {
    let npm = NpmTool::new(root);
    let info = gather_info(root, &npm);

    println!("Package information");
    println!();
    match &info.version {
        Some(version) => println!("Project version: {version}"),
        None => println!("Project version: VERSION.txt not found"),
    }

    match &info.maven_coordinate {
        Some(coordinate) => println!("Maven artifact:  {coordinate}"),
        None => println!("Maven artifact:  unknown (no version)"),
    }

    println!();
    if info.npm_packages.is_empty() {
        println!("No npm packages found. Run the JS build first.");
    } else {
        println!("npm packages:");
        for package in &info.npm_packages {
            println!("  {} {}", package.name, package.version);
        }
    }

    Ok(())
}
