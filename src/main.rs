//! `cap-version`: version and build-number management for Capacitor apps
//!
//! ## Commands
//!
//! - `update`: write an explicit version (and optionally build or hotfix)
//! - `major` / `minor` / `patch`: semantic bump of package.json's version
//! - `hotfix`: advance the last digit of the build code
//! - `reset`: start over at 0.0.1
//! - `info`: show the current version state
//! - `compare`: check the local version against the stores

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};

use cap_version::config::{FETCH_TIMEOUT_MS, INITIAL_VERSION};
use cap_version::logging::{LogOptions, init_logging};
use cap_version::project::Project;
use cap_version::store::providers::DefaultPolicy;
use cap_version::store::{CompareSettings, ComparisonResult, StoreComparator, StoreVersionInfo};
use cap_version::update::{
    self, PlatformSelection, RegexSubstitution, UpdateOptions, UpdateReport, VersionUpdate,
};
use cap_version::version::BumpKind;

#[derive(Parser)]
#[command(name = "cap-version")]
#[command(version, about = "Version and build-number management for Capacitor apps")]
struct Cli {
    /// Project root
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write logs to the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Copy)]
struct TargetArgs {
    /// Native projects to write
    #[arg(long, value_enum, default_value_t = PlatformSelection::Both)]
    platform: PlatformSelection,

    /// Leave package.json untouched
    #[arg(long)]
    no_package: bool,
}

impl TargetArgs {
    fn options(self) -> UpdateOptions {
        UpdateOptions {
            platform: self.platform,
            update_package: !self.no_package,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Update to a specific version
    Update {
        /// New version (MAJOR.MINOR.PATCH)
        version: String,

        /// Explicit build number; takes precedence over --hotfix
        #[arg(long)]
        build: Option<u64>,

        /// Hotfix number; 10 and above become patch increments
        #[arg(long)]
        hotfix: Option<u64>,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Increment the major version
    Major {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Increment the minor version
    Minor {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Increment the patch version
    Patch {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Increment the hotfix digit of the build number
    Hotfix {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Reset to the initial version
    Reset {
        /// Apply the reset instead of only describing it
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the current version state
    Info {
        #[arg(long)]
        json: bool,
    },

    /// Compare the local version with the store versions
    Compare {
        #[arg(long)]
        json: bool,

        /// Refuse to assume a store version when no source answers
        #[arg(long)]
        strict: bool,

        /// Timeout for each store source in milliseconds
        #[arg(long, default_value_t = FETCH_TIMEOUT_MS)]
        timeout_ms: u64,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = init_logging(LogOptions {
        level: if cli.verbose { Level::DEBUG } else { Level::INFO },
        json: cli.log_json,
        file: cli.log_file,
    })
    .context("Failed to set up logging")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let project = Project::new(&cli.project);

    match cli.command {
        Command::Update {
            version,
            build,
            hotfix,
            target,
        } => {
            let update = VersionUpdate::explicit(&version, build, hotfix)?;
            if let Some(hotfix) = hotfix
                && build.is_none()
                && update.version.to_string() != version
            {
                info!(
                    "Hotfix {} converted to patch update: {} -> {}",
                    hotfix, version, update.version
                );
            }
            write_update(&project, update, target.options())
        }
        Command::Major { target } => bump(&project, BumpKind::Major, target),
        Command::Minor { target } => bump(&project, BumpKind::Minor, target),
        Command::Patch { target } => bump(&project, BumpKind::Patch, target),
        Command::Hotfix { target } => {
            let current = project.read_local_version()?;
            let current_build = project.current_build(&current)?;
            let (update, step) = VersionUpdate::hotfix(&current, current_build)?;

            if step.version_changed {
                info!(
                    "Hotfix {} overflow: {} -> {} (patch update)",
                    step.previous_hotfix + 1,
                    current,
                    update.version
                );
            } else {
                info!(
                    "Incrementing hotfix {} -> {}: build {} -> {}",
                    step.previous_hotfix,
                    step.previous_hotfix + 1,
                    current_build,
                    update.build
                );
            }
            write_update(&project, update, target.options())
        }
        Command::Reset { force, target } => {
            let current = project.read_local_version()?;
            let update = VersionUpdate::reset()?;

            if !force {
                println!("Current version: {}", current);
                println!(
                    "This will reset to {} (build {})",
                    INITIAL_VERSION, update.build
                );
                println!("To proceed, run: cap-version reset --force");
                return Ok(ExitCode::SUCCESS);
            }

            info!("Resetting version from {} to {}", current, update.version);
            write_update(&project, update, target.options())
        }
        Command::Info { json } => {
            let info = project.info()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Package: {}", info.name.as_deref().unwrap_or("<unnamed>"));
                println!("Version: {}", info.version);
                println!("Build number: {}", info.build);
                let platforms: Vec<&str> = info.platforms.iter().map(|p| p.display_name()).collect();
                println!("Platforms: {}", platforms.join(", "));
                if let Some(app_id) = &info.android_app_id {
                    println!("Android application id: {}", app_id);
                }
                if let Some(bundle_id) = &info.ios_bundle_id {
                    println!("iOS bundle id: {}", bundle_id);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Compare {
            json,
            strict,
            timeout_ms,
        } => {
            let settings = CompareSettings {
                timeout: Duration::from_millis(timeout_ms),
                default_policy: if strict {
                    DefaultPolicy::Refuse
                } else {
                    DefaultPolicy::default()
                },
            };
            let comparator = StoreComparator::new(project, &settings);
            let result = comparator.compare_with_stores().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_comparison(&result);
            }

            Ok(if result.can_publish {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn bump(project: &Project, kind: BumpKind, target: TargetArgs) -> Result<ExitCode> {
    let current = project.read_local_version()?;
    let update = VersionUpdate::bump(&current, kind)?;
    info!("Incrementing {:?} version: {} -> {}", kind, current, update.version);
    write_update(project, update, target.options())
}

fn write_update(project: &Project, target: VersionUpdate, options: UpdateOptions) -> Result<ExitCode> {
    let plan = update::plan(project, target, &options);
    let report = update::apply(project.root(), &plan, &RegexSubstitution)
        .with_context(|| format!("Failed to write version {}", target.version))?;
    print_report(&report);
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &UpdateReport) {
    println!("Version: {}", report.version);
    println!("Build number: {}", report.build);
    if report.files_changed.is_empty() {
        println!("No files changed");
        return;
    }
    println!("Updated files:");
    for file in &report.files_changed {
        println!("  - {}", file.display());
    }
}

fn print_platform(info: &StoreVersionInfo) {
    println!("{}:", info.platform);
    println!("  Local: {} (build {})", info.local_version, info.local_build);
    match (&info.error, &info.store_version, &info.store_build) {
        (Some(error), _, _) => println!("  Error: {}", error),
        (None, Some(version), Some(build)) => {
            println!("  Store: {} (build {})", version, build);
            let status = if info.is_newer {
                "ready to publish"
            } else {
                "version too low"
            };
            println!("  Status: {}", status);
        }
        _ => {}
    }
}

fn print_comparison(result: &ComparisonResult) {
    println!(
        "Local version: {} (build {})",
        result.local_version, result.local_build
    );
    if result.android.is_none() && result.ios.is_none() {
        println!("No native platforms found");
    }
    for info in [&result.android, &result.ios].into_iter().flatten() {
        print_platform(info);
    }

    if result.can_publish {
        println!("Ready to publish on all platforms");
    } else {
        println!("Cannot publish: version conflicts detected");
    }
    for warning in &result.warnings {
        println!("warning: {}", warning);
    }
    for error in &result.errors {
        println!("error: {}", error);
    }
}
