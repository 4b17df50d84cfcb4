//! sitepush CLI
//!
//! Pushes a static site build to S3, prunes stale objects and invalidates
//! the CloudFront distribution in front of the bucket.

use std::path::PathBuf;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use sitepush::{
    cdn::CloudFrontInvalidator,
    error::Result,
    models::Config,
    pipeline::{DeploySettings, Deployer},
    services::{LocalTree, plan_uploads},
    storage::S3Store,
};

/// sitepush - Static Site Deployer
#[derive(Parser, Debug)]
#[command(name = "sitepush", version, about = "Static site deployer for S3 and CloudFront")]

struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "sitepush.toml")]
    config: PathBuf,

    /// Build directory to deploy (overrides deploy.build_dir)
    #[arg(long, global = true)]
    build_dir: Option<PathBuf>,

    /// Target bucket (overrides BUCKET_NAME)
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// CloudFront distribution (overrides DISTRIBUTION_ID)
    #[arg(long, global = true)]
    distribution_id: Option<String>,

    /// Key prefix eligible for pruning
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Maximum concurrent uploads
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Upload, prune and invalidate (default)
    Deploy,

    /// Show what a deploy would upload and delete
    Plan,

    /// Check configuration and the build directory
    Validate,
}

/// Initialize logging before the config is read so loading can report.
///
/// `RUST_LOG` takes precedence. Otherwise the logger admits every level
/// and the effective one is capped by `--verbose` now and by the
/// configured level once it is known.
fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .format_timestamp_secs()
        .init();
    if !env_filter_set() {
        log::set_max_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info });
    }
}

/// Narrow logging to `logging.level` unless `--verbose` or `RUST_LOG` decide.
fn apply_log_level(verbose: bool, config: &Config) {
    if verbose || env_filter_set() {
        return;
    }
    match config.logging.level_filter() {
        Some(level) => log::set_max_level(level),
        None => log::warn!(
            "Unknown logging.level {:?}, keeping info",
            config.logging.level
        ),
    }
}

fn env_filter_set() -> bool {
    std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some()
}

/// Load the config file, then layer environment and flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env()?;

    if let Some(dir) = &cli.build_dir {
        config.deploy.build_dir = dir.clone();
    }
    if let Some(bucket) = &cli.bucket {
        config.deploy.bucket = bucket.clone();
    }
    if let Some(id) = &cli.distribution_id {
        config.deploy.distribution_id = id.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.deploy.managed_prefix = prefix.clone();
    }
    if let Some(n) = cli.concurrency {
        config.transfer.upload_concurrency = n;
    }

    config.validate()?;
    Ok(config)
}

/// Build the S3 and CloudFront handles shared by every stage.
async fn connect(config: &Config) -> (S3Store, CloudFrontInvalidator) {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).retry_config(
        RetryConfig::standard().with_max_attempts(config.transfer.max_attempts),
    );
    if let Some(region) = &config.deploy.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let shared = loader.load().await;

    let store = S3Store::new(aws_sdk_s3::Client::new(&shared), &config.deploy.bucket)
        .with_page_size(config.transfer.list_page_size);
    let cdn = CloudFrontInvalidator::new(
        aws_sdk_cloudfront::Client::new(&shared),
        &config.deploy.distribution_id,
    );
    (store, cdn)
}

async fn run(cli: &Cli, config: Config) -> Result<()> {
    let root = config.deploy.build_dir.clone();

    match cli.command.unwrap_or(Command::Deploy) {
        Command::Deploy => {
            let (store, cdn) = connect(&config).await;
            let deployer = Deployer::new(&store, &cdn, DeploySettings::from(&config));

            let report = deployer.run(&root).await?;

            if report.has_warnings() {
                log::warn!(
                    "Deploy finished with {} warning(s); stale objects or cached paths may remain",
                    report.warnings.len()
                );
            }
            log::info!(
                "Deploy complete: {} uploaded, {} deleted, {} warning(s) in {}ms",
                report.uploaded,
                report.deleted.len(),
                report.warnings.len(),
                report.elapsed_ms()
            );
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        Command::Plan => {
            let (store, cdn) = connect(&config).await;
            let deployer = Deployer::new(&store, &cdn, DeploySettings::from(&config));

            let plan = deployer.plan(&root).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                for job in &plan.uploads {
                    println!("upload: {} ({})", job.key, job.content_type);
                }
                for key in &plan.deletions {
                    println!("delete: {}", key);
                }
            }
            log::info!(
                "Plan: {} upload(s), {} deletion(s) under {}",
                plan.uploads.len(),
                plan.deletions.len(),
                config.deploy.managed_prefix
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            log::info!(
                "✓ Config OK (bucket {}, distribution {})",
                config.deploy.bucket,
                config.deploy.distribution_id
            );

            let files = LocalTree::open(&root)?.collect()?;
            let jobs = plan_uploads(&files)?;
            log::info!("✓ Build OK ({} files in {})", jobs.len(), root.display());

            log::info!("All validations passed!");
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match load_config(&cli) {
        Ok(config) => {
            apply_log_level(cli.verbose, &config);
            run(&cli, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        log::error!("error: {}", e);
        std::process::exit(1);
    }
}
