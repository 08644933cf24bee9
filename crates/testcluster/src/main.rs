use std::process::ExitCode;

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use testcluster::{FeatureDecision, FeatureResolver, TestConfig, init_tracing};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "testcluster",
    version,
    about = "Resolve which feature-gated integration tests run against a deployment"
)]
struct Cli {
    /// Path to the configuration file (defaults to config/testcluster.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolution of every known feature
    Features(ResolveArgs),
    /// Check one feature; exits non-zero when it is unsupported
    Supports {
        /// Feature token, e.g. `query` or `collections`
        feature: String,
        #[command(flatten)]
        args: ResolveArgs,
    },
}

#[derive(Args, Debug, Default)]
struct ResolveArgs {
    /// Server version to assume, e.g. 6.5.0-4960-enterprise
    #[arg(long)]
    version: Option<String>,
    /// Resolve against the mock regardless of configured server
    #[arg(long, default_value_t = false)]
    mock: bool,
    /// Feature flags, e.g. `*,-query`
    #[arg(long)]
    features: Option<String>,
    /// Emit JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = TestConfig::load(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.command {
        Command::Features(args) => {
            let resolver = build_resolver(&mut config, &args)?;
            print_report(&resolver, &resolver.report(), args.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Supports { feature, args } => {
            let resolver = build_resolver(&mut config, &args)?;
            let supported = resolver.supports_token(&feature);
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "feature": feature, "supported": supported })
                );
            } else {
                println!(
                    "{feature}: {}",
                    if supported { "supported" } else { "unsupported" }
                );
            }
            Ok(if supported {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn build_resolver(config: &mut TestConfig, args: &ResolveArgs) -> Result<FeatureResolver> {
    let mock = args.mock || (args.version.is_none() && config.is_mock());
    if let Some(version) = &args.version {
        config.version = Some(version.clone());
    }
    if let Some(features) = &args.features {
        config.features = features.clone();
    }
    let resolver = config.resolver_for_mode(mock)?;
    info!(
        version = %resolver.version(),
        mock = resolver.is_mock(),
        flags = %resolver.flags(),
        "resolving features"
    );
    Ok(resolver)
}

fn print_report(
    resolver: &FeatureResolver,
    decisions: &[FeatureDecision],
    json: bool,
) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "version": resolver.version(),
            "mock": resolver.is_mock(),
            "features": decisions,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for decision in decisions {
        let source = match decision.flag {
            testcluster::FlagState::Unset => "catalog",
            _ => "flag",
        };
        println!(
            "{:<20} {:<11} ({source})",
            decision.feature.as_str(),
            if decision.supported { "supported" } else { "unsupported" }
        );
    }
    Ok(())
}
