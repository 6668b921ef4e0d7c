//! Resolves the builder configuration from an optional JSON file plus
//! command-line overrides.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blockdex_core::{AnchorPath, BuildStrategy, BuilderConfig, DuplicatePolicy, ExclusionSet, Region};
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    /// One record per `name: "value"` line, categories from `//` markers
    LineScan,
    /// One record per top-level `name: { ... }` entry of the anchored region
    DeepSpan,
}

/// Options shared by every subcommand that builds a catalog.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Source files or http(s) URLs, processed in order
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// JSON builder configuration file
    #[arg(short, long, env = "BLOCKDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extraction strategy (overrides the config file)
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Anchor token; repeat to search a chain of tokens in order
    #[arg(short, long = "anchor")]
    pub anchors: Vec<String>,

    /// Split the whole input instead of an anchored region
    #[arg(long, conflicts_with = "anchors")]
    pub whole: bool,

    /// Fixed category for deep-span builds (default: derived from the file name)
    #[arg(long)]
    pub category: Option<String>,

    /// Record name to drop; may be repeated
    #[arg(short = 'x', long = "exclude")]
    pub excludes: Vec<String>,

    /// Do not drop the stock instructor/administration blocks
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Keep the last of repeated record names instead of failing
    #[arg(long)]
    pub last_wins: bool,
}

/// Builds the effective configuration: file first, then flags on top.
pub fn resolve(args: &BuildArgs) -> Result<BuilderConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            BuilderConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => BuilderConfig::new(),
    };

    config.strategy = resolve_strategy(config.strategy, args)?;

    if !args.no_default_excludes {
        config.exclusions.extend(ExclusionSet::entry_admin_blocks().iter());
    }
    config.exclusions.extend(args.excludes.iter().cloned());

    if args.last_wins {
        config.duplicates = DuplicatePolicy::LastWins;
    }

    Ok(config)
}

fn resolve_strategy(base: BuildStrategy, args: &BuildArgs) -> Result<BuildStrategy> {
    let region_override = if args.whole {
        Some(Region::Whole)
    } else if !args.anchors.is_empty() {
        Some(Region::Anchored(AnchorPath::new(args.anchors.iter().cloned())))
    } else {
        None
    };

    let strategy = match (args.strategy, base) {
        (Some(StrategyKind::LineScan), BuildStrategy::LineScan { rules })
        | (None, BuildStrategy::LineScan { rules }) => BuildStrategy::LineScan { rules },
        (Some(StrategyKind::LineScan), BuildStrategy::DeepSpan { .. }) => BuildStrategy::line_scan(),
        (Some(StrategyKind::DeepSpan), BuildStrategy::DeepSpan { region, category })
        | (None, BuildStrategy::DeepSpan { region, category }) => BuildStrategy::DeepSpan {
            region: region_override.clone().unwrap_or(region),
            category: args.category.clone().unwrap_or(category),
        },
        (Some(StrategyKind::DeepSpan), BuildStrategy::LineScan { .. }) => BuildStrategy::DeepSpan {
            region: region_override
                .clone()
                .unwrap_or_else(|| Region::Anchored(AnchorPath::entry_get_blocks())),
            category: args.category.clone().unwrap_or_default(),
        },
    };

    if matches!(strategy, BuildStrategy::LineScan { .. })
        && (region_override.is_some() || args.category.is_some())
    {
        bail!("--anchor, --whole and --category only apply to the deep-span strategy");
    }

    Ok(strategy)
}
