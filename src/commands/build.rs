use std::path::PathBuf;

use anyhow::{Context, bail};

use crate::{BuildArgs, build::Builder, config::SiteConfig, diagnostics::Diagnostics};

/// Working directory entered when no locations are configured at all.
const FALLBACK_WORKDIR: &str = "docs";
const FALLBACK_SOURCE: &str = "../gridlabd/docs/";
const FALLBACK_TARGET: &str = "./";

/// Source, target and optional base for a run.
type Locations = (PathBuf, PathBuf, Option<String>);

pub fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let mut config = SiteConfig::load_from_arg(args.config_file.as_deref())?;
    apply_args(&mut config, args);

    let diagnostics = Diagnostics::from(&config.log);
    let (source, target, base) = match resolve_locations(&config)? {
        Some(locations) => locations,
        None => {
            let locations = fallback_locations(config.base.clone())?;
            diagnostics.warning(format_args!(
                "no source given, converting {} into {}",
                locations.0.display(),
                locations.1.display()
            ));
            locations
        }
    };

    let builder = Builder::new(source, target, base, diagnostics)
        .copy_extensions(config.copy_extensions.clone())
        .trace_comments(config.trace_comments);
    diagnostics.verbose(format_args!("Using base {}", builder.base()));

    let result = builder.build()?;

    println!(
        "Built site to {} ({} documents, {} copied, {} skipped, {} sidebar entries in {})",
        result.output_dir.display(),
        result.documents,
        result.copied,
        result.skipped,
        result.sidebar_entries,
        result.sidebar_path.display()
    );

    Ok(())
}

/// Command line values take precedence over the config file.
fn apply_args(config: &mut SiteConfig, args: &BuildArgs) {
    if let Some(source) = &args.source {
        config.source = Some(source.clone());
    }
    if let Some(target) = &args.target {
        config.target = Some(target.clone());
    }
    if let Some(base) = &args.base {
        config.base = Some(base.clone());
    }
    if args.verbose {
        config.log.verbose = true;
    }
    if args.silent {
        config.log.errors = false;
    }
    if args.no_warnings {
        config.log.warnings = false;
    }
    if args.trace_comments {
        config.trace_comments = true;
    }
}

/// Configured locations, or `None` when neither source nor target is set.
fn resolve_locations(config: &SiteConfig) -> Result<Option<Locations>, anyhow::Error> {
    match (&config.source, &config.target) {
        (Some(source), Some(target)) => {
            Ok(Some((source.clone(), target.clone(), config.base.clone())))
        }
        (None, None) => Ok(None),
        (Some(_), None) => bail!("a target directory is required when a source is given"),
        (None, Some(_)) => bail!("a source directory is required when a target is given"),
    }
}

/// Built-in locations: convert the sibling project's docs into the `docs`
/// working directory, with pages based at that directory's `file://` URL.
fn fallback_locations(base: Option<String>) -> Result<Locations, anyhow::Error> {
    std::env::set_current_dir(FALLBACK_WORKDIR)
        .with_context(|| format!("failed to enter working directory '{FALLBACK_WORKDIR}'"))?;
    let cwd = std::env::current_dir()?;
    let base = base.unwrap_or_else(|| format!("file://{}/", cwd.display()));

    Ok((
        PathBuf::from(FALLBACK_SOURCE),
        PathBuf::from(FALLBACK_TARGET),
        Some(base),
    ))
}
