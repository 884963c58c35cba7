//! Application orchestrator.
//! Resolves and loads the config, picks the section, initializes logging,
//! then runs one session: connect shares, move, disconnect, summarise.

use anyhow::{Result, anyhow};
use tracing::{debug, error};

use move_files::cli::Args;
use move_files::config::{CONFIG_ENV, ConfigSource};
use move_files::output as out;
use move_files::{
    Config, LoadResult, MoveEngine, MoveFilesError, Shares, load_or_init, resolve_config_source,
    run_session,
};

use crate::logging::{console_level, init_tracing};

/// Run the CLI application. Any `Err` maps to exit status 1.
pub fn run(args: Args) -> Result<()> {
    let source = resolve_config_source(args.config.as_deref())
        .ok_or_else(|| anyhow!("could not determine a config file location; pass --config"))?;

    if args.print_config {
        print_config_location(&source);
        return Ok(());
    }

    let file = match load_or_init(&source)? {
        LoadResult::Loaded(file) => file,
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template move_files config was written to: {}",
                path.display()
            ));
            out::print_info(
                "Edit it to set `source_path` and `target_path` (and optionally `batch_size` and the share keys), then re-run.",
            );
            out::print_info(&format!("To use a different file pass --config or set {CONFIG_ENV}."));
            return Ok(());
        }
    };

    let raw = file.section(&args.section)?;
    if args.debug {
        out::print_section(&file.section_names(), &raw);
    }
    let settings = raw.validate()?;

    let mut cfg = Config::new(settings);
    if let Some(level) = file.log_level.clone() {
        cfg.log_level = level;
    }
    if file.log_file.is_some() {
        cfg.log_file = file.log_file.clone();
    }
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(
        &cfg.log_level,
        console_level(args.verbose, args.debug),
        cfg.log_file.as_deref(),
        args.json,
    )
    .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e:#}")))?;

    debug!(?args, config = %source.path().display(), "Starting move_files");
    if args.verbose {
        out::print_info(&format!(
            "Moving files from {} to {} (section {}, batch size {})",
            cfg.settings.source_path.display(),
            cfg.settings.target_path.display(),
            cfg.settings.section,
            cfg.settings.batch_size
        ));
    }

    let mut shares = Shares::from_settings(&cfg.settings);
    let report = run_session(&cfg.settings, &mut shares, &MoveEngine::new()).inspect_err(|e| {
        match e.downcast_ref::<MoveFilesError>() {
            Some(mf) => error!(code = mf.code(), "{mf}"),
            None => error!(error = %format!("{e:#}"), "run aborted"),
        }
    })?;

    for failure in &report.disconnect_failures {
        out::print_warn(&failure.to_string());
    }
    out::print_summary(&report.summary);
    if args.verbose {
        out::print_info("Ending move_files");
    }
    Ok(())
}

fn print_config_location(source: &ConfigSource) {
    let path = source.path();
    match source {
        ConfigSource::Flag(_) => {
            out::print_info(&format!("Using --config (explicit):\n  {}\n", path.display()))
        }
        ConfigSource::Env(_) => {
            out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {}\n", path.display()));
            out::print_info(&format!("To override, unset {CONFIG_ENV} or pass --config."));
        }
        ConfigSource::Default(_) => {
            out::print_info(&format!("Default move_files config path:\n  {}\n", path.display()))
        }
    }
    if path.exists() {
        out::print_info("A config file already exists at that location.");
    } else if matches!(source, ConfigSource::Default(_)) {
        out::print_info("No config file exists there yet. Run without --print-config to create a template.");
    } else {
        out::print_warn("No config file exists at that location.");
    }
}
