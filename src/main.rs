//! postgen's entry point.
//! Reads the hook payload, works out which generated paths to drop, and runs the
//! cleanup pass over the output directory.

use std::io;

use postgen::{
    cleanup::{apply_renames, remove_files_and_folders, CleanupOptions},
    cli::{get_args, Args},
    config::get_rules,
    error::{default_error_handler, Result},
    hooks::{get_base_dir, HookPayload},
    renderer::MiniJinjaRenderer,
    status,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Reads the hook payload from stdin when asked to
/// 2. Loads the cleanup rules and renders them against the answers
/// 3. Removes explicit and rule-derived targets, one at a time
/// 4. Applies renames
/// 5. Prints the completion banner
///
/// Everything that can fail fatally happens before the first removal. Once the
/// cleanup pass starts, failures are per target and the run always succeeds.
fn run(args: Args) -> Result<()> {
    let engine = MiniJinjaRenderer::new();

    let payload = if args.stdin {
        HookPayload::read_from(io::stdin().lock())?
    } else {
        HookPayload::from_json("")?
    };
    let context = payload.context();

    let base_dir = get_base_dir(args.output_dir.as_deref(), &payload)?;
    let template_dir = payload.template_dir();
    let rules = get_rules(args.rules.as_deref(), template_dir.as_deref())?;

    let mut targets = args.paths.clone();
    targets.extend(rules.targets(&context, &engine)?);
    let renames = rules.renames(&context, &engine)?;
    let messages = rules.messages(&context, &engine)?;

    log::debug!("Cleaning {} targets under {}", targets.len(), base_dir.display());

    let options = CleanupOptions::new(base_dir).verbose(args.verbose).contain(args.contain);
    let removed = remove_files_and_folders(&targets, &options);
    let renamed = apply_renames(&renames, &options);

    log::debug!(
        "Cleanup finished: {} removed, {} failed",
        removed.removed().count(),
        removed.failures().count() + renamed.failures().count()
    );

    if let Some(success) = messages.success {
        status::success(success);
    }
    if let Some(info) = messages.info {
        status::info(info);
    }
    Ok(())
}
