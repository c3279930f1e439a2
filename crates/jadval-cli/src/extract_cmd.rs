use jadval::{BatchReport, Extractor, run_batch};

use crate::cli::ExtractArgs;
use crate::shared::{ProgressReporter, fail, load_config};

pub fn run(args: &ExtractArgs) -> Result<(), i32> {
    let config = load_config(args.config.as_deref())?;
    let (options, plan) = config.into_extract(args);
    tracing::debug!(?options, ?plan, "resolved options");

    let extractor = Extractor::new(options);
    let mut progress = ProgressReporter::new();
    let report = run_batch(
        &extractor,
        &args.inputs,
        args.recursive,
        args.pages.as_deref(),
        &plan,
        &mut progress,
    )
    .map_err(fail)?;

    print_report(&report);

    if report.is_success() {
        Ok(())
    } else {
        Err(1)
    }
}

fn print_report(report: &BatchReport) {
    for file in &report.files {
        println!(
            "{}: {} table(s) on {} page(s)",
            file.path.display(),
            file.tables_found,
            file.pages_scanned
        );
        for path in &file.written {
            println!("  -> {}", path.display());
        }
    }
    for (path, err) in &report.failures {
        eprintln!("Error: {}: {err}", path.display());
    }
    println!(
        "Processed {} file(s), wrote {} file(s), {} failed",
        report.files.len(),
        report.files_written(),
        report.failures.len()
    );
}
