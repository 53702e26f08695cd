use anyhow::{Context, Result};
use clap::Parser;
use method_profiler::cli::Cli;
use method_profiler::config::{ProfilerConfig, ReportDestination};
use method_profiler::scanner::{scan, FileCounts, FileScanner, TextScanner};
use method_profiler::Profiler;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// `--output` wins over the config file; no config means stdout
fn resolve_destination(args: &Cli) -> Result<ReportDestination> {
    if let Some(output) = &args.output {
        return Ok(ReportDestination::File(output.clone()));
    }
    let config = match &args.config {
        Some(path) => ProfilerConfig::from_file(path)?,
        None => ProfilerConfig::default(),
    };
    Ok(config.destination())
}

/// Scan every file `repeat` times on `threads` workers sharing one scanner
///
/// Results come back in job order: all files for the first pass, then the
/// second pass, and so on.
fn run_scans<S: TextScanner + ?Sized>(
    scanner: &S,
    files: &[PathBuf],
    threads: usize,
    repeat: usize,
) -> Vec<io::Result<FileCounts>> {
    let jobs = files.len() * repeat;
    let next_job = AtomicUsize::new(0);

    let mut results: Vec<(usize, io::Result<FileCounts>)> = thread::scope(|scope| {
        let workers: Vec<_> = (0..threads.min(jobs))
            .map(|_| {
                scope.spawn(|| {
                    let mut done = Vec::new();
                    loop {
                        let job = next_job.fetch_add(1, Ordering::Relaxed);
                        if job >= jobs {
                            break done;
                        }
                        let path = &files[job % files.len()];
                        done.push((job, scan(scanner, path)));
                    }
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });

    results.sort_by_key(|(job, _)| *job);
    results.into_iter().map(|(_, result)| result).collect()
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.threads < 1 {
        anyhow::bail!("Invalid value for --threads: {} (must be >= 1)", args.threads);
    }
    if args.repeat < 1 {
        anyhow::bail!("Invalid value for --repeat: {} (must be >= 1)", args.repeat);
    }

    init_tracing(args.debug);

    let destination = resolve_destination(&args)?;
    let profiler = Profiler::with_system_clock();
    let scanner = profiler.wrap::<dyn TextScanner, _>(FileScanner)?;
    tracing::debug!(scanner = %scanner.name(), files = args.files.len(), "starting scan");

    let results = run_scans(&scanner, &args.files, args.threads, args.repeat);

    let mut failures = 0;
    for (path, result) in args.files.iter().zip(&results) {
        match result {
            Ok(counts) => println!("{}\t{}\t{}", counts.lines, counts.words, path.display()),
            Err(e) => {
                failures += 1;
                eprintln!("error: {}: {}", path.display(), e);
            }
        }
    }

    profiler
        .write_report(&destination)
        .with_context(|| format!("Failed to write profiling report to {}", destination))?;

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) could not be scanned", failures, args.files.len());
    }
    Ok(())
}
