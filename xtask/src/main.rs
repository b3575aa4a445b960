use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

const CORE_PACKAGE: &str = "trip_core";
const BENCH_NAME: &str = "performance";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the trip aggregation workspace",
    long_about = "A unified CLI for running tests, benchmarks,\n\
                  and CI checks in the trip aggregation workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trip_core unit and integration tests
    Test {
        /// Only run tests whose name contains this string
        filter: Option<String>,
    },
    /// Run Criterion benchmarks
    Bench {
        /// Only run benchmarks whose id contains this string
        filter: Option<String>,
    },
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare {
        /// Name of the saved Criterion baseline
        #[arg(long, env = "XTASK_BASELINE", default_value = "main")]
        baseline: String,
    },
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn bench_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["bench", "--package", CORE_PACKAGE, "--bench", BENCH_NAME];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    args
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test trip_core");
    run_cargo(&["test", "-p", CORE_PACKAGE]);

    step("Build trip_core without test helpers");
    run_cargo(&["build", "-p", CORE_PACKAGE, "--no-default-features"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&bench_args(&[]));
}

fn bench_compare(baseline: &str) {
    let baseline_dir = Path::new("target/criterion");
    if baseline_dir.exists() {
        step("Removing existing benchmark data");
        std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
    }

    step("Stashing current changes");
    run_git(&[
        "stash",
        "push",
        "-m",
        "Temporary stash for benchmark comparison",
    ]);

    step("Running benchmark to create baseline");
    run_cargo(&bench_args(&["--save-baseline", baseline]));

    step("Reapplying changes");
    run_git(&["stash", "pop"]);

    step("Running benchmark comparing against baseline");
    run_cargo(&bench_args(&["--baseline", baseline]));

    eprintln!("\nDone! Check the output above to see performance comparison.");
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Test { filter } => {
            let mut args = vec!["test", "-p", CORE_PACKAGE];
            if let Some(filter) = filter.as_deref() {
                args.push(filter);
            }
            run_cargo(&args);
        }
        Commands::Bench { filter } => match filter.as_deref() {
            Some(filter) => run_cargo(&bench_args(&[filter])),
            None => run_cargo(&bench_args(&[])),
        },
        Commands::BenchCompare { baseline } => bench_compare(&baseline),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
