use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fnship workspace",
    long_about = "A unified CLI for running CI checks and building local\n\
                  deployment fixtures in the fnship workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci,
    /// Write a placeholder deployment bundle for exercising the CLI
    Fixture {
        /// Output path for the bundle
        #[arg(long, default_value = "dist/function.zip")]
        output: PathBuf,
    },
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

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn write_fixture_bundle(output: &Path) {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).expect("failed to create bundle directory");
        }
    }

    let file = fs::File::create(output).expect("failed to create bundle zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options).expect("failed to start bundle entry");
    zip.write_all(b"#!/bin/sh\necho placeholder function\n")
        .expect("failed to write bootstrap entry");
    zip.finish().expect("failed to finish bundle zip");

    eprintln!("\nWrote fixture bundle:\n- {}", output.display());
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

    step("Test fnship_core");
    run_cargo(&["test", "-p", "fnship_core"]);

    step("Test fnship_aws");
    run_cargo(&["test", "-p", "fnship_aws"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => {
            ci_check();
            eprintln!("\nCI job passed.");
        }
        Commands::Fixture { output } => {
            write_fixture_bundle(&output);
        }
    }
}
