use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use folder_matrix_lib::compare_engine::{ComparisonReport, FolderComparator};
use folder_matrix_lib::config::CompareConfig;
use folder_matrix_lib::diagnostics::{Diagnostic, DiagnosticLevel};
use folder_matrix_lib::input_validation::validate_listing_timeout_ms;
use folder_matrix_lib::path_validation::sanitize_path;
use folder_matrix_lib::report::{describe_group, folder_label};
use folder_matrix_lib::session::{ComparisonStatus, FolderSession};

const LOG_PAGE_SIZE: usize = 20;

#[derive(Parser)]
#[command(name = "folder-matrix")]
#[command(about = "Show which file names exist in which folders", long_about = None)]
struct Cli {
    /// Folders to compare; overrides the folders listed in the config file
    folders: Vec<String>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up on a folder whose listing takes longer than this
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    #[arg(short, long)]
    json: bool,

    /// Manage the folder list from stdin (add, remove, list, compare, log, quit)
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CompareConfig::load(path)?,
        None => CompareConfig::default(),
    };
    if let Some(timeout_ms) = cli.timeout_ms {
        validate_listing_timeout_ms(timeout_ms)?;
        config.listing_timeout_ms = Some(timeout_ms);
    }
    if !cli.folders.is_empty() {
        config.folders = cli.folders.iter().map(|f| sanitize_path(f)).collect();
    }
    config.validate()?;

    if cli.interactive {
        return run_interactive(&config).await;
    }

    if config.folders.is_empty() {
        anyhow::bail!("No folders given: pass them as arguments or list them in --config");
    }

    let comparator = FolderComparator::new(config.compare_options());

    if cli.json {
        let report = comparator.compare(&config.folders).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Comparing {} folder(s)...", config.folders.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = comparator.compare(&config.folders).await;
    spinner.finish_and_clear();

    print_diagnostics(&report.diagnostics);
    let valid = report.result.valid_directories.len();
    let status = if valid >= 2 {
        ComparisonStatus::Compared
    } else {
        ComparisonStatus::NeedMoreFolders { valid }
    };
    print_report(&report, status);

    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let icon = match diagnostic.level {
            DiagnosticLevel::Warning => "⚠️ ",
            DiagnosticLevel::Error => "❌",
        };
        eprintln!("{} [{}] {}", icon, diagnostic.code, diagnostic.message);
    }
}

fn print_report(report: &ComparisonReport, status: ComparisonStatus) {
    let result = &report.result;

    println!("📂 Folders compared: {}", result.valid_directories.len());
    for (index, folder) in result.valid_directories.iter().enumerate() {
        println!("   {}. {} ({})", index + 1, folder_label(folder), folder);
    }
    println!();

    if let Some(hint) = status.hint() {
        println!("💡 {hint}");
        return;
    }

    if result.total_files() == 0 {
        println!("✅ All folders are empty");
        return;
    }

    if result.common_files.is_empty() {
        println!("🔗 No file names shared by all folders");
    } else {
        println!("🔗 Common to all folders ({}):", result.common_files.len());
        for name in &result.common_files {
            println!("   {name}");
        }
    }

    for (mask, files) in result.ordered_pattern_groups() {
        println!();
        println!("📝 {}:", describe_group(mask, files.len()));
        for name in files {
            println!("   {name}");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("   add <path>        add a folder and compare");
    println!("   remove <n>...     remove folders by number and compare");
    println!("   list              show the folder list");
    println!("   compare           compare again");
    println!("   log [page]        show diagnostics recorded so far, {LOG_PAGE_SIZE} per page");
    println!("   log clear         forget recorded diagnostics");
    println!("   quit              exit");
}

async fn run_interactive(config: &CompareConfig) -> anyhow::Result<()> {
    let mut session = FolderSession::with_comparator(
        FolderComparator::new(config.compare_options()),
        config.max_log_lines,
    );
    for folder in &config.folders {
        if let Err(e) = session.add_folder(folder) {
            eprintln!("⚠️  {e}");
        }
    }

    print_help();
    if session.folders().len() >= 2 {
        refresh_and_print(&mut session).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "add" => match session.add_folder(argument) {
                Ok(path) => {
                    println!("➕ {path}");
                    refresh_and_print(&mut session).await;
                }
                Err(e) => eprintln!("⚠️  {e}"),
            },
            "remove" => {
                let positions: Result<Vec<usize>, _> =
                    argument.split_whitespace().map(str::parse::<usize>).collect();
                match positions {
                    Ok(positions) if !positions.is_empty() && !positions.contains(&0) => {
                        let indices: Vec<usize> = positions.iter().map(|p| p - 1).collect();
                        match session.remove_folders(&indices) {
                            Ok(removed) => {
                                for path in removed {
                                    println!("➖ {path}");
                                }
                                refresh_and_print(&mut session).await;
                            }
                            Err(e) => eprintln!("⚠️  {e}"),
                        }
                    }
                    _ => eprintln!("⚠️  usage: remove <n>... (numbers start at 1)"),
                }
            }
            "list" => {
                for (index, folder) in session.folders().iter().enumerate() {
                    println!("   {}. {} ({})", index + 1, folder_label(folder), folder);
                }
                println!("   {} folder(s)", session.folders().len());
            }
            "compare" => refresh_and_print(&mut session).await,
            "log" if argument == "clear" => {
                session.clear_log();
                println!("🧹 Diagnostics cleared");
            }
            "log" => match argument.parse::<usize>() {
                Ok(page) if page > 0 => print_log_page(&session, page),
                _ if argument.is_empty() => print_log_page(&session, 1),
                _ => eprintln!("⚠️  usage: log [page] | log clear"),
            },
            "help" => print_help(),
            "quit" | "exit" => break,
            other => eprintln!("⚠️  unknown command: {other} (try help)"),
        }
    }

    Ok(())
}

fn print_log_page(session: &FolderSession, page: usize) {
    let total = session.log().len();
    let entries = session.log().entries_paginated((page - 1) * LOG_PAGE_SIZE, LOG_PAGE_SIZE);
    for diagnostic in &entries {
        println!(
            "   {} {:<7} {}",
            diagnostic.timestamp.to_rfc3339(),
            diagnostic.level.as_str(),
            diagnostic.message
        );
    }
    println!("   page {page} of {}, {total} diagnostic(s)", total.div_ceil(LOG_PAGE_SIZE).max(1));
}

async fn refresh_and_print(session: &mut FolderSession) {
    let outcome = session.refresh().await;
    print_diagnostics(&outcome.report.diagnostics);
    for path in &outcome.pruned {
        println!("➖ {path} (no longer a folder)");
    }
    println!();
    print_report(&outcome.report, outcome.status);
}
