use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use xlsx_cleaner::pipeline::{CleanOptions, RunSummary};
use xlsx_cleaner::worker::{self, CleanRequest};
use xlsx_cleaner::{CleanError, ErrorKind, RuleSet};

#[derive(Parser)]
#[command(name = "xlsx-cleaner")]
#[command(about = "Remove test, FOC and M88 rows from an Excel order export")]
#[command(version)]
struct Cli {
    #[arg(help = "Workbook to clean (.xlsx). Opens a file picker when omitted")]
    path: Option<PathBuf>,
    #[arg(long, help = "Also write the removed rows to <name>_DELETED.xlsx")]
    keep_deleted: bool,
    #[arg(long, help = "Treat the first row as data instead of a header")]
    no_header: bool,
    #[arg(long, help = "Print the summary as JSON")]
    json: bool,
    #[arg(long, help = "Show progress on stderr")]
    progress: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v, -vv)")]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let Some(input) = cli.path.clone().or_else(pick_file) else {
        println!("No file selected. Exiting.");
        return ExitCode::SUCCESS;
    };

    let request = CleanRequest {
        input,
        rules: RuleSet::default(),
        options: CleanOptions {
            keep_deleted: cli.keep_deleted,
            has_header: !cli.no_header,
        },
    };

    let show_progress = cli.progress;
    let result = worker::spawn(request).wait(|event| {
        if show_progress {
            match event.percent {
                Some(p) => eprintln!("[{p:>3}%] {:?}: {}", event.stage, event.detail),
                None => eprintln!("       {:?}: {}", event.stage, event.detail),
            }
        }
    });

    match result {
        Ok(summary) => match report(&summary, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for_error(&e)
        }
    }
}

fn pick_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select Excel File to Clean")
        .add_filter("Excel files", &["xlsx"])
        .add_filter("All files", &["*"])
        .pick_file()
}

fn report(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(summary).context("serializing summary")?;
        println!("{text}");
        return Ok(());
    }

    println!("Cleaning completed successfully!");
    println!();
    println!("Original rows:  {}", summary.original_rows);
    println!("Rows removed:   {}", summary.removed_rows);
    println!("Remaining rows: {}", summary.remaining_rows);
    println!();
    println!("Cleaned file saved to: {}", summary.cleaned_path.display());
    if let Some(deleted) = &summary.deleted_path {
        println!("Removed rows saved to: {}", deleted.display());
    }
    Ok(())
}

fn exit_code_for_error(err: &CleanError) -> ExitCode {
    match err.kind() {
        ErrorKind::InputNotFound => ExitCode::from(2),
        ErrorKind::InputLocked => ExitCode::from(3),
        ErrorKind::InputFormat => ExitCode::from(4),
        ErrorKind::OutputWrite => ExitCode::from(5),
        ErrorKind::Internal => ExitCode::FAILURE,
    }
}
