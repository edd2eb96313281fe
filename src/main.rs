//! barrelgen CLI - watch-driven barrel file generator
//!
//! Usage: barrelgen <COMMAND>
//!
//! Commands:
//!   gen     Generate the barrel file once and exit
//!   watch   Watch the glob and regenerate on changes

mod cli;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use barrelgen::{start, GenEvent, GenOptions};
use cli::{Cli, Commands, EntryFormat};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Gen { glob, out, format } => cmd_gen(glob, out, format, json),
        Commands::Watch { glob, out, format } => cmd_watch(glob, out, format, json),
    }
}

fn build_options(
    glob: String,
    out: PathBuf,
    format: Option<EntryFormat>,
    one_shot: bool,
) -> GenOptions {
    let mut options = GenOptions::new(glob, out);
    options.formatter = format.map(EntryFormat::formatter);
    options.one_shot = one_shot;
    options
}

fn cmd_gen(glob: String, out: PathBuf, format: Option<EntryFormat>, json: bool) -> Result<()> {
    let options = build_options(glob, out, format, true);
    let handle = start(options, move |event| print_event(&event, json))?;
    debug_assert!(handle.is_none());
    Ok(())
}

fn cmd_watch(glob: String, out: PathBuf, format: Option<EntryFormat>, json: bool) -> Result<()> {
    let options = build_options(glob, out, format, false);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !json {
        println!("👀 barrelgen");
        println!("Press Ctrl+C to stop\n");
    }

    let handle = start(options, move |event| print_event(&event, json))?;

    if let Some(handle) = handle {
        while running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(50));
        }
        handle.close();
    }

    Ok(())
}

fn print_event(event: &GenEvent, json: bool) {
    if json {
        println!("{}", event.to_json());
        return;
    }

    match event {
        GenEvent::WatchStarted { glob, out_file } => {
            println!("📂 Watching: {glob} -> {out_file}");
        }
        GenEvent::Ready { files } => {
            println!("✓ Ready: {files} files matched");
        }
        GenEvent::FileAdded { path } => {
            println!("  + {path}");
        }
        GenEvent::FileRemoved { path } => {
            println!("  - {path}");
        }
        GenEvent::OutputWritten { path, bytes, .. } => {
            println!("✓ Wrote {path} ({bytes} bytes)");
        }
        GenEvent::Error { message } => {
            eprintln!("✗ Error: {message}");
        }
        GenEvent::Shutdown => {
            println!("\n👋 Shutting down...");
        }
    }
}
