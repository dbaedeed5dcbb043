mod app;
mod clipboard;
mod config;
mod event;
mod settings;
mod ssh;
mod tabs;
mod ui;

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use ansi_term::Colour;
use anyhow::{Context, anyhow};
use clap::Parser;
use crossterm::event::{Event, read};
use ftail::Ftail;
use log::{LevelFilter, error, warn};
use ratatui::DefaultTerminal;

use app::App;
use clipboard::{copied_message, copy_to_system, serve_until_replaced, system_clipboard};
use config::{load_entries, ssh_config_path};
use settings::{Settings, default_log_path, load_settings, settings_path};

#[derive(Parser, Debug)]
#[command(name = "sshclip", version, about)]
/// Pick a host from your ssh config and copy `ssh <host>` to the clipboard.
struct Cli {
    /// SSH client config to read instead of ~/.ssh/config
    #[arg(long, value_name = "PATH")]
    ssh_config: Option<PathBuf>,

    /// Log file (defaults to the user cache directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    /// Own the clipboard with TEXT until something else replaces it
    #[arg(long = "serve-clipboard", value_name = "TEXT", hide = true)]
    serve_clipboard: Option<String>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{}'", s))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, settings_err) = match load_settings(&settings_path()) {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| settings.log.file.clone())
        .or_else(default_log_path);
    let level = cli
        .log_level
        .or_else(|| settings.log.level_filter())
        .unwrap_or(LevelFilter::Info);
    if let Some(path) = log_path {
        init_logging(&path, level);
    }
    if let Some(e) = settings_err {
        warn!("using default settings: {:#}", e);
    }

    if let Some(text) = cli.serve_clipboard.as_deref() {
        return serve_until_replaced(text);
    }

    let ssh_path = match cli.ssh_config {
        Some(path) => path,
        None => ssh_config_path()?,
    };
    let entries = load_entries(&ssh_path)?;
    println!("{}", entries.len());

    let mut app = App::new(entries, &settings.ui);

    if let Err(e) = run_picker(&mut app) {
        error!("ui failed: {}", e);
        println!("Error running program: {}", e);
        process::exit(1);
    }

    let Some(display) = app.selection() else {
        return Ok(());
    };

    let mut clipboard = match system_clipboard() {
        Ok(cb) => cb,
        Err(e) => fail_clipboard(display, e),
    };
    match copy_to_system(&mut clipboard, display) {
        Ok(command) => print_quit_text(&copied_message(&command), settings.ui.accent),
        Err(e) => fail_clipboard(display, e),
    }

    Ok(())
}

fn init_logging(path: &Path, level: LevelFilter) {
    if let Err(e) = try_init_logging(path, level) {
        eprintln!("warning: logging disabled: {:#}", e);
    }
}

fn try_init_logging(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    Ftail::new()
        .single_file(path, true, level)
        .init()
        .map_err(|e| anyhow!("{:?}", e))
}

/// Unlike `ratatui::run`, a terminal that cannot be set up is returned as an
/// error so `main` can exit with code 1 instead of panicking.
fn run_picker(app: &mut App) -> io::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    drive(app, |app| {
        terminal.draw(|f| app.draw(f))?;
        read()
    })
}

/// Draw-and-read until the app reaches a terminal state. `step` renders the
/// current screen and returns the next terminal event.
fn drive<F>(app: &mut App, mut step: F) -> io::Result<()>
where
    F: FnMut(&mut App) -> io::Result<Event>,
{
    loop {
        let ev = step(app)?;
        if !app.handle_event(&ev) {
            break;
        }
    }
    Ok(())
}

fn print_quit_text(msg: &str, accent: u8) {
    println!("\n    {}\n\n", Colour::Fixed(accent).paint(msg));
}

fn fail_clipboard(display: &str, e: anyhow::Error) -> ! {
    error!("clipboard write failed: {:#}", e);
    eprintln!("Error writing to clipboard: {:#}", e);
    println!("{}", ssh::ssh_command_for(display));
    process::exit(1);
}
