//! Calclue CLI - Preview math-mode block decorations in the terminal

mod io;
mod preview;
mod ui;

use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use calclue_core::{CalcluePlugin, MarkerAlignment};

use crate::io::FileStore;
use crate::preview::Preview;

#[derive(Parser)]
#[command(name = "calclue")]
#[command(author, version, about = "Preview ::: math-mode block decorations", long_about = None)]
struct Cli {
    /// Document to scan
    file: PathBuf,

    /// Print the annotations as JSON instead of opening the preview
    #[arg(long)]
    json: bool,

    /// Settings file (defaults to ~/.calclue/data.json)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Slice start markers after leading whitespace for this run
    #[arg(long)]
    trimmed_markers: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let store = match cli.settings {
        Some(path) => FileStore::new(path),
        None => FileStore::default_location()?,
    };
    log::debug!("settings file: {}", store.path().display());

    let mut plugin = CalcluePlugin::on_load(&store);
    if cli.trimmed_markers {
        let mut settings = plugin.settings.clone();
        settings.marker_alignment = MarkerAlignment::Trimmed;
        plugin.apply_settings(settings);
    }

    let doc = io::load_file(&cli.file)?;

    if cli.json {
        let extension = plugin.extension();
        let view = extension.create(&doc);
        let json = calclue_core::to_json(&doc, view.decorations(), Some(extension.report(&doc)))?;
        println!("{json}");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut preview = Preview::new(plugin, doc);
    preview.set_status(&format!("Loaded {}", cli.file.display()));

    // Main loop
    let res = run_preview(&mut terminal, &mut preview, &cli.file);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_preview<B: Backend>(
    terminal: &mut Terminal<B>,
    preview: &mut Preview,
    path: &Path,
) -> Result<()> {
    while preview.running {
        terminal.draw(|f| ui::draw(f, preview))?;

        if let Event::Key(key) = event::read()? {
            // Clear status on any key
            preview.clear_status();

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => preview.running = false,
                KeyCode::Char('j') | KeyCode::Down => preview.scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => preview.scroll_up(),
                KeyCode::Char('g') => preview.scroll_to_top(),
                KeyCode::Char('G') => preview.scroll_to_bottom(),
                KeyCode::Char('t') => preview.toggle_alignment(),
                KeyCode::Char('r') => match io::load_file(path) {
                    Ok(doc) => {
                        preview.reload(doc);
                        preview.set_status(&format!("Reloaded {}", path.display()));
                    }
                    Err(e) => {
                        log::warn!("reload failed: {e:#}");
                        preview.set_status(&format!("Error: {}", e));
                    }
                },
                _ => {}
            }
        }
    }
    Ok(())
}
