use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use peer_lending_map::{
    config::{CliArgs, Config},
    export::GeoJsonSurface,
    logging,
    presenter::{Changes, MapPresenter},
    state::AppState,
    terminal, ui, GeometrySource,
};

fn main() -> Result<()> {
    let config = Config::try_from(CliArgs::parse())?;
    let _guard = logging::init(&config.log_file, config.verbose)?;

    let source = GeometrySource::load(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;
    let presenter = MapPresenter::new(source, config.selection);

    if let Some(path) = &config.export {
        let mut surface = GeoJsonSurface::new();
        presenter.publish(&mut surface, Changes::ALL);
        surface
            .write(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {} features to {}", surface.feature_count(), path.display());
        return Ok(());
    }

    let mut state = AppState::new(presenter);

    enable_raw_mode()?;
    let _restore = terminal::restore_on_drop();
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = run(&mut terminal, &mut state);
    info!("exiting");
    outcome
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = event::read()? {
                if state.handle_input(code) {
                    return Ok(());
                }
            }
        }
    }
}
