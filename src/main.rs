use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use smarty_stars::app::App;
use smarty_stars::config::AppConfig;
use smarty_stars::feedback::Feedback;
use smarty_stars::session::SessionState;
use smarty_stars::store::{MemoryStorage, SqliteStorage, Storage};
use smarty_stars::{input, logger, ui};
use std::io;
use tokio::sync::mpsc;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn open_storage(config: &AppConfig) -> Box<dyn Storage> {
    match SqliteStorage::open(&config.db_path) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            logger::log(&format!(
                "Could not open {}: {}. Progress will last for this session only",
                config.db_path.display(),
                e
            ));
            Box::new(MemoryStorage::new())
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::from_env();
    logger::init(&config.log_path);
    logger::log(&format!(
        "Starting: data_dir={} speech={:?} player={:?}",
        config.data_dir.display(),
        config.speech,
        config.player
    ));

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        logger::log(&format!("Could not create data dir: {}", e));
    }
    let session = SessionState::open(open_storage(&config))?;
    let feedback = Feedback::from_config(&config);
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(session, feedback, tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, rx).await;
    if !app.should_quit() {
        // Drawing failed; still stop feedback and land queued writes.
        app.quit();
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::log(&format!("Exited with error: {}", e));
    }
    logger::log("Shutdown complete");
    result
}

async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    mut rx: mpsc::UnboundedReceiver<smarty_stars::models::AppEvent>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut shown_title = String::new();

    loop {
        let title = app.title();
        if title != shown_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            shown_title = title;
        }

        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => input::handle_key(app, key),
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    app.quit();
                    return Err(e);
                }
                None => app.quit(),
            },
            Some(event) = rx.recv() => app.handle_event(event),
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
