pub mod clipboard;
pub mod controller;
pub mod event;
pub mod feed;
pub mod layout;
pub mod list_cursor;
pub mod menu;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

use crate::api::{Page, User};
use crate::app::{AppContext, Result};
use crate::config::Config;

use self::controller::{NavigationController, Origin, Screen};
use self::event::{AppEvent, EventHandler};
use self::feed::FeedKind;
use self::menu::MenuChoice;

type Tui = Terminal<CrosstermBackend<Stdout>>;

enum LoopEvent {
    Input(AppEvent),
    Page(Result<Page>),
}

/// Browses one list, started from a subcommand. The first page is fetched
/// before the terminal switches to the alternate screen.
pub async fn run(ctx: Arc<AppContext>, user: User, kind: FeedKind, limit: u8) -> Result<()> {
    let mut controller = NavigationController::new(ctx.clone(), user, Origin::Command);

    println!("Fetching {}...", kind.noun());
    if !controller.open(kind, limit).await? {
        println!("No {} found.", kind.noun());
        return Ok(());
    }

    browse(&mut controller, &ctx.config).await
}

/// Menu loop: pick a list, browse it, come back.
pub async fn run_menu(ctx: Arc<AppContext>, user: User) -> Result<()> {
    let mut controller = NavigationController::new(ctx.clone(), user.clone(), Origin::Menu);

    loop {
        let choice = {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            menu::prompt(&mut input, &mut io::stdout(), &user)?
        };

        let kind = match choice {
            MenuChoice::Quit => return Ok(()),
            MenuChoice::Open(kind) => kind,
        };

        println!("Fetching {}...", kind.noun());
        match controller.open(kind, ctx.config.limits.for_kind(kind)).await {
            Ok(true) => browse(&mut controller, &ctx.config).await?,
            Ok(false) => println!("No {} found.", kind.noun()),
            Err(e) => eprintln!("Error: {}", e.one_line()),
        }

        if controller.screen() == Screen::Exiting {
            return Ok(());
        }
    }
}

async fn browse(controller: &mut NavigationController, config: &Config) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, controller, config).await;
    if let Err(e) = &result {
        warn!(error = %e, "Event loop stopped");
        controller.shutdown();
    }
    restore_terminal(&mut terminal)?;

    if let Some(message) = controller.take_save_error() {
        eprintln!("Warning: {}", message);
    }
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Tui,
    controller: &mut NavigationController,
    config: &Config,
) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    while controller.is_browsing() {
        terminal.draw(|frame| layout::render(frame, controller, &config.colors))?;

        let event = tokio::select! {
            event = events.next() => LoopEvent::Input(event?),
            page = controller.background_page() => LoopEvent::Page(page),
        };

        match event {
            LoopEvent::Input(AppEvent::Key(key)) => controller.handle_key(key).await,
            LoopEvent::Input(AppEvent::Resize) => {}
            LoopEvent::Input(AppEvent::Tick) => controller.tick(),
            LoopEvent::Page(page) => {
                debug!(ok = page.is_ok(), "Background page arrived");
                controller.absorb_page(page);
            }
        }
    }

    Ok(())
}
