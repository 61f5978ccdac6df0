use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{Backend, CrosstermBackend, Terminal};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use plugandtest_portal::auth::{DemoIdentityProvider, SessionManager, INVITATION_LIFETIME_DAYS};
use plugandtest_portal::logging;
use plugandtest_portal::portal::{FixtureDataSource, PortalDataSource};
use plugandtest_portal::settings::SettingsManager;
use plugandtest_portal::tui::PortalApp;

#[derive(Parser)]
#[command(
    name = "plugandtest-portal",
    version,
    about = "Plug And Test client portal for the terminal",
    long_about = None
)]
struct Cli {
    /// Invitation token from the setup email; opens password creation
    #[arg(short, long, conflicts_with = "invite")]
    token: Option<String>,

    /// Issue a demo invitation for this address and open password creation with it
    #[arg(long, value_name = "EMAIL")]
    invite: Option<String>,

    /// Switch to this theme and remember it (Light, Dark, High Contrast)
    #[arg(long)]
    theme: Option<String>,

    /// Log level (error, warn, info, debug, trace); overrides settings
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = SettingsManager::new().unwrap_or_else(|e| {
        eprintln!("Could not locate settings directory, using defaults: {}", e);
        SettingsManager::at_path(std::env::temp_dir().join("plugandtest-portal-settings.json"))
    });

    logging::init(cli.log_level.as_deref().unwrap_or(settings.log_level()))?;
    log::info!("Settings loaded from {}", settings.path().display());

    if let Some(theme) = cli.theme.as_deref() {
        settings.set_theme(theme)?;
    }

    // Put the terminal back before the panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        log::error!("PANIC: {}", panic_info);
        default_hook(panic_info);
    }));

    let provider = Arc::new(DemoIdentityProvider::new(settings.demo_provider_config()));
    let invite_token = match cli.invite.as_deref() {
        Some(email) => Some(
            provider
                .issue_invitation(
                    email,
                    "New Client",
                    chrono::Duration::days(INVITATION_LIFETIME_DAYS),
                )
                .await,
        ),
        None => cli.token,
    };
    let session = SessionManager::start(provider, settings.session_config());
    let data: Arc<dyn PortalDataSource> = Arc::new(FixtureDataSource::bundled()?);
    let app = PortalApp::new(session, data, settings.theme_name(), invite_token);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, DisableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("Application error: {:?}", err);
        eprintln!("Application error: {:?}", err);
    }

    log::info!("Portal closed");
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: PortalApp) -> Result<()> {
    app.initialize().await?;

    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key).await?;

                    if app.should_quit() {
                        break;
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.update().await?;
            last_tick = Instant::now();
        }
    }

    Ok(())
}
