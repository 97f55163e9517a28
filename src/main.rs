//! CapyTweaks - Toggleable desktop tweaks for Hyprland
//!
//! Single-threaded UI loop: background threads (WM listener, settings
//! watcher) post events on the bus, and every tick drains them, advances
//! fades and writes the corner overlay when it changed.

mod event_bus;
mod services;
mod stage;

use capy_tweaks::layout::LayoutSource;
use capy_tweaks::modules::{Direction, WorkspaceNavigator, WraparoundNeighbors};
use capy_tweaks::settings::keys;
use capy_tweaks::{SettingsStore, TweakContext, default_registry};
use clap::{Parser, Subcommand, ValueEnum};
use event_bus::HostEvent;
use log::{error, info, warn};
use services::layout::HostLayout;
use services::settings::SettingsService;
use services::shell::HostShell;
use stage::{SoftwareStage, canvas_bounds};
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

const EVENT_POLL_INTERVAL_MS: u64 = 50;
const OVERLAY_FILE: &str = "overlay.png";

#[derive(Parser)]
#[command(
    name = "CapyTweaks",
    version,
    about = "Toggleable desktop tweaks for Hyprland"
)]
struct Cli {
    /// Settings file (default: $XDG_CONFIG_HOME/CapyTweaks/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tweaks until interrupted (default)
    Run,
    /// Switch to the neighboring workspace
    Workspace {
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Store a setting, e.g. `set screen-corners true`
    Set { key: String, value: String },
    /// Print every setting
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(cli.config),
        Commands::Workspace { direction } => switch_workspace(cli.config, direction.into()),
        Commands::Set { key, value } => {
            let settings = SettingsService::open(cli.config)?;
            let stored = settings.set(&key, &value)?;
            println!("{} = {:?}", key, stored);
            Ok(())
        }
        Commands::List => {
            let settings = SettingsService::open(cli.config)?;
            for (key, value) in settings.store().values() {
                println!("{} = {}", key, serde_json::to_string(&value)?);
            }
            Ok(())
        }
    }
}

/// One-shot workspace switch honoring the wraparound setting.
fn switch_workspace(config: Option<PathBuf>, direction: Direction) -> Result<(), Box<dyn Error>> {
    let settings = SettingsService::open(config)?;
    let backend = services::wm::connect().ok_or("No supported window manager detected")?;
    let navigator = WorkspaceNavigator::new(Rc::new(HostShell::new(backend)));

    if settings.store().get_boolean(keys::WORKSPACE_WRAPAROUND) {
        navigator.set_strategy(Rc::new(WraparoundNeighbors));
    }

    match navigator.navigate(direction) {
        Some(index) => info!("Switched to workspace {}", index + 1),
        None => info!("Already at the edge, staying"),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn run(config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    info!("Starting CapyTweaks...");

    let mut settings = SettingsService::open(config)?;
    if let Err(e) = settings.watch() {
        warn!("Settings will not reload automatically: {}", e);
    }

    let backend = services::wm::connect().ok_or("No supported window manager detected")?;

    let layout = Rc::new(HostLayout::new());
    let shell = Rc::new(HostShell::new(backend.clone()));
    let stage = Rc::new(SoftwareStage::new());
    let ctx = TweakContext::new(settings.store(), layout.clone(), stage.clone(), shell.clone());

    let navigator = Rc::new(WorkspaceNavigator::new(shell.clone()));
    let mut registry = default_registry(&ctx, navigator);
    registry.start();

    // Subscribe before the listener starts so no hotplug is missed.
    let mut rx = event_bus::subscribe();
    services::wm::start_listener(backend.as_ref());

    layout.update(backend.monitors());
    stage.set_panel_origin(layout.panel_origin().0, layout.panel_origin().1);

    let overlay_path = dirs::cache_dir().map(|dir| dir.join("CapyTweaks").join(OVERLAY_FILE));
    if let Some(parent) = overlay_path.as_ref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(parent)?;
    }

    info!("Available tweaks: {}", registry.keys().join(", "));
    info!("CapyTweaks running: {}", registry.active_modules().join(", "));

    let mut ticker = tokio::time::interval(Duration::from_millis(EVENT_POLL_INTERVAL_MS));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, shutting down");
                break;
            }
            _ = ticker.tick() => {
                for event in event_bus::drain_latest(&mut rx) {
                    match event {
                        HostEvent::MonitorsChanged => {
                            layout.update(backend.monitors());
                            let (x, y) = layout.panel_origin();
                            stage.set_panel_origin(x, y);
                        }
                        HostEvent::WindowUrgent(address) => shell.window_urgent(&address),
                        HostEvent::SettingsChanged => {
                            settings.reload();
                        }
                    }
                }

                stage.tick(Instant::now());
                if stage.take_changed() {
                    if let Some(path) = &overlay_path {
                        let (x, y, width, height) = canvas_bounds(&layout.monitors());
                        if let Err(e) = stage.compose((x, y), width, height).save(path) {
                            error!("Failed to write overlay {:?}: {}", path, e);
                        }
                    }
                }
            }
        }
    }

    registry.stop();
    info!("CapyTweaks stopped");
    Ok(())
}
