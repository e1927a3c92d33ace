use clap::{error::ErrorKind, CommandFactory, Parser};
use clawtcha::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    ui,
};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// the reverse CAPTCHA: prove you are not a human
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Six timed challenges that are trivial for software and torture for people. Score high enough and you may be certified non-meatbag."
)]
pub struct Cli {
    /// milliseconds between ticks (timer resolution and animation rate)
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// practice mode: run every challenge without a time limit
    #[clap(long)]
    untimed: bool,

    /// read configuration from this file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the merged configuration back to the config file
    #[clap(long)]
    save_config: bool,

    /// write logs to this file instead of the default location
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// CLI values win over the file
    fn merge_into(&self, mut cfg: Config) -> Config {
        if let Some(ms) = self.tick_rate_ms {
            cfg.tick_rate_ms = ms;
        }
        if self.untimed {
            cfg.untimed = true;
        }
        cfg
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(AppDirs::log_path)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_path() {
        if let Err(e) = logging::init(&path, "info") {
            eprintln!("clawtcha: logging disabled: {e}");
        }
    }

    let store = cli.config_store();
    let config = cli.merge_into(store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e.to_string()).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "configuration saved");
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(config.tick_rate_ms),
    );
    let res = run(&mut terminal, &mut app, runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        warn!(error = %e, "exited with error");
    }
    res
}

fn run<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.set_viewport(size.width, size.height);
    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit() {
        let event = runner.step();
        if let AppEvent::Resize = event {
            let size = terminal.size()?;
            app.set_viewport(size.width, size.height);
        }
        app.handle_event(event);
        terminal.draw(|f| ui::draw(app, f))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use clawtcha::runtime::TestEventSource;
    use clawtcha::session::SessionState;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["clawtcha"]);

        assert_eq!(cli.tick_rate_ms, None);
        assert!(!cli.untimed);
        assert_eq!(cli.config, None);
        assert!(!cli.save_config);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::parse_from([
            "clawtcha",
            "--tick-rate-ms",
            "50",
            "--untimed",
            "--config",
            "/tmp/c.json",
            "--save-config",
            "--log-file",
            "/tmp/c.log",
        ]);

        assert_eq!(cli.tick_rate_ms, Some(50));
        assert!(cli.untimed);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(cli.save_config);
        assert_eq!(cli.log_path(), Some(PathBuf::from("/tmp/c.log")));
    }

    #[test]
    fn test_cli_rejects_non_numeric_tick_rate() {
        assert!(Cli::try_parse_from(["clawtcha", "--tick-rate-ms", "fast"]).is_err());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let file = Config {
            tick_rate_ms: 250,
            untimed: false,
            ..Default::default()
        };

        let cli = Cli::parse_from(["clawtcha", "--tick-rate-ms", "40", "--untimed"]);
        let merged = cli.merge_into(file.clone());
        assert_eq!(merged.tick_rate_ms, 40);
        assert!(merged.untimed);

        let cli = Cli::parse_from(["clawtcha"]);
        assert_eq!(cli.merge_into(file.clone()), file);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["clawtcha", "--config", "/tmp/elsewhere.json"]);
        assert_eq!(
            cli.config_store().path(),
            PathBuf::from("/tmp/elsewhere.json").as_path()
        );
    }

    #[test]
    fn test_run_loop_quits_on_escape() {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(5));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(&Config::default());

        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();

        run(&mut terminal, &mut app, runner).unwrap();
        assert!(app.should_quit());
        assert_eq!(app.session.state(), SessionState::Intro);
    }
}
