use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::{ApiError, Contributor, GitHubClient, LanguageClient, LanguageIssue};
use crate::config::Config;
use crate::ui::contributors::ContributorsScreen;
use crate::ui::wizard_view;
use crate::wizard::forms::{self, SubmitIntent};
use crate::wizard::{WizardAction, WizardScreen};

/// Results of async work arriving back on the event loop
enum AppEvent {
    LanguageChecked {
        field: String,
        seq: u64,
        result: Result<Vec<LanguageIssue>, ApiError>,
    },
    ContributorsFetched(Result<Vec<Contributor>, ApiError>),
}

enum Screen {
    Wizard(WizardScreen),
    Contributors(ContributorsScreen),
}

pub struct App {
    config: Config,
    screen: Screen,
    language_client: Option<Arc<LanguageClient>>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
    /// Message to print after the terminal is restored
    exit_message: Option<String>,
}

impl App {
    pub fn job_posting(config: Config, intent: SubmitIntent) -> Result<Self> {
        let form = forms::job_posting(intent);
        Self::with_wizard(config, form)
    }

    pub fn registration(config: Config) -> Result<Self> {
        let form = forms::registration();
        Self::with_wizard(config, form)
    }

    fn with_wizard(config: Config, form: forms::FormSpec) -> Result<Self> {
        let wizard = WizardScreen::new(
            form,
            Duration::from_millis(config.validation.debounce_ms),
            Duration::from_millis(config.ui.focus_settle_ms),
        );
        let language_client = Arc::new(LanguageClient::new(&config.server)?);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            screen: Screen::Wizard(wizard),
            language_client: Some(language_client),
            events_tx,
            events_rx,
            should_quit: false,
            exit_message: None,
        })
    }

    pub fn contributors(config: Config) -> Result<Self> {
        let screen = ContributorsScreen::new(
            config.github.owner.clone(),
            config.github.repo.clone(),
        );
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            screen: Screen::Contributors(screen),
            language_client: None,
            events_tx,
            events_rx,
            should_quit: false,
            exit_message: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.spawn_initial_fetches()?;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| match &mut self.screen {
                Screen::Wizard(wizard) => wizard_view::render(f, wizard),
                Screen::Contributors(screen) => screen.render(f),
            })?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key)?;
                    }
                }
            }

            self.drain_events();
            self.on_tick(Instant::now());
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        if let Some(message) = &self.exit_message {
            println!("{message}");
        }

        Ok(())
    }

    fn spawn_initial_fetches(&self) -> Result<()> {
        if let Screen::Contributors(_) = self.screen {
            let tx = self.events_tx.clone();
            let owner = self.config.github.owner.clone();
            let repo = self.config.github.repo.clone();
            let client = GitHubClient::new()?;
            tokio::spawn(async move {
                let result = client.fetch_contributors(&owner, &repo).await;
                let _ = tx.send(AppEvent::ContributorsFetched(result));
            });
        }
        Ok(())
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Result<()> {
        let mut submitted = None;
        match &mut self.screen {
            Screen::Wizard(wizard) => match wizard.handle_key(key, Instant::now()) {
                WizardAction::Quit => self.should_quit = true,
                WizardAction::Submitted { values } => submitted = Some(values),
                WizardAction::None => {}
            },
            Screen::Contributors(screen) => {
                if screen.handle_key(key) {
                    self.should_quit = true;
                }
            }
        }

        if let Some(values) = submitted {
            let path = self.save_submission(&values)?;
            tracing::info!(path = %path, "form submitted");
            self.exit_message = Some(format!("Submission saved to {path}"));
            self.should_quit = true;
        }
        Ok(())
    }

    /// Apply async results that finished since the last tick
    fn drain_events(&mut self) {
        while let Ok(app_event) = self.events_rx.try_recv() {
            match (app_event, &mut self.screen) {
                (
                    AppEvent::LanguageChecked { field, seq, result },
                    Screen::Wizard(wizard),
                ) => {
                    wizard.apply_language_result(&field, seq, result);
                }
                (AppEvent::ContributorsFetched(result), Screen::Contributors(screen)) => {
                    screen.apply_result(result);
                }
                _ => {}
            }
        }
    }

    /// Fire due debounced language checks as background tasks
    fn on_tick(&mut self, now: Instant) {
        let Screen::Wizard(wizard) = &mut self.screen else {
            return;
        };
        let Some(client) = &self.language_client else {
            return;
        };

        for request in wizard.on_tick(now) {
            let client = Arc::clone(client);
            let tx = self.events_tx.clone();
            tokio::spawn(async move {
                let result = client.check(&request.text).await;
                let _ = tx.send(AppEvent::LanguageChecked {
                    field: request.field,
                    seq: request.seq,
                    result,
                });
            });
        }
    }

    /// Write the collected form values as a JSON submission draft
    fn save_submission(&self, values: &[(String, String)]) -> Result<String> {
        let dir = self.config.state_path();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let map: serde_json::Map<String, serde_json::Value> = values
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        let body = serde_json::to_string_pretty(&serde_json::Value::Object(map))?;

        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = dir.join(format!("submission-{timestamp}.json"));
        fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path.display().to_string())
    }
}
