use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lava_background::{BackgroundState, PositionAnimator, PresentationDriver};
use lava_config::Config;
use rand::{Rng, rngs::StdRng};
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::{Constraint, Layout},
    style::Stylize,
    text::{Line, Span},
};
use tracing::{info, warn};

use crate::screenshot;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App<R = StdRng> {
    /// Is the application running?
    running: bool,
    config: Config,
    driver: PresentationDriver<R>,
    background: BackgroundState,
    /// Paused by the user.
    paused: bool,
    /// Does the terminal have focus?
    focused: bool,
    /// Save the next drawn frame.
    screenshot_requested: bool,
    screenshot_dir: Option<PathBuf>,
    /// Last action result, shown in the help line.
    status: Option<String>,
    started: Instant,
}

impl App<StdRng> {
    /// Construct a new instance of [`App`] with randomly placed circles.
    pub fn new(config: Config) -> Self {
        let animator = PositionAnimator::from_entropy(config.palette.colors.iter().copied());
        Self::with_animator(config, animator)
    }
}

impl<R: Rng> App<R> {
    pub fn with_animator(config: Config, animator: PositionAnimator<R>) -> Self {
        let driver = PresentationDriver::new(animator, &config.timing());
        Self {
            running: false,
            config,
            driver,
            background: BackgroundState::new(),
            paused: false,
            focused: true,
            screenshot_requested: false,
            screenshot_dir: None,
            status: None,
            started: Instant::now(),
        }
    }

    /// Directory the `s` key saves screenshots to.
    pub fn with_screenshot_dir(mut self, dir: PathBuf) -> Self {
        self.screenshot_dir = Some(dir);
        self
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.start(self.elapsed_ms());
        while self.running {
            let now = self.elapsed_ms();
            self.driver.update(now);
            let completed = terminal.draw(|frame| self.render(frame, now))?;
            self.after_draw(completed.buffer);
            self.handle_crossterm_events()?;
        }
        self.driver.disappear();
        Ok(())
    }

    /// Mark the app running and show the background.
    fn start(&mut self, now_ms: u64) {
        self.running = true;
        self.sync_visibility(now_ms);
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// The background animates unless paused, or unfocused when configured
    /// to pause on focus loss.
    fn is_visible(&self) -> bool {
        !self.paused && (self.focused || !self.config.pause_on_focus_loss)
    }

    fn sync_visibility(&mut self, now_ms: u64) {
        self.driver.set_visible(self.is_visible(), now_ms);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, now_ms: u64) {
        self.background.render(
            frame,
            self.driver.displayed(now_ms),
            self.config.palette.background,
            self.driver.blur_radius(),
        );

        if !self.config.show_help {
            return;
        }

        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let mut spans: Vec<Span> = Vec::new();
        if self.paused {
            spans.push("paused  ".yellow().bold());
        }
        spans.extend([
            "q".bold().white(),
            " quit  ".dark_gray(),
            "space".bold().white(),
            " pause  ".dark_gray(),
            "r".bold().white(),
            " shuffle  ".dark_gray(),
            "e".bold().white(),
            " easing  ".dark_gray(),
            "s".bold().white(),
            " screenshot  ".dark_gray(),
            "w".bold().white(),
            " save config  ".dark_gray(),
            "h".bold().white(),
            " hide help".dark_gray(),
        ]);
        if let Some(status) = &self.status {
            spans.push("  ".into());
            spans.push(status.as_str().cyan());
        }

        frame.render_widget(Line::from(spans).centered(), help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame interval as timeout so animation keeps running.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.config.frame_interval())? {
            let now = self.elapsed_ms();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key, now),
                Event::FocusGained => self.on_focus_change(true, now),
                Event::FocusLost => self.on_focus_change(false, now),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent, now_ms: u64) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(now_ms),
            (_, KeyCode::Char('r')) => {
                self.driver.shuffle(now_ms);
            }
            (_, KeyCode::Char('e')) => self.cycle_easing(),
            (_, KeyCode::Char('h')) => self.config.show_help = !self.config.show_help,
            (_, KeyCode::Char('s')) => self.screenshot_requested = true,
            (_, KeyCode::Char('w')) => self.save_config(),
            _ => {}
        }
    }

    fn on_focus_change(&mut self, focused: bool, now_ms: u64) {
        self.focused = focused;
        self.sync_visibility(now_ms);
    }

    fn toggle_pause(&mut self, now_ms: u64) {
        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");
        self.sync_visibility(now_ms);
    }

    /// Switch to the next easing curve for upcoming moves.
    fn cycle_easing(&mut self) {
        let easing = self.driver.easing().next();
        self.driver.set_easing(easing);
        self.config.animation.easing = easing;
        self.status = Some(format!("easing: {easing}"));
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(()) => {
                info!("config saved");
                self.status = Some("config saved".to_string());
            }
            Err(e) => {
                warn!(error = %e, "failed to save config");
                self.status = Some(format!("save failed: {e}"));
            }
        }
    }

    /// Work on the frame just drawn: a pending screenshot is saved from it.
    fn after_draw(&mut self, buffer: &Buffer) {
        if std::mem::take(&mut self.screenshot_requested) {
            self.save_screenshot(buffer);
        }
    }

    fn save_screenshot(&mut self, buffer: &Buffer) {
        let Some(dir) = &self.screenshot_dir else {
            self.status = Some("no screenshot directory".to_string());
            return;
        };
        match screenshot::save(buffer, dir, "lava") {
            Ok(path) => {
                info!(path = %path.display(), "screenshot saved");
                self.status = Some(format!("saved {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "failed to save screenshot");
                self.status = Some(format!("screenshot failed: {e}"));
            }
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
