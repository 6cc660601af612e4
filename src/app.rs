/// Main TUI application

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    Terminal,
};
use serde_json::json;
use std::io;
use std::time::{Duration, Instant};

use crate::core::{ram_hardware_description, MemorySampler, MemorySnapshot, Settings, SettingsStore, WindowPosition};
use crate::utils::{clamp_position, REFRESH_INTERVAL_SECS, WIDGET_HEIGHT, WIDGET_WIDTH};

pub struct App {
    store: SettingsStore,
    settings: Settings,
    sampler: MemorySampler,
    hardware_summary: String,
    last_refresh: Instant,
    refresh_interval: Duration,
    last_refresh_clock: DateTime<Local>,
    last_saved_position: WindowPosition,
    should_quit: bool,
}

impl App {
    pub fn new(store: SettingsStore) -> Self {
        let settings = store.load();
        let sampler = MemorySampler::new();

        // One blocking probe before the event loop starts; steady-state
        // refresh never shells out.
        let hardware_summary = ram_hardware_description(sampler.ram().total_bytes);

        let last_saved_position = settings.window_position;
        Self {
            store,
            settings,
            sampler,
            hardware_summary,
            last_refresh: Instant::now(),
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            last_refresh_clock: Local::now(),
            last_saved_position,
            should_quit: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn swap(&self) -> MemorySnapshot {
        self.sampler.swap()
    }

    pub fn hardware_summary(&self) -> &str {
        &self.hardware_summary
    }

    pub fn last_refresh_clock(&self) -> DateTime<Local> {
        self.last_refresh_clock
    }

    /// Header line: live RAM usage while tracking is on, the static
    /// hardware description otherwise. Computed per draw, so toggling takes
    /// effect immediately, without waiting for the next tick.
    pub fn header_text(&self) -> String {
        if self.settings.track_ram_usage {
            let ram = self.sampler.ram();
            format!(
                "RAM: {:.2} GB / {:.2} GB ({:.1}%)",
                ram.used_gb(),
                ram.total_gb(),
                ram.percent()
            )
        } else {
            self.hardware_summary.clone()
        }
    }

    pub fn swap_text(&self) -> String {
        let swap = self.sampler.swap();
        format!(
            "Swap Usage: {:.2} GB / {:.2} GB ({:.1}%)",
            swap.used_gb(),
            swap.total_gb(),
            swap.percent()
        )
    }

    pub fn toggle_always_on_top(&mut self) {
        self.settings.always_on_top = !self.settings.always_on_top;
        self.store.save("always_on_top", json!(self.settings.always_on_top));
    }

    pub fn toggle_draggable(&mut self) {
        self.settings.draggable = !self.settings.draggable;
        self.store.save("draggable", json!(self.settings.draggable));
    }

    pub fn toggle_track_ram(&mut self) {
        self.settings.track_ram_usage = !self.settings.track_ram_usage;
        self.store.save("track_ram_usage", json!(self.settings.track_ram_usage));
    }

    /// Move the widget by one step, honoring the draggable toggle and
    /// clamping to the drawable area.
    pub fn move_widget(&mut self, dx: i32, dy: i32, area: Rect) {
        if !self.settings.draggable {
            return;
        }
        let pos = &mut self.settings.window_position;
        pos.x = clamp_position(pos.x + dx, WIDGET_WIDTH, area.width);
        pos.y = clamp_position(pos.y + dy, WIDGET_HEIGHT, area.height);
    }

    fn refresh_data(&mut self) {
        self.sampler.refresh();
        self.persist_position_if_moved();
        self.last_refresh = Instant::now();
        self.last_refresh_clock = Local::now();
    }

    /// Position writes ride the per-second tick but are debounced to
    /// on-change: nothing is written while the widget sits still.
    fn persist_position_if_moved(&mut self) {
        if self.settings.window_position != self.last_saved_position {
            self.store
                .save("window_position.x", json!(self.settings.window_position.x));
            self.store
                .save("window_position.y", json!(self.settings.window_position.y));
            self.last_saved_position = self.settings.window_position;
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        loop {
            if self.last_refresh.elapsed() >= self.refresh_interval {
                self.refresh_data();
            }

            terminal.draw(|f| crate::screens::widget::render(f, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key_event) = event::read()? {
                    let area = terminal.size()?;
                    self.handle_key(key_event, area);
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Flush any pending position change before the terminal goes back
        self.persist_position_if_moved();

        Ok(())
    }

    fn handle_key(&mut self, key_event: KeyEvent, area: Rect) {
        // Windows delivers Release events as well; dispatching on them
        // would fire every toggle twice per keypress
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') => self.toggle_always_on_top(),
            KeyCode::Char('d') => self.toggle_draggable(),
            KeyCode::Char('r') => self.toggle_track_ram(),
            KeyCode::Left => self.move_widget(-1, 0, area),
            KeyCode::Right => self.move_widget(1, 0, area),
            KeyCode::Up => self.move_widget(0, -1, area),
            KeyCode::Down => self.move_widget(0, 1, area),
            _ => {}
        }
    }
}
