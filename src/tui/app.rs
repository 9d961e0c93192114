use crate::config::Config;
use crate::tui::controller::apps::SelectionKeyContext;
use crate::tui::controller::common::{HelpContext, ProcessingContext};
use crate::tui::controller::home::HomeContext;
use crate::tui::controller::schedule_form::{PickerContext, ScheduleFormContext};
use crate::tui::controller::settings::SettingsContext;
use crate::tui::controller::{
    handle_help_key, handle_home_key, handle_picker_key, handle_processing_key,
    handle_schedule_form_key, handle_selection_key, handle_settings_key, settings_rows,
};
use crate::tui::logic::clamp_cursor;
use crate::tui::state::{App, AppMode, Tab};
use crate::tui::view::components::footer::render_tab_footer;
use crate::tui::view::components::modal::{
    render_help_modal, render_processing_modal, ProcessingModalData,
};
use crate::tui::view::{
    render_header, render_home, render_picker, render_schedule_form, render_selection,
    render_settings, HomeData,
};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{backend::Backend, Terminal};
use std::fs;
use std::time::Duration;
use tracing::{info, warn};

impl App {
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        while !self.should_quit {
            self.tick();

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers)?;
                    }
                }
            }
            if self.export_requested {
                self.export_settings();
            }
        }

        Ok(())
    }

    /// Advances the queue to the current session time and closes the
    /// processing modal once it has been open long enough.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.queue.advance(now);

        let ttl = Duration::from_secs(self.config.ui.processing_modal_secs);
        if self
            .processing
            .as_ref()
            .is_some_and(|p| p.is_expired(now, ttl))
        {
            self.processing = None;
            if self.mode == AppMode::Processing {
                self.mode = AppMode::Tabs;
            }
        }

        let len = self.list_len();
        clamp_cursor(&mut self.list_state, len);
    }

    fn list_len(&self) -> usize {
        match self.tab {
            Tab::Home => self.schedules.len(),
            Tab::Kill => self.kill.candidate_count(),
            Tab::Cache => self.cache.candidate_count(),
            Tab::Settings => settings_rows().len(),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.list_state.select(Some(0));
        }
    }

    fn export_settings(&mut self) {
        self.export_requested = false;
        let path = Config::data_dir().join("settings-export.json");
        let result = self.config.settings.export_json().and_then(|json| {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, json)?;
            Ok(())
        });
        self.status = Some(match result {
            Ok(()) => {
                info!(path = %path.display(), "exported settings");
                format!("Settings exported to {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "settings export failed");
                format!("Export failed: {}", e)
            }
        });
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match self.mode {
            AppMode::Tabs => self.handle_tabs_key(code),
            AppMode::ScheduleForm => {
                let mut ctx = ScheduleFormContext {
                    form: &mut self.form,
                    schedules: &mut self.schedules,
                    catalog: &self.catalog,
                    picker: &mut self.picker,
                    mode: &mut self.mode,
                    status: &mut self.status,
                };
                handle_schedule_form_key(&mut ctx, code)
            }
            AppMode::AppPicker => {
                let mut ctx = PickerContext {
                    picker: &mut self.picker,
                    form: &mut self.form,
                    mode: &mut self.mode,
                };
                handle_picker_key(&mut ctx, code)
            }
            AppMode::Processing => {
                let mut ctx = ProcessingContext {
                    mode: &mut self.mode,
                    processing: &mut self.processing,
                };
                handle_processing_key(&mut ctx, code)
            }
            AppMode::Help => {
                let mut ctx = HelpContext {
                    mode: &mut self.mode,
                    prev_mode: &mut self.prev_mode,
                };
                handle_help_key(&mut ctx, code)
            }
        }
    }

    fn handle_tabs_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('?') => {
                self.prev_mode = Some(self.mode);
                self.mode = AppMode::Help;
                return Ok(());
            }
            KeyCode::Tab => {
                self.switch_tab(self.tab.next());
                return Ok(());
            }
            KeyCode::BackTab => {
                self.switch_tab(self.tab.prev());
                return Ok(());
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[idx]);
                return Ok(());
            }
            _ => {}
        }

        let now = self.clock.now();
        match self.tab {
            Tab::Home => {
                let mut ctx = HomeContext {
                    list_state: &mut self.list_state,
                    schedules: &mut self.schedules,
                    quick: &mut self.quick,
                    queue: &mut self.queue,
                    now,
                    form: &mut self.form,
                    processing: &mut self.processing,
                    mode: &mut self.mode,
                };
                handle_home_key(&mut ctx, code)
            }
            Tab::Kill | Tab::Cache => {
                let selection = if self.tab == Tab::Kill {
                    &mut self.kill
                } else {
                    &mut self.cache
                };
                let mut ctx = SelectionKeyContext {
                    list_state: &mut self.list_state,
                    selection,
                    queue: &mut self.queue,
                    now,
                    high_cache_threshold_mb: self.config.selection.high_cache_threshold_mb,
                    processing: &mut self.processing,
                    mode: &mut self.mode,
                };
                handle_selection_key(&mut ctx, code)
            }
            Tab::Settings => {
                let mut ctx = SettingsContext {
                    list_state: &mut self.list_state,
                    settings: &mut self.config.settings,
                    export_requested: &mut self.export_requested,
                };
                handle_settings_key(&mut ctx, code)
            }
        }
    }

    fn render(&mut self, f: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(f.area());

        render_header(f, chunks[0], self.tab, &self.catalog, &self.queue);
        match self.tab {
            Tab::Home => {
                let data = HomeData {
                    catalog: &self.catalog,
                    schedules: &self.schedules,
                    queue: &self.queue,
                };
                render_home(f, chunks[1], &mut self.list_state, &data);
            }
            Tab::Kill => render_selection(
                f,
                chunks[1],
                &mut self.list_state,
                &self.kill,
                &self.queue,
                self.config.selection.high_cache_threshold_mb,
            ),
            Tab::Cache => render_selection(
                f,
                chunks[1],
                &mut self.list_state,
                &self.cache,
                &self.queue,
                self.config.selection.high_cache_threshold_mb,
            ),
            Tab::Settings => {
                render_settings(f, chunks[1], &mut self.list_state, &self.config.settings)
            }
        }
        render_tab_footer(f, chunks[2], self.tab, self.status.as_deref());

        match self.mode {
            AppMode::ScheduleForm => render_schedule_form(f, &self.form, &self.catalog),
            AppMode::AppPicker => {
                render_schedule_form(f, &self.form, &self.catalog);
                if let Some(picker) = self.picker.as_mut() {
                    render_picker(f, picker);
                }
            }
            AppMode::Processing => {
                if let Some(processing) = &self.processing {
                    let ttl = self.config.ui.processing_modal_secs;
                    let open = self.clock.now().saturating_sub(processing.opened_at);
                    render_processing_modal(
                        f,
                        &ProcessingModalData {
                            queue: &self.queue,
                            processing,
                            closes_in_secs: ttl.saturating_sub(open.as_secs()),
                        },
                    );
                }
            }
            AppMode::Help => render_help_modal(f),
            AppMode::Tabs => {}
        }
    }
}
