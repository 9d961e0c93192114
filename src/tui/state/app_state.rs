use crate::catalog::Catalog;
use crate::config::Config;
use crate::queue::{SessionClock, TaskQueue};
use crate::schedule::ScheduleStore;
use crate::selection::SelectionController;
use crate::tui::state::{AppMode, PickerState, ProcessingState, ScheduleFormState, Tab};
use ratatui::widgets::ListState;

pub struct App {
    pub config: Config,
    pub catalog: Catalog,
    pub queue: TaskQueue,
    pub clock: SessionClock,
    pub schedules: ScheduleStore,
    pub tab: Tab,
    pub mode: AppMode,
    pub prev_mode: Option<AppMode>,
    pub should_quit: bool,
    pub list_state: ListState,
    pub kill: SelectionController,
    pub cache: SelectionController,
    pub quick: SelectionController,
    pub form: ScheduleFormState,
    pub picker: Option<PickerState>,
    pub processing: Option<ProcessingState>,
    pub export_requested: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            queue: TaskQueue::from_config(&config.queue),
            clock: SessionClock::start(),
            schedules: ScheduleStore::new(catalog.seed_schedules().to_vec()),
            kill: SelectionController::kill(&catalog),
            cache: SelectionController::cache(&catalog),
            quick: SelectionController::quick_clean(&catalog),
            config,
            catalog,
            tab: Tab::default(),
            mode: AppMode::Tabs,
            prev_mode: None,
            should_quit: false,
            list_state,
            form: ScheduleFormState::default(),
            picker: None,
            processing: None,
            export_requested: false,
            status: None,
        }
    }
}
