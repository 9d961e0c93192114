#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Tabs,
    ScheduleForm,
    AppPicker,
    Processing,
    Help,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Home,
    Kill,
    Cache,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Kill, Tab::Cache, Tab::Settings];

    pub fn index(self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Kill => 1,
            Tab::Cache => 2,
            Tab::Settings => 3,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Kill => "Kill Apps",
            Tab::Cache => "Clear Cache",
            Tab::Settings => "Settings",
        }
    }
}
