use crate::settings::{SettingKey, Settings};
use crate::tui::logic::{navigate_down, navigate_up};
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

/// Rows of the settings tab: every toggle, then the two sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Toggle(SettingKey),
    Interval,
    MaxCache,
}

pub fn settings_rows() -> Vec<SettingsRow> {
    SettingKey::ALL
        .into_iter()
        .map(SettingsRow::Toggle)
        .chain([SettingsRow::Interval, SettingsRow::MaxCache])
        .collect()
}

pub struct SettingsContext<'a> {
    pub list_state: &'a mut ListState,
    pub settings: &'a mut Settings,
    pub export_requested: &'a mut bool,
}

pub fn handle_settings_key(ctx: &mut SettingsContext, code: KeyCode) -> Result<()> {
    let rows = settings_rows();
    let focused = ctx.list_state.selected().and_then(|i| rows.get(i).copied());

    match (code, focused) {
        (KeyCode::Up, _) => navigate_up(ctx.list_state),
        (KeyCode::Down, _) => navigate_down(ctx.list_state, rows.len()),
        (KeyCode::Char(' ') | KeyCode::Enter, Some(SettingsRow::Toggle(key))) => {
            ctx.settings.toggle(key)
        }
        (KeyCode::Left, Some(SettingsRow::Interval)) => ctx.settings.step_interval(-1),
        (KeyCode::Right, Some(SettingsRow::Interval)) => ctx.settings.step_interval(1),
        (KeyCode::Left, Some(SettingsRow::MaxCache)) => ctx.settings.step_max_cache(-1),
        (KeyCode::Right, Some(SettingsRow::MaxCache)) => ctx.settings.step_max_cache(1),
        (KeyCode::Char('r'), _) => ctx.settings.reset(),
        (KeyCode::Char('e'), _) => *ctx.export_requested = true,
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut ListState, settings: &mut Settings, code: KeyCode) -> bool {
        let mut export = false;
        let mut ctx = SettingsContext {
            list_state: state,
            settings,
            export_requested: &mut export,
        };
        handle_settings_key(&mut ctx, code).unwrap();
        export
    }

    #[test]
    fn test_toggle_and_slide() {
        let mut state = ListState::default();
        state.select(Some(0));
        let mut settings = Settings::default();

        press(&mut state, &mut settings, KeyCode::Char(' '));
        assert!(!settings.auto_clean);

        state.select(Some(8));
        press(&mut state, &mut settings, KeyCode::Right);
        assert_eq!(settings.clean_interval_hours, 7);

        press(&mut state, &mut settings, KeyCode::Down);
        press(&mut state, &mut settings, KeyCode::Left);
        assert_eq!(settings.max_cache_size_mb, 75);

        // arrows do nothing on toggle rows
        state.select(Some(1));
        press(&mut state, &mut settings, KeyCode::Right);
        assert!(settings.auto_connect_adb);
    }

    #[test]
    fn test_reset_and_export() {
        let mut state = ListState::default();
        state.select(Some(4));
        let mut settings = Settings::default();
        press(&mut state, &mut settings, KeyCode::Enter);
        assert!(settings.deep_scan);

        press(&mut state, &mut settings, KeyCode::Char('r'));
        assert_eq!(settings, Settings::default());
        assert!(press(&mut state, &mut settings, KeyCode::Char('e')));
    }
}
