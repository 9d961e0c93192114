use crate::catalog::{App, DataProvider};
use crate::schedule::{ScheduleKind, ScheduledCleanup};

/// Built-in demo device: eight apps and three seed schedules.
pub struct SampleCatalog;

fn app(
    id: &str,
    name: &str,
    package_name: &str,
    icon: &str,
    size: &str,
    last_used: &str,
    is_running: bool,
    cache_size: &str,
) -> App {
    App {
        id: id.into(),
        name: name.into(),
        package_name: package_name.into(),
        icon: icon.into(),
        size: size.into(),
        last_used: last_used.into(),
        is_running: Some(is_running),
        cache_size: Some(cache_size.into()),
    }
}

fn schedule(
    id: &str,
    name: &str,
    kind: ScheduleKind,
    descriptor: &str,
    enabled: bool,
    apps: &[&str],
) -> ScheduledCleanup {
    ScheduledCleanup {
        id: id.into(),
        name: name.into(),
        kind,
        schedule: descriptor.into(),
        enabled,
        selected_apps: apps.iter().map(|s| s.to_string()).collect(),
        days: Vec::new(),
    }
}

impl DataProvider for SampleCatalog {
    fn name(&self) -> &str {
        "sample"
    }

    fn list_applications(&self) -> Vec<App> {
        vec![
            app("1", "WhatsApp", "com.whatsapp", "💬", "156 MB", "2 min ago", true, "45 MB"),
            app("2", "Instagram", "com.instagram.android", "📷", "234 MB", "15 min ago", true, "78 MB"),
            app("3", "Chrome", "com.android.chrome", "🌐", "189 MB", "1 hour ago", false, "156 MB"),
            app("4", "YouTube", "com.google.android.youtube", "📺", "312 MB", "3 hours ago", true, "234 MB"),
            app("5", "Spotify", "com.spotify.music", "🎵", "198 MB", "5 hours ago", false, "89 MB"),
            app("6", "Facebook", "com.facebook.katana", "📘", "287 MB", "1 day ago", false, "123 MB"),
            app("7", "TikTok", "com.zhiliaoapp.musically", "🎬", "267 MB", "2 days ago", false, "145 MB"),
            app("8", "Gmail", "com.google.android.gm", "📧", "134 MB", "3 days ago", true, "67 MB"),
        ]
    }

    fn list_scheduled_cleanups(&self) -> Vec<ScheduledCleanup> {
        vec![
            schedule("1", "Daily cleanup", ScheduleKind::Cache, "Daily at 3:00 AM", true, &["1", "2", "3"]),
            schedule("2", "Weekly shutdown", ScheduleKind::Apps, "Weekly on Sunday", false, &["4", "5", "6"]),
            schedule("3", "Full cleanup", ScheduleKind::Both, "Monthly", true, &["1", "2", "3", "4", "5"]),
        ]
    }
}
