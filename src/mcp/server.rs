use crate::catalog::{App, Catalog};
use crate::config::Config;
use crate::queue::{
    OperationKind, QueueDriver, QueueEntry, QueueProgress, SessionClock, TaskQueue,
};
use crate::schedule::{ScheduleDraft, ScheduleStore, ScheduledCleanup, Weekday};
use crate::selection::SelectionController;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars::{self, JsonSchema},
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListAppsInput {
    /// `running` or `cache`; every app when omitted
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KillAppsInput {
    #[serde(default)]
    pub app_ids: Vec<String>,
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearCacheInput {
    #[serde(default)]
    pub app_ids: Vec<String>,
    #[serde(default)]
    pub all: bool,
    /// Select apps above the configured high-cache threshold
    #[serde(default)]
    pub high: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueueStatusInput {
    /// `kill` or `cache`
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdInput {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateScheduleInput {
    pub name: String,
    /// Free-text time, e.g. `03:00`
    pub time: String,
    /// Weekday names such as `mon` or `sunday`
    pub days: Vec<String>,
    #[serde(default)]
    pub kill_apps: Option<Vec<String>>,
    #[serde(default)]
    pub cache_apps: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppOutput {
    #[serde(flatten)]
    pub app: App,
    pub cache_mb: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueuedOutput {
    pub queued: Vec<QueueEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueStatusOutput {
    pub progress: QueueProgress,
    pub entries: Vec<QueueEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutput {
    pub toggled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduledCleanup>,
}

struct Session {
    config: Config,
    catalog: Catalog,
    schedules: Mutex<ScheduleStore>,
    driver: QueueDriver,
}

#[derive(Clone)]
pub struct AppToolsServer {
    tool_router: ToolRouter<Self>,
    session: Arc<Session>,
}

fn invalid(e: impl std::fmt::Display) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

#[tool_router]
impl AppToolsServer {
    /// Must be called inside a tokio runtime; spawns the queue driver.
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let queue = TaskQueue::from_config(&config.queue);
        let driver = QueueDriver::spawn(Arc::new(Mutex::new(queue)), SessionClock::start());
        let schedules = ScheduleStore::new(catalog.seed_schedules().to_vec());

        Self {
            tool_router: Self::tool_router(),
            session: Arc::new(Session {
                config,
                catalog,
                schedules: Mutex::new(schedules),
                driver,
            }),
        }
    }

    async fn commit(&self, mut selection: SelectionController) -> Result<CallToolResult, McpError> {
        let driver = &self.session.driver;
        let queued = {
            let mut queue = driver.queue().lock().await;
            let ids = selection
                .commit(&mut queue, driver.clock().now())
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            ids.iter()
                .filter_map(|id| queue.get(id).cloned())
                .collect::<Vec<_>>()
        };
        driver.notify();

        Ok(CallToolResult::success(vec![Content::json(QueuedOutput {
            queued,
        })?]))
    }

    #[tool(description = "List the device's apps with running state and cache size")]
    pub async fn list_apps(
        &self,
        input: Parameters<ListAppsInput>,
    ) -> Result<CallToolResult, McpError> {
        let catalog = &self.session.catalog;
        let apps: Vec<&App> = match input.0.filter.as_deref() {
            None | Some("all") => catalog.apps().iter().collect(),
            Some("running") => catalog.running().collect(),
            Some("cache") => catalog.with_cache().collect(),
            Some(other) => return Err(invalid(format!("unknown filter: {}", other))),
        };

        let output: Vec<AppOutput> = apps
            .into_iter()
            .map(|app| AppOutput {
                cache_mb: app.cache_mb(),
                app: app.clone(),
            })
            .collect();
        Ok(CallToolResult::success(vec![Content::json(output)?]))
    }

    #[tool(description = "List scheduled cleanups")]
    pub async fn list_schedules(&self) -> Result<CallToolResult, McpError> {
        let schedules = self.session.schedules.lock().await;
        Ok(CallToolResult::success(vec![Content::json(schedules.list())?]))
    }

    #[tool(description = "Queue force-stop operations for running apps")]
    pub async fn kill_apps(
        &self,
        input: Parameters<KillAppsInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let mut selection = SelectionController::kill(&self.session.catalog);
        if input.all {
            selection.select_all();
        } else {
            selection.select_ids(&input.app_ids);
        }
        if !selection.can_commit() {
            return Err(invalid("no running app matches the request"));
        }
        self.commit(selection).await
    }

    #[tool(description = "Queue cache-clear operations")]
    pub async fn clear_cache(
        &self,
        input: Parameters<ClearCacheInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let mut selection = SelectionController::cache(&self.session.catalog);
        if input.all {
            selection.select_all();
        } else if input.high {
            selection.select_high_cache(self.session.config.selection.high_cache_threshold_mb);
        } else {
            selection.select_ids(&input.app_ids);
        }
        if !selection.can_commit() {
            return Err(invalid("no app with cache matches the request"));
        }
        self.commit(selection).await
    }

    #[tool(description = "Show queue entries and progress, optionally for one kind")]
    pub async fn queue_status(
        &self,
        input: Parameters<QueueStatusInput>,
    ) -> Result<CallToolResult, McpError> {
        let kind = input
            .0
            .kind
            .map(|k| k.parse::<OperationKind>())
            .transpose()
            .map_err(invalid)?;

        let queue = self.session.driver.queue().lock().await;
        let output = QueueStatusOutput {
            progress: queue.progress(kind),
            entries: queue.query(kind).into_iter().cloned().collect(),
        };
        Ok(CallToolResult::success(vec![Content::json(output)?]))
    }

    #[tool(description = "Enable or disable a scheduled cleanup")]
    pub async fn toggle_schedule(
        &self,
        input: Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        let mut schedules = self.session.schedules.lock().await;
        let toggled = schedules.toggle(&input.0.id);
        let output = ToggleOutput {
            toggled,
            schedule: schedules.get(&input.0.id).cloned(),
        };
        Ok(CallToolResult::success(vec![Content::json(output)?]))
    }

    #[tool(description = "Create a recurring cleanup; at least one day and one action are required")]
    pub async fn create_schedule(
        &self,
        input: Parameters<CreateScheduleInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let days = input
            .days
            .iter()
            .map(|d| d.parse::<Weekday>())
            .collect::<Result<_, _>>()
            .map_err(invalid)?;
        let draft = ScheduleDraft {
            name: input.name,
            time: input.time,
            days,
            kill: input.kill_apps,
            cache: input.cache_apps,
        };

        let mut schedules = self.session.schedules.lock().await;
        let created = schedules.create(draft).map_err(invalid)?.clone();
        Ok(CallToolResult::success(vec![Content::json(created)?]))
    }

    #[tool(description = "Cancel a pending or processing queue entry")]
    pub async fn cancel_entry(
        &self,
        input: Parameters<IdInput>,
    ) -> Result<CallToolResult, McpError> {
        let driver = &self.session.driver;
        let entry = {
            let mut queue = driver.queue().lock().await;
            queue
                .cancel(&input.0.id, driver.clock().now())
                .map_err(invalid)?;
            queue.get(&input.0.id).cloned()
        };
        driver.notify();
        Ok(CallToolResult::success(vec![Content::json(entry)?]))
    }
}

#[tool_handler]
impl ServerHandler for AppToolsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_mcp_server(config: Config, catalog: Catalog) -> anyhow::Result<()> {
    use rmcp::transport::stdio;

    info!(apps = catalog.apps().len(), "starting MCP server");
    let server = AppToolsServer::new(config, catalog);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
