//! Runs one due-date sweep against the `PostgreSQL` stores.
//!
//! Usage:
//!
//! ```text
//! due_date_sweep <config-path>
//! ```
//!
//! The JSON file at `config-path` must deserialize into [`SweepSettings`]. A
//! representative file is:
//!
//! ```json
//! {
//!   "database_url": "postgres://taskboard@localhost/taskboard",
//!   "max_connections": 4,
//!   "renotify_after_secs": 86400,
//!   "templates": {
//!     "task_overdue": "Reminder: \"{{ task_title }}\" is past its due date."
//!   }
//! }
//! ```
//!
//! Only `database_url` is required. Without `renotify_after_secs` every run
//! notifies every overdue assignee again. Scheduling is left to cron or a
//! systemd timer. Log verbosity follows `RUST_LOG`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use chrono::Duration;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use taskboard::notification::{
    adapters::postgres::PostgresNotificationRepository,
    services::{NotificationComposer, NotificationTemplates},
};
use taskboard::task::{
    adapters::postgres::PostgresTaskRepository,
    services::{DueDateSweepError, DueDateSweeper, SweepPolicy},
};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Settings read from the sweep configuration file.
#[derive(Debug, Deserialize)]
struct SweepSettings {
    database_url: String,
    #[serde(default)]
    max_connections: Option<u32>,
    #[serde(default)]
    renotify_after_secs: Option<u32>,
    #[serde(default)]
    templates: NotificationTemplates,
}

impl SweepSettings {
    fn policy(&self) -> SweepPolicy {
        self.renotify_after_secs
            .map_or_else(SweepPolicy::always, |secs| {
                SweepPolicy::suppress_within(Duration::seconds(i64::from(secs)))
            })
    }
}

#[derive(Debug, Error)]
enum SweepCommandError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read sweep config: {0}")]
    ConfigRead(#[source] std::io::Error),
    #[error("failed to parse sweep config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to build connection pool: {0}")]
    Pool(#[source] diesel::r2d2::PoolError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error(transparent)]
    Sweep(#[from] DueDateSweepError),
}

fn main() -> Result<(), SweepCommandError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run().inspect_err(|err| error!(%err, "due-date sweep aborted"))
}

fn run() -> Result<(), SweepCommandError> {
    let config_path = parse_args(env::args())?;
    let settings = load_settings(&config_path)?;
    let policy = settings.policy();

    let manager = ConnectionManager::<PgConnection>::new(&settings.database_url);
    let pool = Pool::builder()
        .max_size(settings.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
        .build(manager)
        .map_err(SweepCommandError::Pool)?;

    let sweeper = DueDateSweeper::new(
        Arc::new(PostgresTaskRepository::new(pool.clone())),
        Arc::new(PostgresNotificationRepository::new(pool)),
        Arc::new(DefaultClock),
    )
    .with_composer(NotificationComposer::new(settings.templates))
    .with_policy(policy);

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SweepCommandError::RuntimeInit)?;
    let report = runtime.block_on(sweeper.sweep())?;
    info!(
        overdue = report.overdue_tasks,
        emitted = report.notifications_emitted,
        suppressed = report.suppressed,
        failures = report.failures,
        config = %config_path,
        "sweep complete"
    );
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Utf8PathBuf, SweepCommandError> {
    let _program = args.next();
    let config_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| SweepCommandError::InvalidArgs("missing config path argument".into()))?;
    if let Some(extra) = args.next() {
        return Err(SweepCommandError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok(config_path)
}

fn load_settings(path: &Utf8Path) -> Result<SweepSettings, SweepCommandError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| SweepCommandError::InvalidArgs(format!("not a file path: {path}")))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(SweepCommandError::ConfigRead)?;
    let raw = dir
        .read_to_string(file_name)
        .map_err(SweepCommandError::ConfigRead)?;
    serde_json::from_str(&raw).map_err(SweepCommandError::ConfigParse)
}
