//! Due-date sweep tests.

use std::sync::Arc;

use super::support::MockNotifications;
use crate::notification::{
    adapters::memory::InMemoryNotificationRepository,
    domain::{Notification, NotificationKind},
    ports::{NotificationRepository, NotificationRepositoryError},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{PersistedTaskData, ProjectId, Task, TaskId, TaskStatus},
    ports::TaskRepository,
    services::{DueDateSweeper, SweepPolicy, SweepReport},
};
use crate::user::domain::UserId;
use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Sweep {
    tasks: Arc<InMemoryTaskRepository>,
    notifications: Arc<InMemoryNotificationRepository>,
    sweeper: DueDateSweeper<InMemoryTaskRepository, InMemoryNotificationRepository, DefaultClock>,
    project: ProjectId,
    assignee: UserId,
    now: DateTime<Utc>,
}

impl Sweep {
    async fn add(
        &self,
        title: &str,
        status: &str,
        due_in: Option<Duration>,
        assignee: Option<UserId>,
    ) -> eyre::Result<Task> {
        let task = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            project: self.project,
            title: title.to_owned(),
            description: None,
            due_date: due_in.map(|offset| self.now + offset),
            status: TaskStatus::new(status)?,
            assignee,
            created_by: self.assignee,
            comments: Vec::new(),
            created_at: self.now - Duration::days(7),
            updated_at: None,
        });
        self.tasks.store(&task).await?;
        Ok(task)
    }

    async fn inbox(&self) -> eyre::Result<Vec<Notification>> {
        Ok(self.notifications.list_for_recipient(self.assignee).await?)
    }
}

#[fixture]
fn sweep() -> Sweep {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());
    let sweeper = DueDateSweeper::new(
        Arc::clone(&tasks),
        Arc::clone(&notifications),
        Arc::new(DefaultClock),
    );
    Sweep {
        tasks,
        notifications,
        sweeper,
        project: ProjectId::new(),
        assignee: UserId::new(),
        now: Utc::now(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_assignee_is_notified(sweep: Sweep) -> eyre::Result<()> {
    let task = sweep
        .add(
            "Write report",
            "In Progress",
            Some(Duration::hours(-1)),
            Some(sweep.assignee),
        )
        .await?;

    let report = sweep.sweeper.sweep_overdue(sweep.now).await?;

    eyre::ensure!(
        report
            == SweepReport {
                overdue_tasks: 1,
                notifications_emitted: 1,
                ..SweepReport::default()
            }
    );
    let inbox = sweep.inbox().await?;
    eyre::ensure!(inbox.len() == 1);
    let notice = inbox
        .first()
        .ok_or_else(|| eyre::eyre!("notification expected"))?;
    eyre::ensure!(notice.kind() == NotificationKind::TaskOverdue);
    eyre::ensure!(notice.task() == Some(task.id()));
    eyre::ensure!(notice.message() == "Task \"Write report\" is overdue!");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_sweep_notifies_again_by_default(sweep: Sweep) -> eyre::Result<()> {
    sweep
        .add(
            "Write report",
            "To Do",
            Some(Duration::minutes(-5)),
            Some(sweep.assignee),
        )
        .await?;

    for _ in 0..3 {
        sweep.sweeper.sweep_overdue(sweep.now).await?;
    }

    eyre::ensure!(sweep.inbox().await?.len() == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn done_future_and_undated_tasks_are_ignored(sweep: Sweep) -> eyre::Result<()> {
    let assignee = Some(sweep.assignee);
    sweep
        .add("Finished", "Done", Some(Duration::hours(-3)), assignee)
        .await?;
    sweep
        .add("Upcoming", "To Do", Some(Duration::hours(3)), assignee)
        .await?;
    sweep.add("Someday", "To Do", None, assignee).await?;

    let report = sweep.sweeper.sweep_overdue(sweep.now).await?;

    eyre::ensure!(report == SweepReport::default());
    eyre::ensure!(sweep.inbox().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassigned_overdue_tasks_are_counted_only(sweep: Sweep) -> eyre::Result<()> {
    sweep
        .add("Orphan", "To Do", Some(Duration::hours(-1)), None)
        .await?;

    let report = sweep.sweeper.sweep_overdue(sweep.now).await?;

    eyre::ensure!(report.overdue_tasks == 1);
    eyre::ensure!(report.notifications_emitted == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_leaves_tasks_untouched(sweep: Sweep) -> eyre::Result<()> {
    let task = sweep
        .add(
            "Write report",
            "In Progress",
            Some(Duration::hours(-1)),
            Some(sweep.assignee),
        )
        .await?;

    sweep.sweeper.sweep_overdue(sweep.now).await?;

    let stored = sweep.tasks.find_by_id(task.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&task));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suppression_window_withholds_repeats(sweep: Sweep) -> eyre::Result<()> {
    sweep
        .add(
            "Write report",
            "To Do",
            Some(Duration::hours(-1)),
            Some(sweep.assignee),
        )
        .await?;
    let window = Duration::hours(1);
    let sweeper = DueDateSweeper::new(
        Arc::clone(&sweep.tasks),
        Arc::clone(&sweep.notifications),
        Arc::new(DefaultClock),
    )
    .with_policy(SweepPolicy::suppress_within(window));

    let first = sweeper.sweep_overdue(sweep.now).await?;
    let repeat = sweeper.sweep_overdue(sweep.now).await?;
    let later = sweeper
        .sweep_overdue(Utc::now() + window + Duration::minutes(1))
        .await?;

    eyre::ensure!(first.notifications_emitted == 1);
    eyre::ensure!(repeat.suppressed == 1 && repeat.notifications_emitted == 0);
    eyre::ensure!(later.notifications_emitted == 1);
    eyre::ensure!(sweep.inbox().await?.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_notifications_are_counted(sweep: Sweep) -> eyre::Result<()> {
    let assignee = Some(sweep.assignee);
    sweep
        .add("First", "To Do", Some(Duration::hours(-1)), assignee)
        .await?;
    sweep
        .add("Second", "To Do", Some(Duration::hours(-2)), assignee)
        .await?;
    let mut notifications = MockNotifications::new();
    notifications.expect_append().times(2).returning(|_| {
        Err(NotificationRepositoryError::persistence(
            std::io::Error::other("inbox unavailable"),
        ))
    });
    let sweeper = DueDateSweeper::new(
        Arc::clone(&sweep.tasks),
        Arc::new(notifications),
        Arc::new(DefaultClock),
    );

    let report = sweeper.sweep_overdue(sweep.now).await?;

    eyre::ensure!(report.overdue_tasks == 2);
    eyre::ensure!(report.failures == 2);
    eyre::ensure!(report.notifications_emitted == 0);
    Ok(())
}
