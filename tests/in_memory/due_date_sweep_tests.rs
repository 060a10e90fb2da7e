//! Due-date sweeps over tasks created through the lifecycle service.

use super::helpers::workspace;
use chrono::{Duration, Utc};
use rstest::rstest;
use taskboard::notification::domain::NotificationKind;
use taskboard::task::services::{NewTaskRequest, UpdateTaskRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_tasks_notify_until_completed() -> eyre::Result<()> {
    let ws = workspace().await?;
    let created = ws
        .lifecycle
        .create_task(
            ws.project.id(),
            NewTaskRequest::new("Write report")
                .with_assignee(ws.member)
                .with_due_date(Utc::now() - Duration::hours(2)),
            ws.owner,
        )
        .await?;

    let first = ws.sweeper.sweep().await?;
    ws.lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().with_status("Done"),
            ws.member,
        )
        .await?;
    let after_done = ws.sweeper.sweep().await?;

    eyre::ensure!(first.notifications_emitted == 1);
    eyre::ensure!(after_done.overdue_tasks == 0);
    let overdue_notices = ws
        .inbox(ws.member)
        .await?
        .iter()
        .filter(|n| n.kind() == NotificationKind::TaskOverdue)
        .count();
    eyre::ensure!(overdue_notices == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rescheduled_tasks_leave_the_sweep() -> eyre::Result<()> {
    let ws = workspace().await?;
    let created = ws
        .lifecycle
        .create_task(
            ws.project.id(),
            NewTaskRequest::new("Write report")
                .with_assignee(ws.member)
                .with_due_date(Utc::now() - Duration::hours(2)),
            ws.owner,
        )
        .await?;
    ws.lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().clear_due_date(),
            ws.owner,
        )
        .await?;

    let report = ws.sweeper.sweep().await?;

    eyre::ensure!(report.overdue_tasks == 0);
    eyre::ensure!(ws.inbox(ws.member).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_redirects_overdue_notices() -> eyre::Result<()> {
    let ws = workspace().await?;
    let created = ws
        .lifecycle
        .create_task(
            ws.project.id(),
            NewTaskRequest::new("Write report")
                .with_assignee(ws.member)
                .with_due_date(Utc::now() - Duration::hours(2)),
            ws.owner,
        )
        .await?;
    ws.lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().assign_to(ws.owner),
            ws.owner,
        )
        .await?;

    let report = ws.sweeper.sweep().await?;

    eyre::ensure!(report.notifications_emitted == 1);
    eyre::ensure!(ws.inbox(ws.member).await?.is_empty());
    eyre::ensure!(ws.inbox(ws.owner).await?.len() == 1);
    Ok(())
}
