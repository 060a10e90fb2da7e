//! Then steps for task automation BDD scenarios.

use super::world::{TaskAutomationWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::notification::{
    domain::{Notification, NotificationKind},
    ports::NotificationRepository,
};
use taskboard::task::{domain::TaskDomainError, services::TaskLifecycleError};
use taskboard::user::{domain::Badge, ports::UserRepository};

fn latest_notification(world: &TaskAutomationWorld, name: &str) -> eyre::Result<Notification> {
    let recipient = world.person(name)?;
    run_async(world.notifications.list_for_recipient(recipient))?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("{name} has no notifications"))
}

fn expect_notice(
    world: &TaskAutomationWorld,
    name: &str,
    kind: NotificationKind,
    message: &str,
) -> eyre::Result<()> {
    let latest = latest_notification(world, name)?;
    if latest.kind() != kind || latest.message() != message {
        return Err(eyre::eyre!(
            "expected {kind:?} notice '{message}', found {:?} '{}'",
            latest.kind(),
            latest.message()
        ));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskAutomationWorld, status: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#""{name}" holds the badge "{badge}""#)]
fn holds_badge(
    world: &TaskAutomationWorld,
    name: String,
    badge: String,
) -> Result<(), eyre::Report> {
    let user_id = world.person(&name)?;
    let expected = Badge::new(badge)?;
    let user = run_async(world.users.find_by_id(user_id))?
        .ok_or_else(|| eyre::eyre!("{name} is not stored"))?;
    if !user.has_badge(&expected) {
        return Err(eyre::eyre!("{name} does not hold {expected}"));
    }
    Ok(())
}

#[then(r#""{name}" is notified that the task is done"#)]
fn notified_done(world: &TaskAutomationWorld, name: String) -> Result<(), eyre::Report> {
    let message = format!("Task \"{}\" is marked as Done.", world.current_task()?.title());
    expect_notice(world, &name, NotificationKind::TaskDone, &message)
}

#[then(r#""{name}" is notified that the task is overdue"#)]
fn notified_overdue(world: &TaskAutomationWorld, name: String) -> Result<(), eyre::Report> {
    let message = format!("Task \"{}\" is overdue!", world.current_task()?.title());
    expect_notice(world, &name, NotificationKind::TaskOverdue, &message)
}

#[then("the update is rejected because the task is done")]
fn update_rejected_done(world: &TaskAutomationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;
    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::DoneTaskImmutable(_)
        ))
    ) {
        return Err(eyre::eyre!(
            "expected DoneTaskImmutable error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the sweep reports {count:usize} overdue task")]
fn sweep_reports(world: &TaskAutomationWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_sweep
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sweep report"))?;
    if report.overdue_tasks != count {
        return Err(eyre::eyre!(
            "expected {count} overdue tasks, found {}",
            report.overdue_tasks
        ));
    }
    Ok(())
}
