//! When steps for task automation BDD scenarios.

use super::world::{TaskAutomationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskboard::task::services::UpdateTaskRequest;

fn record_update(
    world: &mut TaskAutomationWorld,
    request: UpdateTaskRequest,
    caller: &str,
) -> eyre::Result<()> {
    let caller_id = world.person(caller)?;
    let task = world.current_task()?.id();
    let result = run_async(world.lifecycle.update_task(task, request, caller_id));
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_update = Some(result);
    Ok(())
}

#[when(r#""{name}" moves the task to "{status}""#)]
fn move_task(
    world: &mut TaskAutomationWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    record_update(world, UpdateTaskRequest::new().with_status(status), &name)
}

#[when(r#"the task is assigned to "{name}""#)]
fn assign_task(world: &mut TaskAutomationWorld, name: String) -> Result<(), eyre::Report> {
    let assignee = world.person(&name)?;
    let owner = world.current_project()?.owner();
    let task = world.current_task()?.id();
    let updated = run_async(world.lifecycle.update_task(
        task,
        UpdateTaskRequest::new().assign_to(assignee),
        owner,
    ))
    .wrap_err("assign scenario task")?;
    world.task = Some(updated);
    Ok(())
}

#[when("the due-date sweep runs")]
fn sweep_runs(world: &mut TaskAutomationWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.sweeper.sweep()).wrap_err("run due-date sweep")?;
    world.last_sweep = Some(report);
    Ok(())
}
