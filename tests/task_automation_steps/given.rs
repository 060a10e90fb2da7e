//! Given steps for task automation BDD scenarios.

use super::world::{TaskAutomationWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use taskboard::automation::domain::RuleDefinition;
use taskboard::task::{
    domain::{Project, StatusPipeline},
    services::{NewTaskRequest, UpdateTaskRequest},
};
use taskboard::user::{
    domain::{User, UserId},
    ports::UserRepository,
};

fn register(world: &mut TaskAutomationWorld, name: &str) -> eyre::Result<UserId> {
    let email = format!("{}@example.com", name.to_lowercase());
    let user = User::new(name, email, &DefaultClock)?;
    run_async(world.users.store(&user)).wrap_err("store scenario user")?;
    world.people.insert(name.to_owned(), user.id());
    Ok(user.id())
}

fn create_task(world: &mut TaskAutomationWorld, request: NewTaskRequest) -> eyre::Result<()> {
    let project = world.stored_project()?;
    let owner = world.current_project()?.owner();
    let created = run_async(world.lifecycle.create_task(project, request, owner))
        .wrap_err("create scenario task")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"the pipeline "{labels}""#)]
fn pipeline(world: &mut TaskAutomationWorld, labels: String) -> Result<(), eyre::Report> {
    world.pipeline = StatusPipeline::new(labels.split(',').map(str::trim))?;
    Ok(())
}

#[given(r#"a project "{title}" owned by "{owner}""#)]
fn project_owned_by(
    world: &mut TaskAutomationWorld,
    title: String,
    owner: String,
) -> Result<(), eyre::Report> {
    let owner_id = register(world, &owner)?;
    let project =
        Project::new(title, owner_id, &DefaultClock)?.with_statuses(world.pipeline.clone());
    world.project = Some(project);
    Ok(())
}

#[given(r#""{name}" is a member of the project"#)]
fn member_of_project(world: &mut TaskAutomationWorld, name: String) -> Result<(), eyre::Report> {
    let member = register(world, &name)?;
    world
        .project
        .as_mut()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?
        .add_member(member);
    Ok(())
}

#[given(r#"the owner adds a badge rule awarding "{badge}""#)]
fn badge_rule(world: &mut TaskAutomationWorld, badge: String) -> Result<(), eyre::Report> {
    let project = world.stored_project()?;
    let owner = world.current_project()?.owner();
    run_async(world.rules.create_rule(
        project,
        RuleDefinition::award_badge_on_done(Some(badge.as_str())),
        owner,
    ))
    .wrap_err("create badge rule")?;
    Ok(())
}

#[given(r#"the owner adds an assignment rule moving tasks for "{name}" to "{status}""#)]
fn assignment_rule(
    world: &mut TaskAutomationWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let user = world.person(&name)?;
    let project = world.stored_project()?;
    let owner = world.current_project()?.owner();
    run_async(world.rules.create_rule(
        project,
        RuleDefinition::move_status_on_assignment(user, Some(status.as_str())),
        owner,
    ))
    .wrap_err("create assignment rule")?;
    Ok(())
}

#[given(r#"an unassigned task "{title}""#)]
fn unassigned_task(world: &mut TaskAutomationWorld, title: String) -> Result<(), eyre::Report> {
    create_task(world, NewTaskRequest::new(title))
}

#[given(r#"a task "{title}" assigned to "{name}""#)]
fn assigned_task(
    world: &mut TaskAutomationWorld,
    title: String,
    name: String,
) -> Result<(), eyre::Report> {
    let assignee = world.person(&name)?;
    create_task(world, NewTaskRequest::new(title).with_assignee(assignee))
}

#[given(r#"an overdue task "{title}" assigned to "{name}" due {hours:u64} hours ago"#)]
fn overdue_task(
    world: &mut TaskAutomationWorld,
    title: String,
    name: String,
    hours: u64,
) -> Result<(), eyre::Report> {
    let assignee = world.person(&name)?;
    let request = NewTaskRequest::new(title)
        .with_assignee(assignee)
        .with_due_date(Utc::now() - Duration::hours(i64::try_from(hours)?));
    create_task(world, request)
}

#[given(r#""{name}" has moved the task to "{status}""#)]
fn has_moved_task(
    world: &mut TaskAutomationWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let caller = world.person(&name)?;
    let task = world.current_task()?.id();
    let updated = run_async(world.lifecycle.update_task(
        task,
        UpdateTaskRequest::new().with_status(status),
        caller,
    ))
    .wrap_err("move task in scenario setup")?;
    world.task = Some(updated);
    Ok(())
}
