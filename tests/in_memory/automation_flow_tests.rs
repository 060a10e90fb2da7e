//! End-to-end automation through the public services.

use super::helpers::{workspace, workspace_with};
use chrono::Utc;
use rstest::rstest;
use serde_json::json;
use taskboard::automation::{
    domain::{AutomationRule, RuleDefinition, RuleId, StoredRule},
    ports::AutomationRuleRepository,
};
use taskboard::notification::domain::{Notification, NotificationKind};
use taskboard::task::{
    domain::{StatusPipeline, TaskStatus},
    services::{NewTaskRequest, UpdateTaskRequest},
};
use taskboard::user::domain::Badge;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_rules_drive_the_whole_lifecycle() -> eyre::Result<()> {
    let pipeline = StatusPipeline::new(["To Do", "In Progress", "Review", "Done"])?;
    let ws = workspace_with(pipeline).await?;
    let project = ws.project.id();
    ws.rules
        .create_rule(
            project,
            RuleDefinition::award_badge_on_done(Some("Finisher")),
            ws.owner,
        )
        .await?;
    ws.rules
        .create_rule(
            project,
            RuleDefinition::move_status_on_assignment(ws.member, Some("Review")),
            ws.owner,
        )
        .await?;

    let created = ws
        .lifecycle
        .create_task(project, NewTaskRequest::new("Write report"), ws.owner)
        .await?;
    let assigned = ws
        .lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().assign_to(ws.member),
            ws.owner,
        )
        .await?;
    let done = ws
        .lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().with_status("Done"),
            ws.member,
        )
        .await?;

    eyre::ensure!(created.status() == &TaskStatus::to_do());
    eyre::ensure!(assigned.status().as_str() == "Review");
    eyre::ensure!(done.is_done());
    eyre::ensure!(ws.badges(ws.member).await? == vec![Badge::new("Finisher")?]);
    let kinds: Vec<NotificationKind> = ws
        .inbox(ws.member)
        .await?
        .iter()
        .map(Notification::kind)
        .collect();
    eyre::ensure!(kinds == vec![NotificationKind::TaskDone, NotificationKind::BadgeAwarded]);
    eyre::ensure!(ws.inbox(ws.owner).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_rules_stop_firing() -> eyre::Result<()> {
    let ws = workspace().await?;
    let project = ws.project.id();
    let rule = ws
        .rules
        .create_rule(
            project,
            RuleDefinition::award_badge_on_done(Some("Finisher")),
            ws.owner,
        )
        .await?;
    ws.rules.delete_rule(rule.id(), ws.owner).await?;

    let created = ws
        .lifecycle
        .create_task(
            project,
            NewTaskRequest::new("Write report").with_assignee(ws.member),
            ws.owner,
        )
        .await?;
    ws.lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().with_status("Done"),
            ws.member,
        )
        .await?;

    eyre::ensure!(ws.badges(ws.member).await?.is_empty());
    eyre::ensure!(ws.inbox(ws.member).await?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edited_rules_grant_the_new_badge() -> eyre::Result<()> {
    let ws = workspace().await?;
    let project = ws.project.id();
    let rule = ws
        .rules
        .create_rule(project, RuleDefinition::award_badge_on_done(None), ws.owner)
        .await?;
    ws.rules
        .update_rule(
            rule.id(),
            RuleDefinition::award_badge_on_done(Some("Closer")),
            ws.owner,
        )
        .await?;

    let created = ws
        .lifecycle
        .create_task(
            project,
            NewTaskRequest::new("Write report")
                .with_assignee(ws.member)
                .with_status("Done"),
            ws.owner,
        )
        .await?;

    eyre::ensure!(created.is_done());
    eyre::ensure!(ws.badges(ws.member).await? == vec![Badge::new("Closer")?]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unrecognized_stored_rules_are_listed_but_inert() -> eyre::Result<()> {
    let ws = workspace().await?;
    let project = ws.project.id();
    let legacy = AutomationRule::from_stored(StoredRule {
        id: RuleId::new(),
        project,
        definition: RuleDefinition {
            trigger: "due_date".to_owned(),
            condition: None,
            action: Some(json!({ "type": "remind" })),
        },
        created_by: ws.owner,
        created_at: Utc::now(),
    });
    ws.rule_store.store(&legacy).await?;

    let created = ws
        .lifecycle
        .create_task(
            project,
            NewTaskRequest::new("Write report").with_assignee(ws.member),
            ws.owner,
        )
        .await?;
    let done = ws
        .lifecycle
        .update_task(
            created.id(),
            UpdateTaskRequest::new().with_status("Done"),
            ws.member,
        )
        .await?;

    let listed = ws.rules.list_rules(project, ws.owner).await?;
    eyre::ensure!(listed.len() == 1);
    eyre::ensure!(done.is_done());
    eyre::ensure!(ws.badges(ws.member).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_survive_completion() -> eyre::Result<()> {
    let ws = workspace().await?;
    let created = ws
        .lifecycle
        .create_task(
            ws.project.id(),
            NewTaskRequest::new("Write report").with_status("Done"),
            ws.owner,
        )
        .await?;

    ws.lifecycle
        .add_comment(created.id(), ws.member, "Nice work")
        .await?;

    let comments = ws.lifecycle.list_comments(created.id()).await?;
    eyre::ensure!(comments.len() == 1);
    Ok(())
}
