//! Pure rule matching: from a task change to an ordered list of effects.
//!
//! Evaluation runs in three phases, each preserving the stored rule order:
//!
//! 1. Badge rules fire when the task latches into "Done" with an assignee,
//!    granting the badge and congratulating the assignee.
//! 2. The built-in completion notice tells the assignee the task is done.
//! 3. Assignment rules fire when the assignee changed to the rule's user,
//!    forcing the rule's status unless the task already has it.
//!
//! A status forced in phase 3 becomes the projected status for later
//! assignment rules, so two rules targeting the same status force it once.

use super::{AutomationRule, Effect, RuleBehaviour};
use crate::notification::domain::NotificationSubject;
use crate::task::domain::{Task, TaskChange};

/// Computes the effects `rules` request in response to `change` on `task`.
///
/// `task` supplies the title used in notifications; status and assignee are
/// read from `change`. Unrecognized rules never fire.
#[must_use]
pub fn match_rules(change: &TaskChange, task: &Task, rules: &[AutomationRule]) -> Vec<Effect> {
    let mut effects = Vec::new();
    let title = task.title();

    if let Some(assignee) = change.new_assignee().filter(|_| change.entered_done()) {
        for rule in rules {
            if let RuleBehaviour::AwardBadgeOnDone { badge } = rule.behaviour() {
                effects.push(Effect::GrantBadge {
                    user: assignee,
                    badge: badge.clone(),
                });
                effects.push(Effect::Notify {
                    recipient: assignee,
                    subject: NotificationSubject::BadgeAwarded {
                        badge: badge.clone(),
                        task_title: title.to_owned(),
                    },
                });
            }
        }
        effects.push(Effect::Notify {
            recipient: assignee,
            subject: NotificationSubject::TaskDone {
                task_title: title.to_owned(),
            },
        });
    }

    let Some(new_assignee) = change.new_assignee().filter(|_| change.assignee_changed()) else {
        return effects;
    };
    let mut projected = change.new_status().clone();
    for rule in rules {
        let RuleBehaviour::MoveStatusOnAssignment { assignee, status } = rule.behaviour() else {
            continue;
        };
        if *assignee != new_assignee || *status == projected {
            continue;
        }
        projected = status.clone();
        effects.push(Effect::ForceStatus {
            status: status.clone(),
        });
    }
    effects
}
