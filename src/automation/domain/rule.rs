//! Automation rules: wire definitions and their interpreted behaviours.

use super::{AutomationDomainError, RuleId};
use crate::task::domain::{Project, ProjectId, TaskStatus};
use crate::user::domain::{Badge, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const STATUS_CHANGE: &str = "status_change";
const ASSIGNMENT: &str = "assignment";
const ASSIGN_BADGE: &str = "assign_badge";
const MOVE_STATUS: &str = "move_status";

/// An automation rule in its wire form, as submitted by a project owner or
/// read back from storage.
///
/// ```json
/// { "trigger": "assignment",
///   "condition": { "user": "4c9c..." },
///   "action": { "type": "move_status", "status": "In Progress" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Event the rule reacts to: `status_change` or `assignment`.
    pub trigger: String,
    /// Trigger-specific condition, such as `{"user": "<id>"}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
    /// Action payload tagged by `type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
}

impl RuleDefinition {
    /// Definition of a rule granting `badge` (or "Completed Task") when a task
    /// enters "Done".
    #[must_use]
    pub fn award_badge_on_done(badge: Option<&str>) -> Self {
        let action = badge.map_or_else(
            || json!({ "type": ASSIGN_BADGE }),
            |label| json!({ "type": ASSIGN_BADGE, "badge": label }),
        );
        Self {
            trigger: STATUS_CHANGE.to_owned(),
            condition: None,
            action: Some(action),
        }
    }

    /// Definition of a rule moving tasks assigned to `user` into `status`
    /// (or "In Progress").
    #[must_use]
    pub fn move_status_on_assignment(user: UserId, status: Option<&str>) -> Self {
        let action = status.map_or_else(
            || json!({ "type": MOVE_STATUS }),
            |label| json!({ "type": MOVE_STATUS, "status": label }),
        );
        Self {
            trigger: ASSIGNMENT.to_owned(),
            condition: Some(json!({ "user": user })),
            action: Some(action),
        }
    }

    /// Returns the action's `type` tag, if present.
    #[must_use]
    pub fn action_type(&self) -> Option<&str> {
        self.action
            .as_ref()
            .and_then(|action| action.get("type"))
            .and_then(Value::as_str)
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ActionPayload {
    AssignBadge {
        #[serde(default)]
        badge: Option<String>,
    },
    MoveStatus {
        #[serde(default)]
        status: Option<String>,
    },
}

#[derive(Deserialize)]
struct AssignmentCondition {
    #[serde(default)]
    user: Option<UserId>,
}

/// The closed set of behaviours an automation rule can have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleBehaviour {
    /// Grant `badge` to the assignee when a task enters "Done".
    AwardBadgeOnDone {
        /// Badge to grant.
        badge: Badge,
    },
    /// Move a task to `status` when it is assigned to `assignee`.
    MoveStatusOnAssignment {
        /// User whose assignment fires the rule.
        assignee: UserId,
        /// Target status.
        status: TaskStatus,
    },
    /// A stored rule this version cannot interpret. Never fires.
    Unrecognized {
        /// Stored trigger.
        trigger: String,
        /// Stored action type, if any.
        action_type: Option<String>,
    },
}

impl RuleBehaviour {
    /// Interprets a definition strictly.
    ///
    /// Blank or absent badge labels default to "Completed Task"; blank or
    /// absent target statuses default to "In Progress".
    ///
    /// # Errors
    ///
    /// Returns [`AutomationDomainError::UnknownTrigger`],
    /// [`AutomationDomainError::UnknownAction`],
    /// [`AutomationDomainError::UnsupportedCombination`],
    /// [`AutomationDomainError::MissingConditionUser`], or
    /// [`AutomationDomainError::MalformedDefinition`] when the definition
    /// cannot be interpreted.
    pub fn parse(definition: &RuleDefinition) -> Result<Self, AutomationDomainError> {
        let trigger = definition.trigger.trim();
        if trigger != STATUS_CHANGE && trigger != ASSIGNMENT {
            return Err(AutomationDomainError::UnknownTrigger(trigger.to_owned()));
        }
        let action = definition
            .action
            .as_ref()
            .ok_or_else(|| malformed("action is required"))?;
        let action_type = action
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("action.type is required"))?;
        if action_type != ASSIGN_BADGE && action_type != MOVE_STATUS {
            return Err(AutomationDomainError::UnknownAction(action_type.to_owned()));
        }
        let payload =
            ActionPayload::deserialize(action).map_err(|err| malformed(&err.to_string()))?;

        match (trigger, payload) {
            (STATUS_CHANGE, ActionPayload::AssignBadge { badge: label }) => {
                let badge = non_blank(label)
                    .map_or_else(|| Ok(Badge::completed_task()), Badge::new)?;
                Ok(Self::AwardBadgeOnDone { badge })
            }
            (ASSIGNMENT, ActionPayload::MoveStatus { status: label }) => {
                let assignee = condition_user(definition.condition.as_ref())?;
                let status = non_blank(label)
                    .map_or_else(|| Ok(TaskStatus::in_progress()), TaskStatus::new)?;
                Ok(Self::MoveStatusOnAssignment { assignee, status })
            }
            _ => Err(AutomationDomainError::UnsupportedCombination {
                trigger: trigger.to_owned(),
                action: action_type.to_owned(),
            }),
        }
    }

    /// Interprets a stored definition, falling back to
    /// [`RuleBehaviour::Unrecognized`] when it cannot be parsed.
    #[must_use]
    pub fn parse_lenient(definition: &RuleDefinition) -> Self {
        Self::parse(definition).unwrap_or_else(|_| Self::Unrecognized {
            trigger: definition.trigger.clone(),
            action_type: definition.action_type().map(str::to_owned),
        })
    }

    /// Checks the behaviour against the project's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationDomainError::StatusNotInPipeline`] when a target
    /// status is not configured for `project`.
    pub fn ensure_fits(&self, project: &Project) -> Result<(), AutomationDomainError> {
        match self {
            Self::MoveStatusOnAssignment { status, .. } if !project.statuses().contains(status) => {
                Err(AutomationDomainError::StatusNotInPipeline {
                    status: status.as_str().to_owned(),
                    project: project.id(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns whether the behaviour is one this version can execute.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized { .. })
    }
}

fn non_blank(label: Option<String>) -> Option<String> {
    label.filter(|value| !value.trim().is_empty())
}

fn condition_user(condition: Option<&Value>) -> Result<UserId, AutomationDomainError> {
    let Some(raw) = condition.filter(|value| !value.is_null()) else {
        return Err(AutomationDomainError::MissingConditionUser);
    };
    let parsed =
        AssignmentCondition::deserialize(raw).map_err(|err| malformed(&err.to_string()))?;
    parsed
        .user
        .ok_or(AutomationDomainError::MissingConditionUser)
}

fn malformed(reason: &str) -> AutomationDomainError {
    AutomationDomainError::MalformedDefinition(reason.to_owned())
}

/// A project automation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationRule {
    id: RuleId,
    project: ProjectId,
    definition: RuleDefinition,
    behaviour: RuleBehaviour,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a stored automation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRule {
    /// Stored rule identifier.
    pub id: RuleId,
    /// Stored owning project.
    pub project: ProjectId,
    /// Stored wire definition.
    pub definition: RuleDefinition,
    /// Stored creator.
    pub created_by: UserId,
    /// Stored creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl AutomationRule {
    /// Creates a rule for `project` from a validated definition.
    ///
    /// # Errors
    ///
    /// Returns an [`AutomationDomainError`] when the definition cannot be
    /// interpreted or does not fit the project's pipeline.
    pub fn new(
        project: &Project,
        definition: RuleDefinition,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, AutomationDomainError> {
        let behaviour = interpret(project, &definition)?;
        Ok(Self {
            id: RuleId::new(),
            project: project.id(),
            definition,
            behaviour,
            created_by,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a rule from storage.
    ///
    /// Definitions that no longer parse become
    /// [`RuleBehaviour::Unrecognized`] instead of failing the load.
    #[must_use]
    pub fn from_stored(stored: StoredRule) -> Self {
        let behaviour = RuleBehaviour::parse_lenient(&stored.definition);
        Self {
            id: stored.id,
            project: stored.project,
            definition: stored.definition,
            behaviour,
            created_by: stored.created_by,
            created_at: stored.created_at,
        }
    }

    /// Replaces the rule's definition.
    ///
    /// # Errors
    ///
    /// Returns an [`AutomationDomainError`] when the definition cannot be
    /// interpreted or does not fit the project's pipeline. The rule is left
    /// unchanged on error.
    pub fn redefine(
        &mut self,
        project: &Project,
        definition: RuleDefinition,
    ) -> Result<(), AutomationDomainError> {
        self.behaviour = interpret(project, &definition)?;
        self.definition = definition;
        Ok(())
    }

    /// Returns the rule identifier.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the wire definition.
    #[must_use]
    pub const fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    /// Returns the interpreted behaviour.
    #[must_use]
    pub const fn behaviour(&self) -> &RuleBehaviour {
        &self.behaviour
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn interpret(
    project: &Project,
    definition: &RuleDefinition,
) -> Result<RuleBehaviour, AutomationDomainError> {
    let behaviour = RuleBehaviour::parse(definition)?;
    behaviour.ensure_fits(project)?;
    Ok(behaviour)
}
