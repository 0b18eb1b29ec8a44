use crate::audit::event::{Actor, AuditEvent};
use crate::audit::log::AuditLog;
use crate::checklist::RequiredList;
use crate::determinism::run_id::{run_id_ulid, sha256_hex};
use crate::document::flatten::flatten;
use crate::document::host::DocumentHost;
use crate::error::{CoreError, CoreResult};
use crate::sink::MessageSink;
use crate::validator::{ChecklistValidator, LookupError, ValidationReport, ValidationTarget};
use serde::{Deserialize, Serialize};

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunState {
    START,
    RESOLVE_ROOT,
    RESOLVE_SUBGROUP,
    COMPARING,
    DONE,
    FAILED,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::DONE | RunState::FAILED)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Completed(ValidationReport),
    Failed(LookupError),
}

impl RunOutcome {
    /// The text handed to the sink for this outcome.
    pub fn message(&self) -> String {
        match self {
            RunOutcome::Completed(report) => report.message(),
            RunOutcome::Failed(err) => err.to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, RunOutcome::Completed(r) if r.all_present())
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            RunOutcome::Completed(r) => Some(r),
            RunOutcome::Failed(_) => None,
        }
    }
}

/// Drives one checklist run over a document: resolve the group, resolve the
/// subgroup, compare, show exactly one message.
pub struct RunManager {
    pub run_id: String,
    pub document: String,
    pub state: RunState,
    audit: Option<AuditLog>,
}

impl RunManager {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            run_id: run_id_ulid(),
            document: document.into(),
            state: RunState::START,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn into_audit(self) -> Option<AuditLog> {
        self.audit
    }

    pub fn run<H, S>(
        &mut self,
        host: &H,
        target: &ValidationTarget,
        required: &RequiredList,
        sink: &mut S,
    ) -> CoreResult<RunOutcome>
    where
        H: DocumentHost,
        S: MessageSink + ?Sized,
    {
        if self.state != RunState::START {
            return Err(CoreError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", RunState::RESOLVE_ROOT),
            });
        }
        self.record(
            "RUN_STARTED",
            Actor::User,
            serde_json::json!({
                "root_group": target.root_group,
                "sub_group": target.sub_group,
                "required_count": required.len(),
                "checklist_sha256": required.sha256()?
            }),
        )?;
        self.transition(RunState::RESOLVE_ROOT, "run started")?;

        let validator = ChecklistValidator::new(target.clone());
        let root = match validator.resolve_root(host) {
            Ok(root) => root,
            Err(err) => return self.fail(err, sink),
        };
        self.record(
            "GROUP_RESOLVED",
            Actor::System,
            serde_json::json!({ "group": target.root_group }),
        )?;
        self.transition(RunState::RESOLVE_SUBGROUP, "group resolved")?;

        let sub = match validator.resolve_sub(host, root) {
            Ok(sub) => sub,
            Err(err) => return self.fail(err, sink),
        };
        self.record(
            "SUBGROUP_RESOLVED",
            Actor::System,
            serde_json::json!({ "group": target.root_group, "sub_group": target.sub_group }),
        )?;
        self.transition(RunState::COMPARING, "subgroup resolved")?;

        let existing = flatten(sub);
        self.record(
            "LAYERS_FLATTENED",
            Actor::System,
            serde_json::json!({ "layer_count": existing.len() }),
        )?;
        let report = validator.compare(&existing, required);
        self.record(
            "CHECKLIST_COMPARED",
            Actor::System,
            serde_json::json!({
                "required_count": report.required_count,
                "missing_count": report.missing.len(),
                "missing": report.missing
            }),
        )?;

        let outcome = RunOutcome::Completed(report);
        self.show(&outcome, sink)?;
        self.transition(RunState::DONE, "checklist compared")?;
        let result = if outcome.passed() { "PASS" } else { "FAIL" };
        self.record(
            "RUN_COMPLETED",
            Actor::System,
            serde_json::json!({ "result": result }),
        )?;
        Ok(outcome)
    }

    fn fail<S: MessageSink + ?Sized>(
        &mut self,
        err: LookupError,
        sink: &mut S,
    ) -> CoreResult<RunOutcome> {
        let outcome = RunOutcome::Failed(err);
        self.show(&outcome, sink)?;
        self.transition(RunState::FAILED, "lookup failed")?;
        self.record(
            "RUN_FAILED",
            Actor::System,
            serde_json::json!({ "error": outcome.message() }),
        )?;
        Ok(outcome)
    }

    fn show<S: MessageSink + ?Sized>(
        &mut self,
        outcome: &RunOutcome,
        sink: &mut S,
    ) -> CoreResult<()> {
        let message = outcome.message();
        sink.show_message(&message);
        self.record(
            "MESSAGE_SHOWN",
            Actor::System,
            serde_json::json!({ "message_sha256": sha256_hex(message.as_bytes()) }),
        )
    }

    fn transition(&mut self, to: RunState, reason: &str) -> CoreResult<()> {
        if !valid_transition(self.state, to) {
            return Err(CoreError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", to),
            });
        }
        self.record(
            "RUN_STATE_CHANGED",
            Actor::System,
            serde_json::json!({
                "from_state": format!("{:?}", self.state),
                "to_state": format!("{:?}", to),
                "reason": reason
            }),
        )?;
        self.state = to;
        Ok(())
    }

    fn record(
        &mut self,
        event_type: &str,
        actor: Actor,
        details: serde_json::Value,
    ) -> CoreResult<()> {
        let Some(audit) = self.audit.as_mut() else {
            return Ok(());
        };
        audit.append(AuditEvent {
            ts_utc: now_rfc3339_utc()?,
            event_type: event_type.to_string(),
            run_id: self.run_id.clone(),
            document: self.document.clone(),
            actor,
            details,
            prev_event_hash: String::new(),
            event_hash: String::new(),
        })?;
        Ok(())
    }
}

/// Runs the checklist once against `host` without an audit log.
pub fn run_validation<H, S>(
    host: &H,
    root_group: &str,
    sub_group: &str,
    required: &RequiredList,
    sink: &mut S,
) -> CoreResult<RunOutcome>
where
    H: DocumentHost,
    S: MessageSink + ?Sized,
{
    RunManager::new("").run(
        host,
        &ValidationTarget::new(root_group, sub_group),
        required,
        sink,
    )
}

fn valid_transition(from: RunState, to: RunState) -> bool {
    use RunState::*;
    matches!(
        (from, to),
        (START, RESOLVE_ROOT)
            | (RESOLVE_ROOT, RESOLVE_SUBGROUP)
            | (RESOLVE_ROOT, FAILED)
            | (RESOLVE_SUBGROUP, COMPARING)
            | (RESOLVE_SUBGROUP, FAILED)
            | (COMPARING, DONE)
    )
}

fn now_rfc3339_utc() -> CoreResult<String> {
    Ok(time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339)?)
}

#[cfg(test)]
mod tests {
    use super::{valid_transition, RunState};

    #[test]
    fn state_machine_blocks_invalid_edges() {
        assert!(valid_transition(RunState::START, RunState::RESOLVE_ROOT));
        assert!(valid_transition(RunState::RESOLVE_ROOT, RunState::FAILED));
        assert!(!valid_transition(RunState::START, RunState::COMPARING));
        assert!(!valid_transition(RunState::COMPARING, RunState::FAILED));
        assert!(!valid_transition(RunState::DONE, RunState::RESOLVE_ROOT));
        assert!(!valid_transition(RunState::FAILED, RunState::START));
    }

    #[test]
    fn terminal_states() {
        assert!(RunState::DONE.is_terminal());
        assert!(RunState::FAILED.is_terminal());
        assert!(!RunState::COMPARING.is_terminal());
    }
}
