//! Deterministic post-processing of the model's reply.
//!
//! The model is asked to follow the response policy, but anything that can be
//! checked from the turn's tool outcomes is enforced here instead of trusted.

use crate::response::{AssistantResponse, ResponsePayload};
use crate::tools::{report_issue, setup_campaign, ToolErrorKind};

pub const SETUP_FOLLOW_UP_BUTTONS: [&str; 3] = ["Assign Promoters", "Upload Brief", "Set Objectives"];
pub const TICKET_FOLLOW_UP_BUTTONS: [&str; 2] = ["Report Another Issue", "View Live Campaigns"];

pub const NO_LIVE_CAMPAIGNS: &str = "There are no live campaigns at the moment.";
pub const AUTHENTICATION_APOLOGY: &str =
    "Sorry, I couldn't verify your account, so I can't make that change. Please sign in again and retry.";
pub const PERSISTENCE_APOLOGY: &str =
    "I couldn't complete this right now. Please try again shortly.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolOutcome {
    Succeeded,
    Failed(ToolErrorKind),
}

/// Outcomes of every tool call made during one turn, in call order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolLedger {
    entries: Vec<(String, ToolOutcome)>,
}

impl ToolLedger {
    pub fn record(&mut self, tool: &str, outcome: ToolOutcome) {
        self.entries.push((tool.to_string(), outcome));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_failure(&self, kind: ToolErrorKind) -> bool {
        self.entries.iter().any(|(_, outcome)| *outcome == ToolOutcome::Failed(kind))
    }

    /// The most recent tool that succeeded.
    pub fn last_success(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(_, outcome)| *outcome == ToolOutcome::Succeeded)
            .map(|(tool, _)| tool.as_str())
    }
}

/// Fallback reply when the model output is unusable but the ledger already
/// explains what went wrong.
pub fn fallback_for(ledger: &ToolLedger) -> Option<AssistantResponse> {
    if ledger.has_failure(ToolErrorKind::Authentication) {
        Some(AssistantResponse::text(AUTHENTICATION_APOLOGY))
    } else if ledger.has_failure(ToolErrorKind::Persistence) {
        Some(AssistantResponse::text(PERSISTENCE_APOLOGY))
    } else {
        None
    }
}

pub fn apply(response: AssistantResponse, ledger: &ToolLedger) -> AssistantResponse {
    if ledger.has_failure(ToolErrorKind::Authentication) {
        return AssistantResponse::text(AUTHENTICATION_APOLOGY);
    }
    if ledger.has_failure(ToolErrorKind::Persistence) && response.is_structured() {
        return AssistantResponse::text(PERSISTENCE_APOLOGY);
    }

    match response.payload {
        ResponsePayload::LiveStatus(campaigns) if campaigns.is_empty() => {
            AssistantResponse::text(NO_LIVE_CAMPAIGNS)
        }
        ResponsePayload::Text(text) => {
            let reply = AssistantResponse::text(text);
            match ledger.last_success() {
                Some(setup_campaign::NAME) => reply.with_buttons(SETUP_FOLLOW_UP_BUTTONS),
                Some(report_issue::NAME) => reply.with_buttons(TICKET_FOLLOW_UP_BUTTONS),
                _ => reply.with_buttons(response.buttons),
            }
        }
        payload => AssistantResponse { payload, buttons: response.buttons },
    }
}
