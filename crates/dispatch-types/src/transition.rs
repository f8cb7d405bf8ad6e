//! Transition commands accepted by the order state machine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DispatchStatus;

/// A state-machine operation together with its arguments.
///
/// The target order id travels separately; one `Transition` value can be
/// applied to any order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Transition {
	/// Assign the order and close it out.
	Dispatch,
	/// Close the order out at a settled amount.
	Complete {
		/// Amount the order settled at.
		amount: Decimal,
	},
	/// Cancel the order while keeping it on the books.
	Void,
	/// Send the order back with a reason.
	MarkReturned {
		/// Why the order came back; must be non-empty.
		reason: String,
	},
	/// Flag the order with a problem description.
	MarkError {
		/// What went wrong; must be non-empty.
		detail: String,
	},
	/// Raise the dispatch status of a pending order.
	Escalate {
		/// Level to escalate to.
		level: EscalationLevel,
	},
}

impl Transition {
	/// The operation this command performs, without its arguments.
	pub fn kind(&self) -> TransitionKind {
		match self {
			Transition::Dispatch => TransitionKind::Dispatch,
			Transition::Complete { .. } => TransitionKind::Complete,
			Transition::Void => TransitionKind::Void,
			Transition::MarkReturned { .. } => TransitionKind::MarkReturned,
			Transition::MarkError { .. } => TransitionKind::MarkError,
			Transition::Escalate { .. } => TransitionKind::Escalate,
		}
	}
}

/// Names a state-machine operation without carrying its arguments.
///
/// Returned by the action router so the caller can collect the remaining
/// arguments (settled amount, reason text) before applying the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
	/// Assign and close out.
	Dispatch,
	/// Close out at a settled amount.
	Complete,
	/// Cancel while keeping the record.
	Void,
	/// Send back with a reason.
	MarkReturned,
	/// Flag with a problem description.
	MarkError,
	/// Raise the dispatch status.
	Escalate,
}

impl fmt::Display for TransitionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransitionKind::Dispatch => write!(f, "dispatch"),
			TransitionKind::Complete => write!(f, "complete"),
			TransitionKind::Void => write!(f, "void"),
			TransitionKind::MarkReturned => write!(f, "markReturned"),
			TransitionKind::MarkError => write!(f, "markError"),
			TransitionKind::Escalate => write!(f, "escalate"),
		}
	}
}

/// Level a pending order can be escalated to.
///
/// Escalation never lowers the dispatch status back to Normal; that reset
/// only happens when the order leaves PendingDispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EscalationLevel {
	/// Customer is pushing for assignment.
	Urgent,
	/// Waited past the timeout threshold.
	Timeout,
}

impl From<EscalationLevel> for DispatchStatus {
	fn from(level: EscalationLevel) -> Self {
		match level {
			EscalationLevel::Urgent => DispatchStatus::Urgent,
			EscalationLevel::Timeout => DispatchStatus::Timeout,
		}
	}
}

impl fmt::Display for EscalationLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EscalationLevel::Urgent => write!(f, "Urgent"),
			EscalationLevel::Timeout => write!(f, "Timeout"),
		}
	}
}
