//! Time-based escalation of pending orders.
//!
//! The clock collaborator of the engine: a sweep walks the pending orders,
//! compares how long each has waited past its expected service time against
//! the policy thresholds, and escalates through the state machine. Sweeps
//! only ever raise the level; nothing here de-escalates.

use chrono::{DateTime, Duration, Utc};

use dispatch_types::{DispatchStatus, EscalationLevel, Order, OrderId};

use crate::machine::OrderStateMachine;
use crate::QueueError;

/// Wait thresholds that turn a pending order urgent, then timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
	urgent_after: Duration,
	timeout_after: Duration,
}

impl EscalationPolicy {
	/// Builds a policy, requiring `0 < urgent_after < timeout_after`.
	pub fn new(urgent_after: Duration, timeout_after: Duration) -> Result<Self, QueueError> {
		if urgent_after <= Duration::zero() {
			return Err(QueueError::Validation(
				"urgent threshold must be positive".to_string(),
			));
		}
		if timeout_after <= urgent_after {
			return Err(QueueError::Validation(
				"timeout threshold must exceed the urgent threshold".to_string(),
			));
		}
		Ok(Self {
			urgent_after,
			timeout_after,
		})
	}

	/// Convenience constructor from whole minutes.
	pub fn from_minutes(urgent_after: i64, timeout_after: i64) -> Result<Self, QueueError> {
		Self::new(
			Duration::minutes(urgent_after),
			Duration::minutes(timeout_after),
		)
	}

	/// Wait past the expected time before an order turns urgent.
	pub fn urgent_after(&self) -> Duration {
		self.urgent_after
	}

	/// Wait past the expected time before an order times out.
	pub fn timeout_after(&self) -> Duration {
		self.timeout_after
	}

	/// The level a pending order should be at as of `now`, if any.
	///
	/// Non-pending orders never escalate. Below the urgent threshold the
	/// order stays at whatever level it already has.
	pub fn level_for(&self, order: &Order, now: DateTime<Utc>) -> Option<EscalationLevel> {
		if !order.is_pending() {
			return None;
		}
		let waited = now.signed_duration_since(order.expected_time);
		if waited >= self.timeout_after {
			Some(EscalationLevel::Timeout)
		} else if waited >= self.urgent_after {
			Some(EscalationLevel::Urgent)
		} else {
			None
		}
	}
}

/// Default policy: urgent after 30 minutes past the expected service time,
/// timed out after 120.
impl Default for EscalationPolicy {
	fn default() -> Self {
		Self {
			urgent_after: Duration::minutes(30),
			timeout_after: Duration::minutes(120),
		}
	}
}

/// Position of a dispatch status on the escalation ladder.
fn ladder_rank(status: DispatchStatus) -> u8 {
	match status {
		DispatchStatus::Normal => 0,
		DispatchStatus::Urgent => 1,
		DispatchStatus::Timeout => 2,
	}
}

/// Runs one escalation sweep over the working set as of `now`.
///
/// Returns the ids that changed level, in working-set order. Deterministic
/// for a given set, policy and instant.
pub fn sweep(
	machine: &mut OrderStateMachine,
	policy: &EscalationPolicy,
	now: DateTime<Utc>,
) -> Vec<OrderId> {
	let due: Vec<(OrderId, EscalationLevel)> = machine
		.store()
		.iter()
		.filter_map(|order| {
			let level = policy.level_for(order, now)?;
			// A hand-escalated order keeps its level until time catches up.
			if ladder_rank(order.dispatch_status) >= ladder_rank(level.into()) {
				return None;
			}
			Some((order.id, level))
		})
		.collect();

	let mut escalated = Vec::with_capacity(due.len());
	for (id, level) in due {
		match machine.escalate(id, level) {
			Ok(_) => escalated.push(id),
			Err(err) => {
				tracing::warn!(
					component = "escalation",
					order_id = %id,
					error = %err,
					"Sweep could not escalate order"
				);
			}
		}
	}
	tracing::debug!(
		component = "escalation",
		swept = machine.store().len(),
		escalated = escalated.len(),
		"Escalation sweep finished"
	);
	escalated
}
