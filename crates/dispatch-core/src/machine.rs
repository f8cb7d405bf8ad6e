//! Order state machine applying lifecycle transitions.
//!
//! The machine owns the working set and is the only writer to it. Every
//! operation validates its preconditions against the current record before
//! touching it, so a refused transition leaves the order byte-for-byte
//! unchanged. Leaving PendingDispatch always resets the dispatch status, and
//! a status change clears whichever of the reason/detail fields no longer
//! matches, keeping the record invariants intact across any sequence of
//! transitions.

use rust_decimal::Decimal;

use dispatch_types::{
	DispatchStatus, EscalationLevel, Order, OrderId, OrderStatus, Transition, TransitionKind,
};

use crate::store::OrderStore;
use crate::QueueError;

/// Applies validated lifecycle transitions to the working set.
#[derive(Debug, Default)]
pub struct OrderStateMachine {
	store: OrderStore,
}

/// Per-id results of a batch transition.
///
/// Batches are not transactional: each member application is atomic on its
/// own, failures are collected, and processing continues past them.
#[derive(Debug)]
pub struct BatchOutcome {
	/// Orders the transition was applied to, in processing order.
	pub applied: Vec<Order>,
	/// Ids the transition was refused for, with the refusal.
	pub failures: Vec<(OrderId, QueueError)>,
}

impl OrderStateMachine {
	/// Wraps an existing working set.
	pub fn new(store: OrderStore) -> Self {
		Self { store }
	}

	/// Read access to the working set.
	pub fn store(&self) -> &OrderStore {
		&self.store
	}

	/// Hands the working set back to the caller.
	pub fn into_store(self) -> OrderStore {
		self.store
	}

	/// Adds a new order to the working set.
	pub fn insert_order(&mut self, order: Order) -> Result<(), QueueError> {
		self.store.insert(order)
	}

	/// Looks up an order, failing if the id is unknown.
	pub fn get_order(&self, id: OrderId) -> Result<&Order, QueueError> {
		self.store.get(id).ok_or(QueueError::NotFound(id))
	}

	/// Assigns a pending order and closes it out.
	pub fn dispatch(&mut self, id: OrderId) -> Result<Order, QueueError> {
		self.require_pending(id, TransitionKind::Dispatch)?;
		let updated = self.update_with(id, |order| {
			set_status(order, OrderStatus::Completed);
		})?;
		tracing::info!(
			component = "machine",
			order_id = %id,
			status = %updated.status,
			"Order dispatched"
		);
		Ok(updated)
	}

	/// Closes a pending order out at a settled amount.
	pub fn complete(&mut self, id: OrderId, amount: Decimal) -> Result<Order, QueueError> {
		self.require_pending(id, TransitionKind::Complete)?;
		let updated = self.update_with(id, |order| {
			set_status(order, OrderStatus::Completed);
			order.settled_amount = Some(amount);
		})?;
		tracing::info!(
			component = "machine",
			order_id = %id,
			amount = %amount,
			"Order completed"
		);
		Ok(updated)
	}

	/// Cancels an order while keeping it on the books.
	pub fn void(&mut self, id: OrderId) -> Result<Order, QueueError> {
		let order = self.get_order(id)?;
		if matches!(order.status, OrderStatus::Void | OrderStatus::Returned) {
			return Err(QueueError::InvalidState {
				id,
				status: order.status,
				operation: TransitionKind::Void,
			});
		}
		let updated = self.update_with(id, |order| {
			set_status(order, OrderStatus::Void);
		})?;
		tracing::info!(component = "machine", order_id = %id, "Order voided");
		Ok(updated)
	}

	/// Sends an order back with a reason.
	pub fn mark_returned(&mut self, id: OrderId, reason: &str) -> Result<Order, QueueError> {
		self.get_order(id)?;
		let reason = reason.trim();
		if reason.is_empty() {
			return Err(QueueError::Validation(
				"return reason must not be empty".to_string(),
			));
		}
		let reason = reason.to_string();
		let updated = self.update_with(id, move |order| {
			set_status(order, OrderStatus::Returned);
			order.return_reason = Some(reason);
		})?;
		tracing::info!(component = "machine", order_id = %id, "Order marked returned");
		Ok(updated)
	}

	/// Flags an order with a problem description.
	pub fn mark_error(&mut self, id: OrderId, detail: &str) -> Result<Order, QueueError> {
		self.get_order(id)?;
		let detail = detail.trim();
		if detail.is_empty() {
			return Err(QueueError::Validation(
				"error detail must not be empty".to_string(),
			));
		}
		let detail = detail.to_string();
		let updated = self.update_with(id, move |order| {
			set_status(order, OrderStatus::Error);
			order.error_detail = Some(detail);
		})?;
		tracing::info!(component = "machine", order_id = %id, "Order marked errored");
		Ok(updated)
	}

	/// Raises the dispatch status of a pending order.
	pub fn escalate(&mut self, id: OrderId, level: EscalationLevel) -> Result<Order, QueueError> {
		self.require_pending(id, TransitionKind::Escalate)?;
		let updated = self.update_with(id, |order| {
			order.dispatch_status = level.into();
		})?;
		tracing::info!(
			component = "machine",
			order_id = %id,
			level = %level,
			"Order escalated"
		);
		Ok(updated)
	}

	/// Applies a transition command to the order it targets.
	pub fn apply(&mut self, id: OrderId, transition: Transition) -> Result<Order, QueueError> {
		match transition {
			Transition::Dispatch => self.dispatch(id),
			Transition::Complete { amount } => self.complete(id, amount),
			Transition::Void => self.void(id),
			Transition::MarkReturned { reason } => self.mark_returned(id, &reason),
			Transition::MarkError { detail } => self.mark_error(id, &detail),
			Transition::Escalate { level } => self.escalate(id, level),
		}
	}

	/// Completes every listed order at its receivable amount.
	pub fn complete_many(&mut self, ids: &[OrderId]) -> BatchOutcome {
		let mut outcome = BatchOutcome {
			applied: Vec::new(),
			failures: Vec::new(),
		};
		for &id in ids {
			let amount = match self.get_order(id) {
				Ok(order) => order.total_amount,
				Err(err) => {
					outcome.failures.push((id, err));
					continue;
				}
			};
			match self.complete(id, amount) {
				Ok(order) => outcome.applied.push(order),
				Err(err) => outcome.failures.push((id, err)),
			}
		}
		tracing::info!(
			component = "machine",
			applied = outcome.applied.len(),
			failed = outcome.failures.len(),
			"Batch complete finished"
		);
		outcome
	}

	/// Voids every listed order.
	pub fn void_many(&mut self, ids: &[OrderId]) -> BatchOutcome {
		let mut outcome = BatchOutcome {
			applied: Vec::new(),
			failures: Vec::new(),
		};
		for &id in ids {
			match self.void(id) {
				Ok(order) => outcome.applied.push(order),
				Err(err) => outcome.failures.push((id, err)),
			}
		}
		tracing::info!(
			component = "machine",
			applied = outcome.applied.len(),
			failed = outcome.failures.len(),
			"Batch void finished"
		);
		outcome
	}

	/// Fails unless the order exists and is awaiting dispatch.
	fn require_pending(&self, id: OrderId, operation: TransitionKind) -> Result<(), QueueError> {
		let order = self.get_order(id)?;
		if !order.is_pending() {
			return Err(QueueError::InvalidState {
				id,
				status: order.status,
				operation,
			});
		}
		Ok(())
	}

	/// Updates an order with a closure and returns the new record.
	///
	/// Callers must have validated their preconditions first; the closure
	/// itself must uphold the record invariants.
	fn update_with<F>(&mut self, id: OrderId, updater: F) -> Result<Order, QueueError>
	where
		F: FnOnce(&mut Order),
	{
		let order = self.store.get_mut(id).ok_or(QueueError::NotFound(id))?;
		updater(order);
		Ok(order.clone())
	}
}

/// Moves an order to a new lifecycle status, keeping the dependent fields
/// consistent: leaving PendingDispatch resets the dispatch status, and the
/// reason/detail fields survive only under the status that requires them.
/// A recorded settled amount is never cleared; an order voided after
/// completing keeps its settlement on the books.
fn set_status(order: &mut Order, status: OrderStatus) {
	order.status = status;
	if status != OrderStatus::PendingDispatch {
		order.dispatch_status = DispatchStatus::Normal;
	}
	if status != OrderStatus::Returned {
		order.return_reason = None;
	}
	if status != OrderStatus::Error {
		order.error_detail = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::{order_with_status, pending_order, pending_with, store_of};

	fn machine_of(orders: impl IntoIterator<Item = Order>) -> OrderStateMachine {
		OrderStateMachine::new(store_of(orders))
	}

	#[test]
	fn test_dispatch_pending_order() {
		let mut machine = machine_of([pending_with(5, DispatchStatus::Urgent)]);

		let updated = machine.dispatch(OrderId(5)).unwrap();
		assert_eq!(updated.status, OrderStatus::Completed);
		assert_eq!(updated.dispatch_status, DispatchStatus::Normal);
	}

	#[test]
	fn test_dispatch_twice_fails() {
		let mut machine = machine_of([pending_order(5)]);
		machine.dispatch(OrderId(5)).unwrap();

		let result = machine.dispatch(OrderId(5));
		assert!(matches!(
			result,
			Err(QueueError::InvalidState {
				id: OrderId(5),
				status: OrderStatus::Completed,
				operation: TransitionKind::Dispatch,
			})
		));
	}

	#[test]
	fn test_dispatch_unknown_id() {
		let mut machine = machine_of([pending_order(1)]);
		let result = machine.dispatch(OrderId(99));
		assert!(matches!(result, Err(QueueError::NotFound(OrderId(99)))));
	}

	#[test]
	fn test_complete_records_amount() {
		let mut machine = machine_of([pending_order(3)]);

		let updated = machine
			.complete(OrderId(3), Decimal::new(420, 0))
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Completed);
		assert_eq!(updated.settled_amount, Some(Decimal::new(420, 0)));
	}

	#[test]
	fn test_complete_requires_pending() {
		let mut machine = machine_of([order_with_status(3, OrderStatus::Void)]);

		let result = machine.complete(OrderId(3), Decimal::new(420, 0));
		assert!(matches!(
			result,
			Err(QueueError::InvalidState {
				operation: TransitionKind::Complete,
				..
			})
		));
	}

	#[test]
	fn test_void_from_pending_and_completed() {
		let mut machine = machine_of([
			pending_with(1, DispatchStatus::Timeout),
			order_with_status(2, OrderStatus::Completed),
			order_with_status(3, OrderStatus::Error),
		]);

		let voided = machine.void(OrderId(1)).unwrap();
		assert_eq!(voided.status, OrderStatus::Void);
		assert_eq!(voided.dispatch_status, DispatchStatus::Normal);

		assert!(machine.void(OrderId(2)).is_ok());

		// Voiding an errored order clears its detail.
		let voided = machine.void(OrderId(3)).unwrap();
		assert_eq!(voided.error_detail, None);
	}

	#[test]
	fn test_void_terminal_states_fail() {
		let mut machine = machine_of([
			order_with_status(1, OrderStatus::Returned),
			order_with_status(2, OrderStatus::Void),
		]);

		assert!(matches!(
			machine.void(OrderId(1)),
			Err(QueueError::InvalidState {
				status: OrderStatus::Returned,
				..
			})
		));
		assert!(matches!(
			machine.void(OrderId(2)),
			Err(QueueError::InvalidState {
				status: OrderStatus::Void,
				..
			})
		));
	}

	#[test]
	fn test_void_after_complete_keeps_settlement() {
		let mut machine = machine_of([pending_order(1)]);
		machine.complete(OrderId(1), Decimal::new(280, 0)).unwrap();

		let voided = machine.void(OrderId(1)).unwrap();
		assert_eq!(voided.status, OrderStatus::Void);
		// The settlement stays on the books through the void.
		assert_eq!(voided.settled_amount, Some(Decimal::new(280, 0)));
	}

	#[test]
	fn test_mark_returned() {
		let mut machine = machine_of([pending_order(9)]);

		let updated = machine
			.mark_returned(OrderId(9), " 客户改期，联系不上 ")
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Returned);
		assert_eq!(
			updated.return_reason.as_deref(),
			Some("客户改期，联系不上")
		);
		assert_eq!(updated.dispatch_status, DispatchStatus::Normal);
	}

	#[test]
	fn test_mark_returned_empty_reason_leaves_order_unchanged() {
		let mut machine = machine_of([pending_with(9, DispatchStatus::Urgent)]);
		let before = machine.get_order(OrderId(9)).unwrap().clone();

		let result = machine.mark_returned(OrderId(9), "");
		assert!(matches!(result, Err(QueueError::Validation(_))));
		let result = machine.mark_returned(OrderId(9), "   ");
		assert!(matches!(result, Err(QueueError::Validation(_))));

		assert_eq!(machine.get_order(OrderId(9)).unwrap(), &before);
	}

	#[test]
	fn test_mark_error_replaces_return_reason() {
		let mut machine = machine_of([order_with_status(4, OrderStatus::Returned)]);

		let updated = machine
			.mark_error(OrderId(4), "现场与描述不符，需加价")
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Error);
		assert_eq!(
			updated.error_detail.as_deref(),
			Some("现场与描述不符，需加价")
		);
		assert_eq!(updated.return_reason, None);
	}

	#[test]
	fn test_mark_error_empty_detail() {
		let mut machine = machine_of([pending_order(4)]);
		let result = machine.mark_error(OrderId(4), "\t ");
		assert!(matches!(result, Err(QueueError::Validation(_))));
	}

	#[test]
	fn test_escalate() {
		let mut machine = machine_of([pending_order(6)]);

		let updated = machine
			.escalate(OrderId(6), EscalationLevel::Urgent)
			.unwrap();
		assert_eq!(updated.dispatch_status, DispatchStatus::Urgent);

		let updated = machine
			.escalate(OrderId(6), EscalationLevel::Timeout)
			.unwrap();
		assert_eq!(updated.dispatch_status, DispatchStatus::Timeout);
	}

	#[test]
	fn test_escalate_non_pending_fails() {
		let mut machine = machine_of([order_with_status(6, OrderStatus::Completed)]);

		let result = machine.escalate(OrderId(6), EscalationLevel::Urgent);
		assert!(matches!(
			result,
			Err(QueueError::InvalidState {
				operation: TransitionKind::Escalate,
				..
			})
		));
	}

	#[test]
	fn test_apply_dispatches_on_operation() {
		let mut machine = machine_of([pending_order(1), pending_order(2)]);

		let updated = machine
			.apply(
				OrderId(1),
				Transition::Complete {
					amount: Decimal::new(199, 0),
				},
			)
			.unwrap();
		assert_eq!(updated.settled_amount, Some(Decimal::new(199, 0)));

		let updated = machine
			.apply(
				OrderId(2),
				Transition::MarkReturned {
					reason: "客户取消".to_string(),
				},
			)
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Returned);
	}

	#[test]
	fn test_invariants_hold_across_transition_sequences() {
		let mut machine = machine_of((1..=6).map(pending_order));

		machine
			.escalate(OrderId(1), EscalationLevel::Urgent)
			.unwrap();
		machine
			.escalate(OrderId(2), EscalationLevel::Timeout)
			.unwrap();
		machine.dispatch(OrderId(1)).unwrap();
		machine.complete(OrderId(2), Decimal::new(300, 0)).unwrap();
		machine.void(OrderId(3)).unwrap();
		machine.mark_returned(OrderId(4), "客户改期").unwrap();
		machine.mark_error(OrderId(5), "地址不存在").unwrap();

		for order in machine.store().iter() {
			if order.dispatch_status != DispatchStatus::Normal {
				assert_eq!(order.status, OrderStatus::PendingDispatch);
			}
			assert_eq!(
				order.return_reason.is_some(),
				order.status == OrderStatus::Returned
			);
			assert_eq!(
				order.error_detail.is_some(),
				order.status == OrderStatus::Error
			);
		}
	}

	#[test]
	fn test_complete_many_uses_receivable_and_collects_failures() {
		let mut machine = machine_of([
			pending_order(1),
			order_with_status(2, OrderStatus::Void),
			pending_order(3),
		]);

		let outcome = machine.complete_many(&[OrderId(1), OrderId(2), OrderId(3), OrderId(99)]);

		assert_eq!(outcome.applied.len(), 2);
		assert_eq!(
			outcome.applied[0].settled_amount,
			Some(outcome.applied[0].total_amount)
		);
		assert_eq!(outcome.failures.len(), 2);
		assert!(matches!(
			&outcome.failures[0],
			(OrderId(2), QueueError::InvalidState { .. })
		));
		assert!(matches!(
			&outcome.failures[1],
			(OrderId(99), QueueError::NotFound(_))
		));
	}

	#[test]
	fn test_void_many_continues_past_failures() {
		let mut machine = machine_of([
			pending_order(1),
			order_with_status(2, OrderStatus::Returned),
			pending_order(3),
		]);

		let outcome = machine.void_many(&[OrderId(1), OrderId(2), OrderId(3)]);
		assert_eq!(outcome.applied.len(), 2);
		assert_eq!(outcome.failures.len(), 1);
		assert!(machine.get_order(OrderId(3)).unwrap().status == OrderStatus::Void);
	}

	#[test]
	fn test_into_store_returns_the_working_set() {
		let mut machine = machine_of([pending_order(1), pending_order(2)]);
		machine.dispatch(OrderId(1)).unwrap();

		let store = machine.into_store();
		assert_eq!(store.len(), 2);
		assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Completed);
	}
}
