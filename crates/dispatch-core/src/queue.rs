//! Urgency classification and queue ordering.
//!
//! The operator's queue is the working set sorted by urgency tier alone,
//! highest first. Ties keep arrival order so the view never flickers across
//! re-renders when nothing relevant changed.

use std::cmp::Reverse;

use dispatch_types::{DispatchStatus, Order};

/// Priority tier of an order in the dispatch queue, lowest to highest.
///
/// Only pending orders carry urgency. Urgent outranks Timeout so the order
/// needing immediate human escalation is always the first one an operator
/// sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UrgencyTier {
	/// Already handled (completed, voided, returned or errored).
	Inactive = 0,
	/// Pending within the expected window.
	Waiting = 1,
	/// Pending past the timeout threshold.
	TimedOut = 2,
	/// Pending with the customer pushing.
	Urgent = 3,
}

impl UrgencyTier {
	/// The ordinal used for queue comparison.
	pub fn rank(self) -> u8 {
		self as u8
	}
}

/// Classifies an order into its urgency tier.
///
/// Pure over the order's status fields; safe to call repeatedly from any
/// read path.
pub fn classify(order: &Order) -> UrgencyTier {
	if !order.is_pending() {
		return UrgencyTier::Inactive;
	}
	match order.dispatch_status {
		DispatchStatus::Urgent => UrgencyTier::Urgent,
		DispatchStatus::Timeout => UrgencyTier::TimedOut,
		DispatchStatus::Normal => UrgencyTier::Waiting,
	}
}

/// Sorts orders by urgency tier, descending, keeping input order on ties.
///
/// The sort is stable and deterministic: the same input always yields the
/// same output, and re-sorting an already sorted sequence is a no-op.
pub fn sort_queue<'a, I>(orders: I) -> Vec<Order>
where
	I: IntoIterator<Item = &'a Order>,
{
	let mut sorted: Vec<Order> = orders.into_iter().cloned().collect();
	sorted.sort_by_key(|order| Reverse(classify(order)));
	sorted
}
