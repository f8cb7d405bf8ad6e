//! Working-set counters for the desk's overview strip.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dispatch_types::{DispatchStatus, OrderStatus};

use crate::store::OrderStore;

/// Counts and revenue figures over the whole working set.
///
/// Derived freshly on every call; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
	/// Orders in the working set.
	pub total_orders: usize,
	/// Orders awaiting dispatch.
	pub pending_dispatch: usize,
	/// Orders closed out.
	pub completed: usize,
	/// Orders voided.
	pub voided: usize,
	/// Orders sent back.
	pub returned: usize,
	/// Orders flagged with a problem.
	pub errored: usize,
	/// Pending orders with the customer pushing.
	pub urgent: usize,
	/// Pending orders past the timeout threshold.
	pub timed_out: usize,
	/// Orders paid in advance.
	pub advance_paid: usize,
	/// Sum of settled amounts on the books, kept even if the order is
	/// later voided.
	pub settled_revenue: Decimal,
	/// Sum of receivable amounts over pending orders.
	pub receivable: Decimal,
}

/// Tallies the working set.
pub fn summarize(store: &OrderStore) -> QueueSummary {
	let mut summary = QueueSummary {
		total_orders: store.len(),
		pending_dispatch: 0,
		completed: 0,
		voided: 0,
		returned: 0,
		errored: 0,
		urgent: 0,
		timed_out: 0,
		advance_paid: 0,
		settled_revenue: Decimal::ZERO,
		receivable: Decimal::ZERO,
	};
	for order in store {
		match order.status {
			OrderStatus::PendingDispatch => {
				summary.pending_dispatch += 1;
				summary.receivable += order.total_amount;
				match order.dispatch_status {
					DispatchStatus::Urgent => summary.urgent += 1,
					DispatchStatus::Timeout => summary.timed_out += 1,
					DispatchStatus::Normal => {}
				}
			}
			OrderStatus::Completed => summary.completed += 1,
			OrderStatus::Void => summary.voided += 1,
			OrderStatus::Returned => summary.returned += 1,
			OrderStatus::Error => summary.errored += 1,
		}
		if order.has_advance_payment {
			summary.advance_paid += 1;
		}
		if let Some(settled) = order.settled_amount {
			summary.settled_revenue += settled;
		}
	}
	summary
}
