//! Order queue management engine for the dispatch operations desk.
//!
//! This crate owns the working set of home-service work orders and everything
//! that derives from it: the urgency classification that decides queue
//! priority, the stable sort producing the operator's view, the state machine
//! that applies lifecycle transitions, the pager that slices the sorted view,
//! and the router that turns row-menu actions into transitions or
//! pass-through notices.
//!
//! The engine is synchronous and single-writer. Callers serialize mutating
//! access; read paths (classify, sort, paginate, summarize) are pure and can
//! be recomputed freely. After every mutation the view is rebuilt from
//! scratch, which is the freshness guarantee the operations desk relies on.

use dispatch_types::{OrderId, OrderStatus, TransitionKind};
use thiserror::Error;

/// Escalation policy and the periodic sweep applying it.
pub mod escalation;
/// Order state machine applying lifecycle transitions.
pub mod machine;
/// Page slicing over the sorted queue and the caller-side page cursor.
pub mod pager;
/// Urgency classification and queue ordering.
pub mod queue;
/// Row-menu action routing onto transitions.
pub mod router;
/// In-memory working set indexed by order id.
pub mod store;
/// Working-set counters and revenue figures.
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures;

pub use escalation::EscalationPolicy;
pub use machine::{BatchOutcome, OrderStateMachine};
pub use pager::{PageCursor, PageResult, PAGE_SIZE_OPTIONS};
pub use queue::UrgencyTier;
pub use router::RouteOutcome;
pub use store::OrderStore;
pub use summary::QueueSummary;

/// Errors surfaced by the queue engine.
///
/// All variants are recoverable: the caller shows them to the operator and
/// the working set is left exactly as it was.
#[derive(Debug, Error)]
pub enum QueueError {
	/// No order with the given id in the working set.
	#[error("Order not found: {0}")]
	NotFound(OrderId),
	/// A transition precondition was violated.
	#[error("Cannot {operation} order {id} in status {status}")]
	InvalidState {
		/// Order the transition targeted.
		id: OrderId,
		/// Status the order was in when the transition was refused.
		status: OrderStatus,
		/// Operation that was refused.
		operation: TransitionKind,
	},
	/// A required field was missing or a record was malformed.
	#[error("Validation error: {0}")]
	Validation(String),
	/// The caller passed arguments outside the contract.
	#[error("Caller error: {0}")]
	Caller(String),
}
