//! Row-menu action routing.
//!
//! The presentation layer sends the label of whichever menu entry the
//! operator clicked. Routing decides whether that label is one of the closed
//! set of mutating actions, in which case the caller gets the transition to
//! apply, or a display-only action passed back untouched. Routing itself
//! never mutates the working set.

use serde::{Deserialize, Serialize};

use dispatch_types::{MenuAction, OrderId, TransitionKind};

use crate::store::OrderStore;
use crate::QueueError;

/// What a routed action resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouteOutcome {
	/// The action maps to a state-machine transition; the caller collects
	/// the remaining arguments and applies it.
	Transition {
		/// Operation the action resolved to.
		kind: TransitionKind,
	},
	/// Display-only action reported back as a notice.
	Informational {
		/// Label to surface, canonical for known actions, verbatim for
		/// unknown ones.
		label: String,
	},
}

/// Routes an action label against an order in the working set.
///
/// Unknown order ids fail with `NotFound` regardless of the label.
pub fn route(
	store: &OrderStore,
	action_name: &str,
	id: OrderId,
) -> Result<RouteOutcome, QueueError> {
	if !store.contains(id) {
		return Err(QueueError::NotFound(id));
	}
	let outcome = match MenuAction::from_label(action_name) {
		Some(action) => match action.transition_kind() {
			Some(kind) => RouteOutcome::Transition { kind },
			None => RouteOutcome::Informational {
				label: action.label().to_string(),
			},
		},
		None => RouteOutcome::Informational {
			label: action_name.to_string(),
		},
	};
	tracing::debug!(
		component = "router",
		order_id = %id,
		action = action_name,
		"Routed menu action"
	);
	Ok(outcome)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::{pending_order, store_of};

	#[test]
	fn test_complete_label_routes_to_transition() {
		let store = store_of([pending_order(12)]);

		let outcome = route(&store, "完单", OrderId(12)).unwrap();
		assert_eq!(
			outcome,
			RouteOutcome::Transition {
				kind: TransitionKind::Complete
			}
		);
	}

	#[test]
	fn test_void_and_error_labels_route_to_transitions() {
		let store = store_of([pending_order(1)]);

		assert_eq!(
			route(&store, "作废", OrderId(1)).unwrap(),
			RouteOutcome::Transition {
				kind: TransitionKind::Void
			}
		);
		assert_eq!(
			route(&store, "添加报错", OrderId(1)).unwrap(),
			RouteOutcome::Transition {
				kind: TransitionKind::MarkError
			}
		);
	}

	#[test]
	fn test_display_only_label_passes_through() {
		let store = store_of([pending_order(12)]);
		let before: Vec<_> = store.iter().cloned().collect();

		let outcome = route(&store, "查资源", OrderId(12)).unwrap();
		assert_eq!(
			outcome,
			RouteOutcome::Informational {
				label: "查资源".to_string()
			}
		);

		let after: Vec<_> = store.iter().cloned().collect();
		assert_eq!(before, after);
	}

	#[test]
	fn test_unknown_label_passes_through_verbatim() {
		let store = store_of([pending_order(1)]);

		let outcome = route(&store, "催款通知", OrderId(1)).unwrap();
		assert_eq!(
			outcome,
			RouteOutcome::Informational {
				label: "催款通知".to_string()
			}
		);
	}

	#[test]
	fn test_unknown_id_fails_not_found() {
		let store = store_of([pending_order(1)]);

		let result = route(&store, "完单", OrderId(404));
		assert!(matches!(result, Err(QueueError::NotFound(OrderId(404)))));

		// Even display-only labels need a real order.
		let result = route(&store, "详情", OrderId(404));
		assert!(matches!(result, Err(QueueError::NotFound(_))));
	}

	#[test]
	fn test_outcome_serializes_tagged() {
		let store = store_of([pending_order(1)]);

		let outcome = route(&store, "完单", OrderId(1)).unwrap();
		let json = serde_json::to_value(&outcome).unwrap();
		assert_eq!(json["type"], "transition");
		assert_eq!(json["kind"], "complete");

		let outcome = route(&store, "开票", OrderId(1)).unwrap();
		let json = serde_json::to_value(&outcome).unwrap();
		assert_eq!(json["type"], "informational");
		assert_eq!(json["label"], "开票");
	}
}
