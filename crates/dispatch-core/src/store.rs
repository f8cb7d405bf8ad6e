//! In-memory working set for the dispatch queue.
//!
//! Orders live in an insertion-ordered vector with an id index over it, so
//! single-order lookups stay O(1) while iteration preserves arrival order,
//! which the queue sorter relies on for its tie-break. The set only grows:
//! completed, voided, returned and errored orders stay on the books.

use std::collections::HashMap;

use dispatch_types::{DispatchStatus, Order, OrderId, OrderStatus};

use crate::QueueError;

/// The full order collection owned by the engine.
///
/// All mutation of stored records goes through the state machine; external
/// collaborators only ever insert new orders or read.
#[derive(Debug, Default)]
pub struct OrderStore {
	orders: Vec<Order>,
	index: HashMap<OrderId, usize>,
}

impl OrderStore {
	/// Creates an empty working set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a working set from an order source, validating every record.
	pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> Result<Self, QueueError> {
		let mut store = Self::new();
		for order in orders {
			store.insert(order)?;
		}
		Ok(store)
	}

	/// Adds a new order to the working set.
	///
	/// Rejects duplicate ids and records that violate the field invariants;
	/// on rejection the set is unchanged.
	pub fn insert(&mut self, order: Order) -> Result<(), QueueError> {
		if self.index.contains_key(&order.id) {
			return Err(QueueError::Validation(format!(
				"duplicate order id {}",
				order.id
			)));
		}
		check_record(&order)?;
		self.index.insert(order.id, self.orders.len());
		self.orders.push(order);
		Ok(())
	}

	/// Looks up an order by id.
	pub fn get(&self, id: OrderId) -> Option<&Order> {
		self.index.get(&id).map(|&slot| &self.orders[slot])
	}

	/// Whether an order with this id is in the working set.
	pub fn contains(&self, id: OrderId) -> bool {
		self.index.contains_key(&id)
	}

	/// Iterates the working set in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, Order> {
		self.orders.iter()
	}

	/// Number of orders in the working set.
	pub fn len(&self) -> usize {
		self.orders.len()
	}

	/// Whether the working set is empty.
	pub fn is_empty(&self) -> bool {
		self.orders.is_empty()
	}

	/// Mutable lookup reserved for the state machine.
	pub(crate) fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
		self.index.get(&id).map(|&slot| &mut self.orders[slot])
	}
}

impl<'a> IntoIterator for &'a OrderStore {
	type Item = &'a Order;
	type IntoIter = std::slice::Iter<'a, Order>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Validates the field invariants an order must satisfy to enter the set.
fn check_record(order: &Order) -> Result<(), QueueError> {
	if order.history_price_low > order.history_price_high {
		return Err(QueueError::Validation(format!(
			"order {}: history price range inverted ({} > {})",
			order.id, order.history_price_low, order.history_price_high
		)));
	}
	if let Some(deposit) = order.deposit_amount {
		if deposit.is_sign_negative() {
			return Err(QueueError::Validation(format!(
				"order {}: negative deposit {}",
				order.id, deposit
			)));
		}
	}
	if order.dispatch_status != DispatchStatus::Normal && !order.is_pending() {
		return Err(QueueError::Validation(format!(
			"order {}: dispatch status {} outside pending dispatch",
			order.id, order.dispatch_status
		)));
	}
	let returned = order.status == OrderStatus::Returned;
	if returned != order.return_reason.is_some() {
		return Err(QueueError::Validation(format!(
			"order {}: return reason must be present exactly when status is Returned",
			order.id
		)));
	}
	let errored = order.status == OrderStatus::Error;
	if errored != order.error_detail.is_some() {
		return Err(QueueError::Validation(format!(
			"order {}: error detail must be present exactly when status is Error",
			order.id
		)));
	}
	if order.settled_amount.is_some() && order.status != OrderStatus::Completed {
		return Err(QueueError::Validation(format!(
			"order {}: settled amount recorded outside Completed",
			order.id
		)));
	}
	Ok(())
}
