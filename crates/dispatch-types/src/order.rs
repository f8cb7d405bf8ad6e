//! Order record types for the dispatch queue.
//!
//! This module defines the central order entity together with its lifecycle
//! status, dispatch sub-status, and the fixed commercial enums (dispatch
//! method, revenue split ratio) carried by every record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique numeric identifier of an order.
///
/// Assigned at creation by the upstream order source, never reused, and
/// stable for the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u64> for OrderId {
	fn from(id: u64) -> Self {
		OrderId(id)
	}
}

/// A home-service work order as held in the dispatch working set.
///
/// Identity and classification fields are written once by the order source;
/// status, dispatch status, and the auxiliary reason/detail fields change
/// only through the state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier for this order.
	pub id: OrderId,
	/// Customer-facing order number.
	pub order_no: String,
	/// Internal work order number.
	pub work_order_no: String,
	/// Service item being ordered (e.g. appliance repair, deep cleaning).
	pub service_item: String,
	/// Warranty terms quoted to the customer.
	pub warranty: String,
	/// Service region the order belongs to.
	pub region: String,
	/// Street address for the visit.
	pub address: String,
	/// Free-text description of the job.
	pub detail: String,
	/// Channel the order came in through.
	pub source: String,
	/// Masked customer contact number.
	pub mobile: String,
	/// Amount receivable from the customer.
	pub total_amount: Decimal,
	/// Estimated cost of fulfilling the order.
	pub cost: Decimal,
	/// Suggested revenue split between platform and technician.
	pub service_ratio: ServiceRatio,
	/// Suggested way of assigning the order to a technician.
	pub dispatch_method: DispatchMethod,
	/// Current market price for this service item.
	pub market_price: Decimal,
	/// Lowest price this service settled at historically.
	pub history_price_low: Decimal,
	/// Highest price this service settled at historically.
	pub history_price_high: Decimal,
	/// Performance weighting applied when attributing this order.
	pub weighted_coefficient: f64,
	/// Technicians currently available in the region.
	pub region_people: u32,
	/// Lifecycle status of the order.
	pub status: OrderStatus,
	/// Escalation sub-status, meaningful only while pending dispatch.
	pub dispatch_status: DispatchStatus,
	/// Whether the customer paid in advance.
	pub has_advance_payment: bool,
	/// Deposit collected up front, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deposit_amount: Option<Decimal>,
	/// Reason the order was returned; present iff status is Returned.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub return_reason: Option<String>,
	/// Problem description; present iff status is Error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_detail: Option<String>,
	/// Amount the order settled at; written by the complete transition.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settled_amount: Option<Decimal>,
	/// When the order was recorded.
	pub record_time: DateTime<Utc>,
	/// When the service visit is expected to happen.
	pub expected_time: DateTime<Utc>,
}

impl Order {
	/// Whether the order is still awaiting assignment to a technician.
	pub fn is_pending(&self) -> bool {
		self.status == OrderStatus::PendingDispatch
	}
}

/// Lifecycle status of an order.
///
/// Exactly one status is active at a time. Orders enter the working set as
/// PendingDispatch and leave it never; completed, voided, returned and
/// errored records stay visible and sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
	/// Awaiting assignment to a technician.
	PendingDispatch,
	/// Assigned and finished (via dispatch or complete).
	Completed,
	/// Cancelled by operations; kept for the record.
	Void,
	/// Sent back by the customer or after-sales.
	Returned,
	/// Flagged with a problem that blocks normal handling.
	Error,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::PendingDispatch => write!(f, "PendingDispatch"),
			OrderStatus::Completed => write!(f, "Completed"),
			OrderStatus::Void => write!(f, "Void"),
			OrderStatus::Returned => write!(f, "Returned"),
			OrderStatus::Error => write!(f, "Error"),
		}
	}
}

/// Escalation sub-status of a pending order.
///
/// Computed from elapsed wait by the escalation sweep; must be Normal
/// whenever the order is no longer pending dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchStatus {
	/// Within the expected service window.
	Normal,
	/// Customer is pushing; needs an operator now.
	Urgent,
	/// Past the timeout threshold without assignment.
	Timeout,
}

impl fmt::Display for DispatchStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DispatchStatus::Normal => write!(f, "Normal"),
			DispatchStatus::Urgent => write!(f, "Urgent"),
			DispatchStatus::Timeout => write!(f, "Timeout"),
		}
	}
}

/// Suggested way of assigning an order to a technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchMethod {
	/// Open first-come assignment.
	Grab,
	/// Price and assignment negotiated with a specific technician.
	Negotiate,
}

impl fmt::Display for DispatchMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DispatchMethod::Grab => write!(f, "Grab"),
			DispatchMethod::Negotiate => write!(f, "Negotiate"),
		}
	}
}

/// Suggested platform/technician revenue split for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceRatio {
	/// 30% platform, 70% technician.
	#[serde(rename = "3:7")]
	ThreeSeven,
	/// 20% platform, 80% technician.
	#[serde(rename = "2:8")]
	TwoEight,
	/// 40% platform, 60% technician.
	#[serde(rename = "4:6")]
	FourSix,
}

impl fmt::Display for ServiceRatio {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ServiceRatio::ThreeSeven => write!(f, "3:7"),
			ServiceRatio::TwoEight => write!(f, "2:8"),
			ServiceRatio::FourSix => write!(f, "4:6"),
		}
	}
}
