//! Order builders shared by the test modules in this crate.

use chrono::{Duration, TimeZone, Utc};
use dispatch_types::{
	DispatchMethod, DispatchStatus, Order, OrderId, OrderStatus, ServiceRatio,
};
use rust_decimal::Decimal;

use crate::store::OrderStore;

/// A pending order with unremarkable field values.
pub(crate) fn pending_order(id: u64) -> Order {
	let recorded = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
	Order {
		id: OrderId(id),
		order_no: format!("ORD-{id:06}"),
		work_order_no: format!("WO-{id:06}"),
		service_item: "家电维修".to_string(),
		warranty: "保修一年".to_string(),
		region: "朝阳区".to_string(),
		address: format!("建国路{id}号"),
		detail: "空调不制冷".to_string(),
		source: "微信小程序".to_string(),
		mobile: "138****1234".to_string(),
		total_amount: Decimal::new(350, 0),
		cost: Decimal::new(200, 0),
		service_ratio: ServiceRatio::ThreeSeven,
		dispatch_method: DispatchMethod::Grab,
		market_price: Decimal::new(320, 0),
		history_price_low: Decimal::new(256, 0),
		history_price_high: Decimal::new(384, 0),
		weighted_coefficient: 1.0,
		region_people: 8,
		status: OrderStatus::PendingDispatch,
		dispatch_status: DispatchStatus::Normal,
		has_advance_payment: false,
		deposit_amount: None,
		return_reason: None,
		error_detail: None,
		settled_amount: None,
		record_time: recorded,
		expected_time: recorded + Duration::hours(4),
	}
}

/// A pending order at the given dispatch status.
pub(crate) fn pending_with(id: u64, dispatch_status: DispatchStatus) -> Order {
	let mut order = pending_order(id);
	order.dispatch_status = dispatch_status;
	order
}

/// An order already in the given lifecycle status.
pub(crate) fn order_with_status(id: u64, status: OrderStatus) -> Order {
	let mut order = pending_order(id);
	order.status = status;
	match status {
		OrderStatus::Returned => order.return_reason = Some("客户改期".to_string()),
		OrderStatus::Error => order.error_detail = Some("现场与描述不符".to_string()),
		_ => {}
	}
	order
}

/// A store seeded with the given orders, panicking on invalid fixtures.
pub(crate) fn store_of(orders: impl IntoIterator<Item = Order>) -> OrderStore {
	let mut store = OrderStore::new();
	for order in orders {
		store.insert(order).unwrap();
	}
	store
}
