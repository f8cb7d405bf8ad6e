//! Deterministic sample working set.
//!
//! Builds the board the demo drives against. Field values cycle through the
//! real catalogues index by index, so two runs seeded at the same instant
//! produce identical boards. Pending orders get expected service times
//! staggered around the seeding instant; the escalation sweep is what turns
//! the overdue ones urgent or timed out.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use dispatch_types::{
	DispatchMethod, DispatchStatus, Order, OrderId, OrderStatus, ServiceRatio,
};

const SERVICES: [&str; 9] = [
	"家庭保洁日常",
	"深度家电清洗",
	"甲醛治理",
	"玻璃清洗",
	"管道疏通",
	"空调清洗",
	"开荒保洁",
	"收纳整理",
	"沙发清洗",
];

const WARRANTIES: [&str; 5] = ["质保3天", "质保7天", "质保30天", "质保90天", "无质保"];

const REGIONS: [&str; 8] = [
	"北京市/朝阳区",
	"上海市/浦东新区",
	"深圳市/南山区",
	"杭州市/西湖区",
	"成都市/武侯区",
	"广州市/天河区",
	"武汉市/江汉区",
	"南京市/鼓楼区",
];

const SOURCES: [&str; 6] = ["小程序", "电话", "美团", "转介绍", "抖音", "58同城"];

const ESTATES: [&str; 5] = ["阳光", "幸福", "金地", "万科", "恒大"];

const ADDRESS_NOTES: [&str; 5] = [
	"(靠近东门门岗，需刷卡)",
	"(楼下有快递柜，电梯需梯控)",
	"(小区正在施工，请从北门进)",
	"(大堂右转第一部电梯)",
	"(物业处登记后进入)",
];

const DETAILS: [&str; 5] = [
	"客户备注：需带3米梯子，家里有大型犬请注意安全。另外需要重点清理厨房油烟机死角。",
	"特殊要求：家里有孕妇，请使用无刺激性清洁剂。进门请穿鞋套，需要开具增值税发票。",
	"时间要求：尽量上午10点前到达，下午客户要出门。需带大功率吸尘器，地毯灰尘较多。",
	"刚装修完，全屋开荒保洁，玻璃窗户较多。注意不要弄脏墙面乳胶漆。",
	"老客户，要求指派上次的李师傅。如果李师傅没空，请安排经验丰富的老师傅。",
];

const COEFFICIENTS: [f64; 5] = [1.0, 1.1, 1.2, 1.3, 1.5];

const RATIOS: [ServiceRatio; 3] = [
	ServiceRatio::ThreeSeven,
	ServiceRatio::FourSix,
	ServiceRatio::TwoEight,
];

/// Builds `count` sample orders around the seeding instant.
pub fn sample_orders(count: usize, now: DateTime<Utc>) -> Vec<Order> {
	(0..count).map(|i| sample_order(i, now)).collect()
}

fn sample_order(i: usize, now: DateTime<Utc>) -> Order {
	let id = (i + 1) as u64;

	let (status, return_reason, error_detail) = if i % 5 == 0 {
		(OrderStatus::PendingDispatch, None, None)
	} else if i % 15 == 1 {
		(OrderStatus::Void, None, None)
	} else if i % 15 == 2 {
		(
			OrderStatus::Returned,
			Some("客户改期/联系不上".to_string()),
			None,
		)
	} else if i % 15 == 3 {
		(
			OrderStatus::Error,
			None,
			Some("现场与描述不符，需加价".to_string()),
		)
	} else {
		(OrderStatus::Completed, None, None)
	};

	let service_item = SERVICES[i % SERVICES.len()];
	let high_value = service_item.contains("深度")
		|| service_item.contains("甲醛")
		|| service_item.contains("开荒");
	let market_price = if high_value {
		Decimal::from(300 + (i % 10) * 20)
	} else {
		Decimal::from(100 + (i % 5) * 10)
	};

	let total_amount = Decimal::from(150 + (i % 20) * 20);
	let cost_share = if i % 2 == 0 {
		Decimal::new(6, 1)
	} else {
		Decimal::new(7, 1)
	};

	let address = format!(
		"{}花园 {}栋 {}0{}室 {}",
		ESTATES[i % 5],
		i % 20 + 1,
		i % 30 + 1,
		i % 4 + 1,
		ADDRESS_NOTES[i % 5],
	);

	Order {
		id: OrderId(id),
		order_no: format!("ORD-{id:06}"),
		work_order_no: format!("WO-{}", 9980 + id),
		service_item: service_item.to_string(),
		warranty: WARRANTIES[i % WARRANTIES.len()].to_string(),
		region: REGIONS[i % REGIONS.len()].to_string(),
		address,
		detail: DETAILS[i % 5].to_string(),
		source: SOURCES[i % SOURCES.len()].to_string(),
		mobile: format!("13{}****{:04}", i % 9 + 1, (1000 + i) % 10_000),
		total_amount,
		cost: total_amount * cost_share,
		service_ratio: RATIOS[i % 3],
		dispatch_method: if high_value {
			DispatchMethod::Negotiate
		} else {
			DispatchMethod::Grab
		},
		market_price,
		history_price_low: (market_price * Decimal::new(8, 1)).floor(),
		history_price_high: (market_price * Decimal::new(12, 1)).floor(),
		weighted_coefficient: COEFFICIENTS[i % COEFFICIENTS.len()],
		region_people: (i % 6) as u32,
		status,
		dispatch_status: DispatchStatus::Normal,
		has_advance_payment: i % 7 == 0,
		deposit_amount: (i % 12 == 0).then(|| Decimal::from(50)),
		return_reason,
		error_detail,
		settled_amount: None,
		record_time: now - Duration::hours(24) + Duration::minutes((i % 60) as i64),
		expected_time: expected_time(i, status, now),
	}
}

/// Staggers expected service times so a board seeded at `now` has on-time,
/// urgent-eligible and timeout-eligible pending orders.
fn expected_time(i: usize, status: OrderStatus, now: DateTime<Utc>) -> DateTime<Utc> {
	if status == OrderStatus::PendingDispatch {
		let offset = match (i / 5) % 4 {
			0 => Duration::hours(2),
			1 => -Duration::minutes(45),
			2 => -Duration::hours(3),
			_ => Duration::minutes(30),
		};
		now + offset
	} else {
		now - Duration::hours(20) + Duration::hours((i % 10) as i64)
	}
}
