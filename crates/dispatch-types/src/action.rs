//! Row-menu action catalogue.
//!
//! Every entry of the per-order action menu is a variant here, keyed by the
//! label the presentation layer sends. Three actions resolve to state-machine
//! transitions; the rest are display-only and pass through the router
//! untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TransitionKind;

/// An entry of the per-order action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuAction {
	/// Copy the order text for sharing.
	CopyOrder,
	/// Open invoicing for the order.
	Invoice,
	/// Close the order out at a settled amount.
	CompleteOrder,
	/// Show the full order detail view.
	Details,
	/// Look up technician resources for the region.
	FindResources,
	/// Attach a problem report to the order.
	ReportError,
	/// Cancel the order while keeping the record.
	VoidOrder,
	/// Record an additional payment.
	ExtraPayment,
	/// Hand the order over to another desk.
	Transfer,
	/// Edit order fields.
	Modify,
	/// Back out of the menu.
	Cancel,
}

impl MenuAction {
	/// Every menu entry, in the order the menu presents them.
	pub const ALL: [MenuAction; 11] = [
		MenuAction::CopyOrder,
		MenuAction::Invoice,
		MenuAction::CompleteOrder,
		MenuAction::Details,
		MenuAction::FindResources,
		MenuAction::ReportError,
		MenuAction::VoidOrder,
		MenuAction::ExtraPayment,
		MenuAction::Transfer,
		MenuAction::Modify,
		MenuAction::Cancel,
	];

	/// Resolves the label the presentation layer sends to a catalogue entry.
	pub fn from_label(label: &str) -> Option<MenuAction> {
		match label {
			"复制订单" => Some(MenuAction::CopyOrder),
			"开票" => Some(MenuAction::Invoice),
			"完单" => Some(MenuAction::CompleteOrder),
			"详情" => Some(MenuAction::Details),
			"查资源" => Some(MenuAction::FindResources),
			"添加报错" => Some(MenuAction::ReportError),
			"作废" => Some(MenuAction::VoidOrder),
			"其他收款" => Some(MenuAction::ExtraPayment),
			"中转" => Some(MenuAction::Transfer),
			"修改" => Some(MenuAction::Modify),
			"取消" => Some(MenuAction::Cancel),
			_ => None,
		}
	}

	/// The canonical menu label for this entry.
	pub fn label(&self) -> &'static str {
		match self {
			MenuAction::CopyOrder => "复制订单",
			MenuAction::Invoice => "开票",
			MenuAction::CompleteOrder => "完单",
			MenuAction::Details => "详情",
			MenuAction::FindResources => "查资源",
			MenuAction::ReportError => "添加报错",
			MenuAction::VoidOrder => "作废",
			MenuAction::ExtraPayment => "其他收款",
			MenuAction::Transfer => "中转",
			MenuAction::Modify => "修改",
			MenuAction::Cancel => "取消",
		}
	}

	/// The transition this action resolves to, if it mutates at all.
	///
	/// The closed mutating set: 完单 completes, 作废 voids, 添加报错 flags an
	/// error. Everything else is display-only.
	pub fn transition_kind(&self) -> Option<TransitionKind> {
		match self {
			MenuAction::CompleteOrder => Some(TransitionKind::Complete),
			MenuAction::VoidOrder => Some(TransitionKind::Void),
			MenuAction::ReportError => Some(TransitionKind::MarkError),
			_ => None,
		}
	}
}

impl fmt::Display for MenuAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.label())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_label_round_trip() {
		for action in MenuAction::ALL {
			assert_eq!(MenuAction::from_label(action.label()), Some(action));
		}
	}

	#[test]
	fn test_unknown_label() {
		assert_eq!(MenuAction::from_label("退款"), None);
		assert_eq!(MenuAction::from_label(""), None);
	}

	#[test]
	fn test_mutating_set_is_closed() {
		let mutating: Vec<MenuAction> = MenuAction::ALL
			.into_iter()
			.filter(|action| action.transition_kind().is_some())
			.collect();
		assert_eq!(
			mutating,
			vec![
				MenuAction::CompleteOrder,
				MenuAction::ReportError,
				MenuAction::VoidOrder,
			]
		);
	}

	#[test]
	fn test_transition_targets() {
		assert_eq!(
			MenuAction::CompleteOrder.transition_kind(),
			Some(TransitionKind::Complete)
		);
		assert_eq!(
			MenuAction::VoidOrder.transition_kind(),
			Some(TransitionKind::Void)
		);
		assert_eq!(
			MenuAction::ReportError.transition_kind(),
			Some(TransitionKind::MarkError)
		);
		assert_eq!(MenuAction::FindResources.transition_kind(), None);
	}
}
