//! Page slicing over the sorted queue.
//!
//! The pager is a pure view: every call re-sorts and re-slices from the
//! working set, so a page can never go stale after a mutation. Page numbers
//! start at 1; a past-the-end page is an empty slice, not a fault.

use serde::{Deserialize, Serialize};

use dispatch_types::Order;

use crate::queue::sort_queue;
use crate::store::OrderStore;
use crate::QueueError;

/// Page sizes the operations desk offers.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// One page of the sorted queue, with the totals the desk header shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
	/// Orders on this page, in queue order.
	pub items: Vec<Order>,
	/// Page number this slice was taken at, starting from 1.
	pub page_number: usize,
	/// Page size this slice was taken at.
	pub page_size: usize,
	/// Orders in the whole working set.
	pub total_items: usize,
	/// Pages at this size; an empty set still counts one displayable page.
	pub total_pages: usize,
}

/// Slices one page out of an already sorted sequence.
///
/// `page_size` must be at least 1 and `page_number` at least 1; both are
/// refused as caller errors otherwise. A page number past the end yields an
/// empty item list with the totals intact.
pub fn paginate(
	sorted: &[Order],
	page_size: usize,
	page_number: usize,
) -> Result<PageResult, QueueError> {
	if page_size == 0 {
		return Err(QueueError::Caller(
			"page size must be at least 1".to_string(),
		));
	}
	if page_number == 0 {
		return Err(QueueError::Caller(
			"page numbers start at 1".to_string(),
		));
	}
	let total_items = sorted.len();
	let total_pages = total_items.div_ceil(page_size).max(1);
	let start = (page_number - 1).saturating_mul(page_size);
	let items = sorted.iter().skip(start).take(page_size).cloned().collect();
	Ok(PageResult {
		items,
		page_number,
		page_size,
		total_items,
		total_pages,
	})
}

/// Sorts the working set and slices the requested page out of it.
pub fn list_page(
	store: &OrderStore,
	page_size: usize,
	page_number: usize,
) -> Result<PageResult, QueueError> {
	let sorted = sort_queue(store);
	paginate(&sorted, page_size, page_number)
}

/// Caller-side paging state.
///
/// Packages the two obligations the pager contract leaves with the caller:
/// changing the page size snaps back to the first page, and page numbers are
/// clamped into the displayable range before asking for a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
	page_size: usize,
	page_number: usize,
}

impl PageCursor {
	/// A cursor at the first page of the default size.
	pub fn new() -> Self {
		Self {
			page_size: PAGE_SIZE_OPTIONS[0],
			page_number: 1,
		}
	}

	/// Current page size.
	pub fn page_size(&self) -> usize {
		self.page_size
	}

	/// Current page number.
	pub fn page_number(&self) -> usize {
		self.page_number
	}

	/// Switches to a new page size and snaps back to the first page.
	pub fn set_size(&mut self, size: usize) {
		self.page_size = size.max(1);
		self.page_number = 1;
	}

	/// Moves to a page, clamped into the displayable range.
	pub fn set_page(&mut self, number: usize, total_pages: usize) {
		self.page_number = number.clamp(1, total_pages.max(1));
	}
}

impl Default for PageCursor {
	fn default() -> Self {
		Self::new()
	}
}
