/// Zero-based slice of the ordered match set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
	pub offset: u64,
	pub limit: u32,
}

pub struct Paginator;
impl Paginator {
	/// `page` and `limit` are validated as at least one before they reach here.
	pub fn window(page: u32, limit: u32) -> PageWindow {
		let offset = u64::from(page.saturating_sub(1)).saturating_mul(u64::from(limit));

		PageWindow { offset, limit }
	}

	pub fn total_pages(total_items: u64, limit: u32) -> u64 {
		if limit == 0 {
			return 0;
		}

		total_items.div_ceil(u64::from(limit))
	}
}
