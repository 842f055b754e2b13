use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use crate::{Listing, ListingField};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	Desc,
}
impl SortDirection {
	/// `asc` in any letter case is ascending. Every other value, including none, is descending.
	pub fn from_order(order: Option<&str>) -> Self {
		match order {
			Some(order) if order.eq_ignore_ascii_case("asc") => Self::Asc,
			_ => Self::Desc,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// Storage attribute to order by. The name is not checked here; the listing store rejects
/// names it cannot sort on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOrder {
	pub field: String,
	pub direction: SortDirection,
}
impl SortOrder {
	/// Orders two listings on `field`, nulls last when ascending and first when descending.
	/// Ties fall back to ascending id so pages never overlap.
	pub fn compare(field: ListingField, direction: SortDirection, a: &Listing, b: &Listing) -> Ordering {
		let primary = match (a.value(field), b.value(field)) {
			(Some(a), Some(b)) => a.compare(&b).unwrap_or(Ordering::Equal),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		};
		let primary = match direction {
			SortDirection::Asc => primary,
			SortDirection::Desc => primary.reverse(),
		};

		primary.then_with(|| a.id.cmp(&b.id))
	}
}

/// Translates client-facing sort keys into storage attribute names.
#[derive(Clone, Debug)]
pub struct SortResolver {
	aliases: Arc<BTreeMap<String, String>>,
}
impl SortResolver {
	pub fn new(aliases: BTreeMap<String, String>) -> Self {
		Self { aliases: Arc::new(aliases) }
	}

	pub fn from_config(cfg: &estate_config::Search) -> Self {
		Self::new(cfg.sort_aliases.clone())
	}

	pub fn resolve(&self, logical: &str) -> String {
		self.aliases.get(logical).cloned().unwrap_or_else(|| logical.to_string())
	}

	pub fn order(&self, logical: &str, order: Option<&str>) -> SortOrder {
		SortOrder { field: self.resolve(logical), direction: SortDirection::from_order(order) }
	}
}
impl Default for SortResolver {
	fn default() -> Self {
		Self::new(estate_config::default_sort_aliases())
	}
}
