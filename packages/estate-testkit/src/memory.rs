use std::sync::{
	Mutex,
	atomic::{AtomicUsize, Ordering},
};

use estate_domain::{Listing, ListingField, ListingPage, ListingQuery, SortOrder};
use estate_service::{BoxFuture, Error, ListingStore, Result};

/// Listing store that evaluates predicates in process. Counts queries so tests can assert that
/// a short-circuited search never reached the store.
#[derive(Debug, Default)]
pub struct MemoryListingStore {
	listings: Vec<Listing>,
	queries: AtomicUsize,
	last_query: Mutex<Option<ListingQuery>>,
}
impl MemoryListingStore {
	pub fn new(listings: Vec<Listing>) -> Self {
		Self { listings, queries: AtomicUsize::new(0), last_query: Mutex::new(None) }
	}

	pub fn query_count(&self) -> usize {
		self.queries.load(Ordering::SeqCst)
	}

	pub fn last_query(&self) -> Option<ListingQuery> {
		self.last_query.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn page(&self, query: &ListingQuery) -> Result<ListingPage> {
		let field = ListingField::parse(&query.order.field).ok_or_else(|| Error::Query {
			field: query.order.field.clone(),
			message: format!("Unknown listing field: {}", query.order.field),
		})?;

		if !field.is_sortable() {
			return Err(Error::Query {
				field: query.order.field.clone(),
				message: format!("Listing field cannot be sorted: {}", query.order.field),
			});
		}

		let mut matched: Vec<&Listing> =
			self.listings.iter().filter(|listing| query.predicate.matches(listing)).collect();

		matched.sort_by(|a, b| SortOrder::compare(field, query.order.direction, a, b));

		let total = matched.len() as u64;
		let offset = usize::try_from(query.window.offset).unwrap_or(usize::MAX);
		let listings = matched
			.into_iter()
			.skip(offset)
			.take(query.window.limit as usize)
			.cloned()
			.collect();

		Ok(ListingPage { listings, total })
	}
}
impl ListingStore for MemoryListingStore {
	fn find_page<'a>(&'a self, query: &'a ListingQuery) -> BoxFuture<'a, Result<ListingPage>> {
		self.queries.fetch_add(1, Ordering::SeqCst);

		*self.last_query.lock().unwrap_or_else(|err| err.into_inner()) = Some(query.clone());

		Box::pin(async move { self.page(query) })
	}
}
