pub mod fingerprint;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{
	FiltersEcho, PaginationInfo, PaginationSpec, PriceRange, PropertySummary, QuickFilters,
	RequestInfo, SearchData, SearchMetadata, SearchOutcome, SearchRequest, SearchResponse,
	SearchSummary, SortSpec,
};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use estate_config::Config;
use estate_domain::{ListingPage, ListingQuery, SortResolver};
use estate_storage::{db::Db, listings};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the listing catalog: one ordered page plus the total match count.
pub trait ListingStore
where
	Self: Send + Sync,
{
	fn find_page<'a>(&'a self, query: &'a ListingQuery) -> BoxFuture<'a, Result<ListingPage>>;
}

#[derive(Clone)]
pub struct PgListingStore {
	db: Db,
	timeout: Duration,
}
impl PgListingStore {
	pub fn new(db: Db, timeout: Duration) -> Self {
		Self { db, timeout }
	}
}
impl ListingStore for PgListingStore {
	fn find_page<'a>(&'a self, query: &'a ListingQuery) -> BoxFuture<'a, Result<ListingPage>> {
		Box::pin(async move { Ok(listings::find_page(&self.db, query, self.timeout).await?) })
	}
}

pub struct EstateService {
	pub cfg: Config,
	pub store: Arc<dyn ListingStore>,
	pub sorter: SortResolver,
}
impl EstateService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let timeout = Duration::from_millis(cfg.storage.postgres.query_timeout_ms);

		Self::with_store(cfg, Arc::new(PgListingStore::new(db, timeout)))
	}

	pub fn with_store(cfg: Config, store: Arc<dyn ListingStore>) -> Self {
		let sorter = SortResolver::from_config(&cfg.search);

		Self { cfg, store, sorter }
	}
}
