//! Storage-agnostic listing search engine: filter documents, predicates, ordering and paging.

pub mod filter;
pub mod listing;
pub mod pagination;
pub mod predicate;
pub mod sort;

pub use filter::{AreaFilter, FilterDocument, LocationFilter, PriceFilter, PropertyFilter};
pub use listing::{FieldValue, Listing, ListingField, ListingMedia, ListingPage, ListingQuery};
pub use pagination::{PageWindow, Paginator};
pub use predicate::{Condition, Predicate, PredicateBuilder};
pub use sort::{SortDirection, SortOrder, SortResolver};
