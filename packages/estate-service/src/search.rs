use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use estate_domain::{
	FilterDocument, Listing, ListingQuery, Paginator, PredicateBuilder, SortDirection,
};

use crate::{EstateService, Error, Result, fingerprint};

const NO_SEARCH_QUERY: &str = "N/A";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	#[serde(default)]
	pub transaction_type: Option<String>,
	#[serde(default)]
	pub search_query: Option<String>,
	#[serde(default)]
	pub filters: Option<FilterDocument>,
	#[serde(default)]
	pub sort: Option<SortSpec>,
	#[serde(default)]
	pub pagination: Option<PaginationSpec>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SortSpec {
	#[serde(default)]
	pub field: Option<String>,
	#[serde(default)]
	pub order: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaginationSpec {
	#[serde(default)]
	pub page: Option<i64>,
	#[serde(default)]
	pub limit: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub success: bool,
	pub data: SearchData,
	pub metadata: SearchMetadata,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchData {
	pub properties: Vec<PropertySummary>,
	pub summary: SearchSummary,
	pub pagination: PaginationInfo,
	pub filters: FiltersEcho,
}

/// One listing as shown in a result list.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
	pub id: i64,
	pub city: Option<String>,
	pub locality: Option<String>,
	pub sub_locality: Option<String>,
	pub transaction_type: Option<String>,
	pub property_type: Option<String>,
	pub price: Option<i64>,
	pub bedrooms: Option<i32>,
	pub bathrooms: Option<i32>,
	pub parking: Option<i32>,
	pub possession: Option<String>,
	pub area: Option<i64>,
	pub area_unit: Option<String>,
	pub description: Option<String>,
	pub amenities: Vec<String>,
	pub photos: Vec<String>,
}
impl From<Listing> for PropertySummary {
	fn from(listing: Listing) -> Self {
		let photos = listing.photo_urls();

		Self {
			id: listing.id,
			city: listing.city,
			locality: listing.locality,
			sub_locality: listing.sub_locality,
			transaction_type: listing.transaction_type,
			property_type: listing.property_type,
			price: listing.price,
			bedrooms: listing.bedrooms,
			bathrooms: listing.bathrooms,
			parking: listing.parking,
			possession: listing.possession,
			area: listing.carpet_area.map(|area| area as i64),
			area_unit: listing.carpet_area_unit,
			description: listing.description,
			amenities: listing.amenities,
			photos,
		}
	}
}

/// `filtered_count` is always set. The remaining fields are reserved and serialize as null.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
	pub filtered_count: u64,
	pub total_count: Option<u64>,
	pub average_price: Option<f64>,
	pub price_range: Option<PriceRange>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PriceRange {
	pub min: i64,
	pub max: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
	pub current_page: u32,
	pub limit: u32,
	pub total_items: u64,
	pub total_pages: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct FiltersEcho {
	pub applied: FilterDocument,
	pub available: Map<String, Value>,
	pub quick_filters: QuickFilters,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct QuickFilters {
	pub popular_localities: Vec<String>,
	pub price_trends: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
	pub response_time: String,
	pub search_id: Uuid,
	pub cache_hit: bool,
	pub request_info: RequestInfo,
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestInfo {
	pub search_query: String,
}
impl RequestInfo {
	pub fn echo(search_query: Option<&str>) -> Self {
		let search_query = search_query
			.map(str::trim)
			.filter(|query| !query.is_empty())
			.unwrap_or(NO_SEARCH_QUERY);

		Self { search_query: search_query.to_string() }
	}
}

#[derive(Clone, Debug)]
pub enum SearchOutcome {
	/// The client validator names the current fingerprint. No query ran.
	NotModified { etag: String },
	Full { etag: String, response: Box<SearchResponse> },
}
impl SearchOutcome {
	pub fn etag(&self) -> &str {
		match self {
			Self::NotModified { etag } | Self::Full { etag, .. } => etag,
		}
	}
}

/// A request that passed validation, in the canonical form that is fingerprinted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NormalizedSearch {
	#[serde(skip_serializing_if = "Option::is_none")]
	transaction_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	search_query: Option<String>,
	filters: FilterDocument,
	sort: NormalizedSort,
	pagination: NormalizedPagination,
}

#[derive(Debug, Serialize)]
struct NormalizedSort {
	field: String,
	order: &'static str,
}

#[derive(Debug, Serialize)]
struct NormalizedPagination {
	page: u32,
	limit: u32,
}

impl EstateService {
	/// Runs one search. `validator` is the client's `If-None-Match` value, if any.
	pub async fn search(
		&self,
		req: SearchRequest,
		validator: Option<&str>,
	) -> Result<SearchOutcome> {
		let started = Instant::now();
		let search = normalize_request(req, self.cfg.search.max_page_limit)?;
		let etag = fingerprint::fingerprint(&search);

		if let Some(validator) = validator
			&& fingerprint::matches(&etag, validator)
		{
			tracing::info!(etag = %etag, "Search validator matched; skipping listing query.");

			return Ok(SearchOutcome::NotModified { etag });
		}

		let predicate = PredicateBuilder::build(&search.filters);
		let order = self.sorter.order(&search.sort.field, Some(search.sort.order));
		let window = Paginator::window(search.pagination.page, search.pagination.limit);
		let query = ListingQuery { predicate, order, window };
		let page = self.store.find_page(&query).await.map_err(|err| {
			tracing::warn!(
				error = %err,
				sort_field = %query.order.field,
				"Listing query failed."
			);

			err
		})?;
		let total = page.total;
		let properties: Vec<PropertySummary> =
			page.listings.into_iter().map(PropertySummary::from).collect();

		tracing::debug!(
			total,
			returned = properties.len(),
			page = search.pagination.page,
			"Search completed."
		);

		let response = SearchResponse {
			success: true,
			data: SearchData {
				properties,
				summary: SearchSummary {
					filtered_count: total,
					total_count: None,
					average_price: None,
					price_range: None,
				},
				pagination: PaginationInfo {
					current_page: search.pagination.page,
					limit: search.pagination.limit,
					total_items: total,
					total_pages: Paginator::total_pages(total, search.pagination.limit),
				},
				filters: FiltersEcho {
					applied: search.filters,
					available: Map::new(),
					quick_filters: QuickFilters::default(),
				},
			},
			metadata: SearchMetadata {
				response_time: format!("{}ms", started.elapsed().as_millis()),
				search_id: Uuid::new_v4(),
				cache_hit: false,
				request_info: RequestInfo::echo(search.search_query.as_deref()),
			},
		};

		Ok(SearchOutcome::Full { etag, response: Box::new(response) })
	}
}

fn normalize_request(req: SearchRequest, max_page_limit: u32) -> Result<NormalizedSearch> {
	let filters = req.filters.ok_or_else(|| Error::validation("filters", "filters cannot be null"))?;
	let sort = req.sort.ok_or_else(|| Error::validation("sort", "sort cannot be null"))?;
	let pagination = req
		.pagination
		.ok_or_else(|| Error::validation("pagination", "pagination cannot be null"))?;
	let field = sort
		.field
		.as_deref()
		.map(str::trim)
		.filter(|field| !field.is_empty())
		.ok_or_else(|| Error::validation("sort.field", "sort field cannot be blank"))?;
	let page = positive(pagination.page, "pagination.page")?;
	let limit = positive(pagination.limit, "pagination.limit")?;

	if limit > max_page_limit {
		return Err(Error::validation(
			"pagination.limit",
			format!("limit must be at most {max_page_limit}"),
		));
	}
	if let Some(min) = filters.price.as_ref().and_then(|price| price.min)
		&& min < 0
	{
		return Err(Error::validation("filters.price.min", "price min must be non-negative"));
	}
	if let Some(min) = filters
		.property
		.as_ref()
		.and_then(|property| property.area.as_ref())
		.and_then(|area| area.min)
		&& min < 0
	{
		return Err(Error::validation(
			"filters.property.area.min",
			"area min must be non-negative",
		));
	}

	Ok(NormalizedSearch {
		transaction_type: non_blank(req.transaction_type),
		search_query: non_blank(req.search_query),
		filters: filters.normalized(),
		sort: NormalizedSort {
			field: field.to_string(),
			order: SortDirection::from_order(sort.order.as_deref()).as_str(),
		},
		pagination: NormalizedPagination { page, limit },
	})
}

fn positive(value: Option<i64>, field: &str) -> Result<u32> {
	let Some(value) = value else {
		return Err(Error::validation(field, "value is required"));
	};

	if value < 1 {
		return Err(Error::validation(field, "value must be at least 1"));
	}

	u32::try_from(value).map_err(|_| Error::validation(field, "value is too large"))
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
