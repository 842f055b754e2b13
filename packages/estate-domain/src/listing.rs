use std::cmp::Ordering;

use time::OffsetDateTime;

use crate::{PageWindow, Predicate, SortOrder};

/// Listing attributes addressable by predicates and ordering, named as the listing store names
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListingField {
	Id,
	City,
	Locality,
	SubLocality,
	TransactionType,
	PropertyType,
	Price,
	Bedrooms,
	Bathrooms,
	Parking,
	Possession,
	CarpetArea,
	Amenities,
	CreatedAt,
	UpdatedAt,
}
impl ListingField {
	pub const ALL: [Self; 15] = [
		Self::Id,
		Self::City,
		Self::Locality,
		Self::SubLocality,
		Self::TransactionType,
		Self::PropertyType,
		Self::Price,
		Self::Bedrooms,
		Self::Bathrooms,
		Self::Parking,
		Self::Possession,
		Self::CarpetArea,
		Self::Amenities,
		Self::CreatedAt,
		Self::UpdatedAt,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::City => "city",
			Self::Locality => "locality",
			Self::SubLocality => "subLocality",
			Self::TransactionType => "lookingTo",
			Self::PropertyType => "propertyType",
			Self::Price => "priceValue",
			Self::Bedrooms => "bedrooms",
			Self::Bathrooms => "bathrooms",
			Self::Parking => "parking",
			Self::Possession => "availabilityStatus",
			Self::CarpetArea => "carpetAreaValue",
			Self::Amenities => "amenities",
			Self::CreatedAt => "createdAt",
			Self::UpdatedAt => "updatedAt",
		}
	}

	/// Exact, case-sensitive lookup of a storage attribute name.
	pub fn parse(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|field| field.as_str() == name)
	}

	/// Multi-valued attributes have no single value to order by.
	pub fn is_sortable(self) -> bool {
		!matches!(self, Self::Amenities)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
	Integer(i64),
	Number(f64),
	Text(String),
	Timestamp(OffsetDateTime),
}
impl FieldValue {
	fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Integer(value) => Some(*value as f64),
			Self::Number(value) => Some(*value),
			Self::Text(_) | Self::Timestamp(_) => None,
		}
	}

	/// Orders values of compatible kinds. Integers and numbers compare numerically.
	pub fn compare(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
			(Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
			(Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
			_ => self.as_f64()?.partial_cmp(&other.as_f64()?),
		}
	}

	pub fn matches(&self, other: &Self) -> bool {
		self.compare(other) == Some(Ordering::Equal)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListingMedia {
	pub kind: Option<String>,
	pub url: Option<String>,
}
impl ListingMedia {
	/// Photos are media of kind `photo` (any case) that carry a usable URL.
	pub fn photo_url(&self) -> Option<&str> {
		let is_photo =
			self.kind.as_deref().map(|kind| kind.eq_ignore_ascii_case("photo")).unwrap_or(false);

		self.url.as_deref().filter(|url| is_photo && !url.trim().is_empty())
	}
}

/// Read model of a property listing as the search engine consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
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
	pub carpet_area: Option<f64>,
	pub carpet_area_unit: Option<String>,
	pub description: Option<String>,
	pub amenities: Vec<String>,
	pub media: Vec<ListingMedia>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl Listing {
	/// Single value of `field`, or `None` when it is null or multi-valued.
	pub fn value(&self, field: ListingField) -> Option<FieldValue> {
		let text = |value: &Option<String>| value.clone().map(FieldValue::Text);
		let int = |value: Option<i32>| value.map(|value| FieldValue::Integer(i64::from(value)));

		match field {
			ListingField::Id => Some(FieldValue::Integer(self.id)),
			ListingField::City => text(&self.city),
			ListingField::Locality => text(&self.locality),
			ListingField::SubLocality => text(&self.sub_locality),
			ListingField::TransactionType => text(&self.transaction_type),
			ListingField::PropertyType => text(&self.property_type),
			ListingField::Price => self.price.map(FieldValue::Integer),
			ListingField::Bedrooms => int(self.bedrooms),
			ListingField::Bathrooms => int(self.bathrooms),
			ListingField::Parking => int(self.parking),
			ListingField::Possession => text(&self.possession),
			ListingField::CarpetArea => self.carpet_area.map(FieldValue::Number),
			ListingField::Amenities => None,
			ListingField::CreatedAt => Some(FieldValue::Timestamp(self.created_at)),
			ListingField::UpdatedAt => Some(FieldValue::Timestamp(self.updated_at)),
		}
	}

	/// Values of a multi-valued field.
	pub fn tags(&self, field: ListingField) -> &[String] {
		match field {
			ListingField::Amenities => &self.amenities,
			_ => &[],
		}
	}

	pub fn photo_urls(&self) -> Vec<String> {
		self.media.iter().filter_map(ListingMedia::photo_url).map(str::to_string).collect()
	}
}

/// One page request against a listing store.
#[derive(Clone, Debug)]
pub struct ListingQuery {
	pub predicate: Predicate,
	pub order: SortOrder,
	pub window: PageWindow,
}

#[derive(Clone, Debug, Default)]
pub struct ListingPage {
	pub listings: Vec<Listing>,
	/// Matches across all pages.
	pub total: u64,
}
