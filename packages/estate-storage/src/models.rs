use time::OffsetDateTime;

use estate_domain::{Listing, ListingMedia};

#[derive(Debug, sqlx::FromRow)]
pub struct ListingRow {
	pub id: i64,
	pub city: Option<String>,
	pub locality: Option<String>,
	pub sub_locality: Option<String>,
	pub looking_to: Option<String>,
	pub property_type: Option<String>,
	pub price_value: Option<i64>,
	pub bedrooms: Option<i32>,
	pub bathrooms: Option<i32>,
	pub parking: Option<i32>,
	pub availability_status: Option<String>,
	pub carpet_area_value: Option<f64>,
	pub carpet_area_unit: Option<String>,
	pub description: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl ListingRow {
	pub fn into_listing(self, amenities: Vec<String>, media: Vec<ListingMedia>) -> Listing {
		Listing {
			id: self.id,
			city: self.city,
			locality: self.locality,
			sub_locality: self.sub_locality,
			transaction_type: self.looking_to,
			property_type: self.property_type,
			price: self.price_value,
			bedrooms: self.bedrooms,
			bathrooms: self.bathrooms,
			parking: self.parking,
			possession: self.availability_status,
			carpet_area: self.carpet_area_value,
			carpet_area_unit: self.carpet_area_unit,
			description: self.description,
			amenities,
			media,
			created_at: self.created_at,
			updated_at: self.updated_at,
		}
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct AmenityRow {
	pub listing_id: i64,
	pub amenity: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MediaRow {
	pub listing_id: i64,
	pub kind: Option<String>,
	pub file_url: Option<String>,
}
impl From<MediaRow> for ListingMedia {
	fn from(row: MediaRow) -> Self {
		Self { kind: row.kind, url: row.file_url }
	}
}
