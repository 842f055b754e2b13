use time::{Duration, OffsetDateTime};

use estate_domain::{Listing, ListingMedia};

/// A two-bedroom Pune apartment with one photo. Tests override the fields they care about.
pub fn listing(id: i64) -> Listing {
	let created_at = OffsetDateTime::UNIX_EPOCH + Duration::days(id);

	Listing {
		id,
		city: Some("Pune".to_string()),
		locality: Some("Baner".to_string()),
		sub_locality: None,
		transaction_type: Some("sell".to_string()),
		property_type: Some("apartment".to_string()),
		price: Some(7_500_000),
		bedrooms: Some(2),
		bathrooms: Some(2),
		parking: Some(1),
		possession: Some("ready".to_string()),
		carpet_area: Some(950.0),
		carpet_area_unit: Some("sqft".to_string()),
		description: Some(format!("Listing {id}")),
		amenities: vec!["gym".to_string()],
		media: vec![ListingMedia {
			kind: Some("photo".to_string()),
			url: Some(format!("https://cdn.example.com/listings/{id}/cover.jpg")),
		}],
		created_at,
		updated_at: created_at,
	}
}

/// Small mixed catalog covering every filter group.
pub fn catalog() -> Vec<Listing> {
	let mut items = Vec::new();

	let mut baner = listing(1);

	baner.price = Some(5_000_000);
	baner.amenities = vec!["gym".to_string(), "pool".to_string()];

	items.push(baner);

	let mut aundh = listing(2);

	aundh.locality = Some("Aundh".to_string());
	aundh.price = Some(10_000_000);
	aundh.bedrooms = Some(3);
	aundh.carpet_area = Some(1_400.5);
	aundh.amenities = vec!["pool".to_string(), "gym".to_string(), "lift".to_string()];
	aundh.media.push(ListingMedia {
		kind: Some("video".to_string()),
		url: Some("https://cdn.example.com/listings/2/tour.mp4".to_string()),
	});

	items.push(aundh);

	let mut cheap = listing(3);

	cheap.price = Some(4_999_999);
	cheap.bedrooms = Some(1);
	cheap.carpet_area = Some(520.0);
	cheap.amenities = vec!["pool".to_string()];

	items.push(cheap);

	let mut premium = listing(4);

	premium.locality = Some("Koregaon Park".to_string());
	premium.price = Some(10_000_001);
	premium.bedrooms = Some(4);
	premium.property_type = Some("villa".to_string());
	premium.possession = Some("under-construction".to_string());
	premium.carpet_area = Some(3_200.0);

	items.push(premium);

	let mut mumbai = listing(5);

	mumbai.city = Some("Mumbai".to_string());
	mumbai.locality = Some("Andheri".to_string());
	mumbai.price = None;
	mumbai.carpet_area = None;
	mumbai.amenities.clear();
	mumbai.media.clear();

	items.push(mumbai);

	items
}
