use std::{cmp::Ordering, collections::BTreeMap};

use time::OffsetDateTime;

use estate_domain::{
	Condition, FieldValue, FilterDocument, Listing, ListingField, ListingMedia, Paginator,
	PredicateBuilder, SortDirection, SortOrder, SortResolver,
};

fn listing(id: i64) -> Listing {
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
		description: None,
		amenities: vec!["gym".to_string()],
		media: Vec::new(),
		created_at: OffsetDateTime::UNIX_EPOCH,
		updated_at: OffsetDateTime::UNIX_EPOCH,
	}
}

fn filters(raw: serde_json::Value) -> FilterDocument {
	serde_json::from_value(raw).expect("Failed to parse filter document.")
}

#[test]
fn absent_groups_match_all() {
	let predicate = PredicateBuilder::build(&filters(serde_json::json!({})));

	assert!(predicate.is_match_all());
	assert!(!predicate.requires_distinct());
	assert!(predicate.matches(&listing(1)));
}

#[test]
fn groups_with_null_children_match_all() {
	let predicate = PredicateBuilder::build(&filters(serde_json::json!({
		"location": { "city": null, "locality": null },
		"price": {},
		"property": { "area": { "unit": "sqft" } },
		"amenities": null
	})));

	assert!(predicate.is_match_all());
}

#[test]
fn empty_lists_behave_as_absent() {
	let predicate = PredicateBuilder::build(&filters(serde_json::json!({
		"location": { "city": "", "locality": [], "subLocality": [] },
		"property": { "type": [], "bedrooms": [], "bathrooms": [], "parking": [], "possession": [] },
		"amenities": []
	})));
	let mut bare = listing(1);

	bare.city = None;
	bare.bedrooms = None;
	bare.amenities.clear();

	assert!(predicate.is_match_all());
	assert!(predicate.matches(&bare));
}

#[test]
fn conditions_follow_field_order() {
	let predicate = PredicateBuilder::build(&filters(serde_json::json!({
		"amenities": ["gym"],
		"property": { "area": { "min": 500 }, "bedrooms": [2, 3] },
		"price": { "max": 9000000 },
		"location": { "city": "Pune", "locality": ["Baner"] }
	})));
	let fields: Vec<ListingField> =
		predicate.conditions().iter().map(Condition::field).collect();

	assert_eq!(
		fields,
		vec![
			ListingField::City,
			ListingField::Locality,
			ListingField::Price,
			ListingField::Bedrooms,
			ListingField::CarpetArea,
			ListingField::Amenities,
		]
	);
	assert_eq!(
		predicate.conditions()[0],
		Condition::Equals { field: ListingField::City, value: FieldValue::Text("Pune".to_string()) }
	);
}

#[test]
fn amenities_require_every_tag() {
	let predicate =
		PredicateBuilder::build(&filters(serde_json::json!({ "amenities": ["gym", "pool"] })));
	let mut both = listing(1);
	let gym_only = listing(2);
	let mut pool_only = listing(3);

	both.amenities = vec!["pool".to_string(), "gym".to_string(), "lift".to_string()];
	pool_only.amenities = vec!["pool".to_string()];

	assert!(predicate.requires_distinct());
	assert!(predicate.matches(&both));
	assert!(!predicate.matches(&gym_only));
	assert!(!predicate.matches(&pool_only));
}

#[test]
fn price_bounds_are_inclusive() {
	let predicate = PredicateBuilder::build(&filters(serde_json::json!({
		"price": { "min": 5000000, "max": 10000000 }
	})));
	let priced = |price| {
		let mut item = listing(1);

		item.price = Some(price);

		item
	};

	assert!(predicate.matches(&priced(5_000_000)));
	assert!(predicate.matches(&priced(10_000_000)));
	assert!(!predicate.matches(&priced(4_999_999)));
	assert!(!predicate.matches(&priced(10_000_001)));
}

#[test]
fn single_bound_is_one_sided() {
	let predicate =
		PredicateBuilder::build(&filters(serde_json::json!({ "property": { "area": { "min": 900 } } })));
	let mut large = listing(1);
	let mut small = listing(2);
	let mut unknown = listing(3);

	large.carpet_area = Some(50_000.0);
	small.carpet_area = Some(899.5);
	unknown.carpet_area = None;

	assert_eq!(
		predicate.conditions(),
		&[Condition::Range { field: ListingField::CarpetArea, min: Some(900), max: None }]
	);
	assert!(predicate.matches(&large));
	assert!(!predicate.matches(&small));
	assert!(!predicate.matches(&unknown));
}

#[test]
fn set_membership_over_integers_and_strings() {
	let predicate = PredicateBuilder::build(&filters(serde_json::json!({
		"property": { "bedrooms": [3, 4], "possession": ["ready", "under-construction"] }
	})));
	let mut three = listing(1);
	let two = listing(2);

	three.bedrooms = Some(3);

	assert!(predicate.matches(&three));
	assert!(!predicate.matches(&two));
}

#[test]
fn city_is_exact_match() {
	let predicate =
		PredicateBuilder::build(&filters(serde_json::json!({ "location": { "city": "pune" } })));

	assert!(!predicate.matches(&listing(1)));
}

#[test]
fn padded_city_is_bound_as_sent() {
	let predicate =
		PredicateBuilder::build(&filters(serde_json::json!({ "location": { "city": "Pune " } })));

	assert_eq!(
		predicate.conditions(),
		&[Condition::Equals {
			field: ListingField::City,
			value: FieldValue::Text("Pune ".to_string()),
		}]
	);
	assert!(!predicate.matches(&listing(1)));
}

#[test]
fn sort_aliases_translate_price_and_area() {
	let resolver = SortResolver::default();
	let price = resolver.order("price", Some("asc"));
	let area = resolver.order("area", Some("desc"));

	assert_eq!(price.field, "priceValue");
	assert_eq!(price.direction, SortDirection::Asc);
	assert_eq!(area.field, "carpetAreaValue");
	assert_eq!(area.direction, SortDirection::Desc);
	assert_eq!(resolver.resolve("bedrooms"), "bedrooms");
	assert_eq!(resolver.resolve("unknownField"), "unknownField");
}

#[test]
fn sort_resolver_uses_injected_table() {
	let resolver =
		SortResolver::new(BTreeMap::from([("newest".to_string(), "createdAt".to_string())]));

	assert_eq!(resolver.resolve("newest"), "createdAt");
	assert_eq!(resolver.resolve("price"), "price");
}

#[test]
fn non_asc_orders_are_descending() {
	assert_eq!(SortDirection::from_order(Some("ASC")), SortDirection::Asc);
	assert_eq!(SortDirection::from_order(Some("Asc")), SortDirection::Asc);
	assert_eq!(SortDirection::from_order(Some("desc")), SortDirection::Desc);
	assert_eq!(SortDirection::from_order(Some("ascending")), SortDirection::Desc);
	assert_eq!(SortDirection::from_order(Some(" asc")), SortDirection::Desc);
	assert_eq!(SortDirection::from_order(None), SortDirection::Desc);
}

#[test]
fn listing_order_puts_nulls_last_when_ascending() {
	let mut cheap = listing(2);
	let mut unpriced = listing(1);

	cheap.price = Some(100);
	unpriced.price = None;

	assert_eq!(
		SortOrder::compare(ListingField::Price, SortDirection::Asc, &cheap, &unpriced),
		Ordering::Less
	);
	assert_eq!(
		SortOrder::compare(ListingField::Price, SortDirection::Desc, &cheap, &unpriced),
		Ordering::Greater
	);
	assert_eq!(
		SortOrder::compare(ListingField::Price, SortDirection::Desc, &listing(1), &listing(2)),
		Ordering::Less
	);
}

#[test]
fn second_page_of_twenty_five() {
	let window = Paginator::window(2, 10);

	assert_eq!(window.offset, 10);
	assert_eq!(window.limit, 10);
	assert_eq!(Paginator::total_pages(25, 10), 3);
}

#[test]
fn storage_names_round_trip() {
	for field in ListingField::ALL {
		assert_eq!(ListingField::parse(field.as_str()), Some(field));
	}

	assert_eq!(ListingField::parse("price"), None);
	assert!(!ListingField::Amenities.is_sortable());
}

#[test]
fn photo_urls_keep_only_photos_with_urls() {
	let mut item = listing(1);

	item.media = vec![
		ListingMedia { kind: Some("photo".to_string()), url: Some("https://cdn/a.jpg".to_string()) },
		ListingMedia { kind: Some("video".to_string()), url: Some("https://cdn/b.mp4".to_string()) },
		ListingMedia { kind: Some("PHOTO".to_string()), url: Some("https://cdn/c.jpg".to_string()) },
		ListingMedia { kind: Some("photo".to_string()), url: None },
		ListingMedia { kind: Some("photo".to_string()), url: Some(" ".to_string()) },
	];

	assert_eq!(item.photo_urls(), vec!["https://cdn/a.jpg".to_string(), "https://cdn/c.jpg".to_string()]);
}
