use crate::{FieldValue, FilterDocument, Listing, ListingField};

/// One atomic constraint over a listing.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
	Equals { field: ListingField, value: FieldValue },
	In { field: ListingField, values: Vec<FieldValue> },
	/// Inclusive on both ends; a missing bound leaves that side open.
	Range { field: ListingField, min: Option<i64>, max: Option<i64> },
	/// The multi-valued field holds every one of `values`.
	ContainsAll { field: ListingField, values: Vec<String> },
}
impl Condition {
	pub fn matches(&self, listing: &Listing) -> bool {
		match self {
			Self::Equals { field, value } =>
				listing.value(*field).map(|actual| actual.matches(value)).unwrap_or(false),
			Self::In { field, values } => listing
				.value(*field)
				.map(|actual| values.iter().any(|value| actual.matches(value)))
				.unwrap_or(false),
			Self::Range { field, min, max } => {
				let Some(actual) = listing.value(*field) else {
					return false;
				};
				let above_min = min
					.map(|min| actual.compare(&FieldValue::Integer(min)).is_some_and(|ord| ord.is_ge()))
					.unwrap_or(true);
				let below_max = max
					.map(|max| actual.compare(&FieldValue::Integer(max)).is_some_and(|ord| ord.is_le()))
					.unwrap_or(true);

				above_min && below_max
			},
			Self::ContainsAll { field, values } => {
				let tags = listing.tags(*field);

				values.iter().all(|value| tags.contains(value))
			},
		}
	}
}

/// Conjunction of conditions. No conditions means every listing matches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
	conditions: Vec<Condition>,
	distinct: bool,
}
impl Predicate {
	pub fn conditions(&self) -> &[Condition] {
		&self.conditions
	}

	/// Set when a containment condition could fan a listing out into several joined rows.
	pub fn requires_distinct(&self) -> bool {
		self.distinct
	}

	pub fn is_match_all(&self) -> bool {
		self.conditions.is_empty()
	}

	pub fn matches(&self, listing: &Listing) -> bool {
		self.conditions.iter().all(|condition| condition.matches(listing))
	}
}

/// Accumulates conditions from a [`FilterDocument`] in a fixed field order.
#[derive(Debug, Default)]
pub struct PredicateBuilder {
	conditions: Vec<Condition>,
}
impl PredicateBuilder {
	pub fn build(filters: &FilterDocument) -> Predicate {
		let filters = filters.normalized();
		let mut builder = Self::default();

		if let Some(location) = filters.location {
			builder.equals(ListingField::City, location.city.map(FieldValue::Text));
			builder.one_of(ListingField::Locality, texts(location.locality));
			builder.one_of(ListingField::SubLocality, texts(location.sub_locality));
		}
		if let Some(price) = filters.price {
			builder.range(ListingField::Price, price.min, price.max);
		}
		if let Some(property) = filters.property {
			builder.one_of(ListingField::PropertyType, texts(property.property_type));
			builder.one_of(ListingField::Bedrooms, integers(property.bedrooms));
			builder.one_of(ListingField::Bathrooms, integers(property.bathrooms));
			builder.one_of(ListingField::Parking, integers(property.parking));
			builder.one_of(ListingField::Possession, texts(property.possession));

			if let Some(area) = property.area {
				builder.range(ListingField::CarpetArea, area.min, area.max);
			}
		}

		builder.contains_all(ListingField::Amenities, filters.amenities);

		builder.finish()
	}

	fn equals(&mut self, field: ListingField, value: Option<FieldValue>) {
		if let Some(value) = value {
			self.conditions.push(Condition::Equals { field, value });
		}
	}

	fn one_of(&mut self, field: ListingField, values: Option<Vec<FieldValue>>) {
		if let Some(values) = values.filter(|values| !values.is_empty()) {
			self.conditions.push(Condition::In { field, values });
		}
	}

	fn range(&mut self, field: ListingField, min: Option<i64>, max: Option<i64>) {
		if min.is_some() || max.is_some() {
			self.conditions.push(Condition::Range { field, min, max });
		}
	}

	fn contains_all(&mut self, field: ListingField, values: Option<Vec<String>>) {
		if let Some(values) = values.filter(|values| !values.is_empty()) {
			self.conditions.push(Condition::ContainsAll { field, values });
		}
	}

	fn finish(self) -> Predicate {
		let distinct =
			self.conditions.iter().any(|condition| matches!(condition, Condition::ContainsAll { .. }));

		Predicate { conditions: self.conditions, distinct }
	}
}

fn texts(values: Option<Vec<String>>) -> Option<Vec<FieldValue>> {
	values.map(|values| values.into_iter().map(FieldValue::Text).collect())
}

fn integers(values: Option<Vec<i32>>) -> Option<Vec<FieldValue>> {
	values.map(|values| values.into_iter().map(|value| FieldValue::Integer(value.into())).collect())
}
