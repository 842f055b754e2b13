use serde::{Deserialize, Serialize};

/// Client search criteria. Every group and every field is optional; absent, blank and empty
/// values place no constraint on the result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDocument {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<LocationFilter>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price: Option<PriceFilter>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub property: Option<PropertyFilter>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub amenities: Option<Vec<String>>,
}
impl FilterDocument {
	/// Copy with blank strings, empty lists and empty groups removed.
	pub fn normalized(&self) -> Self {
		Self {
			location: self.location.as_ref().map(LocationFilter::normalized).filter(non_empty),
			price: self.price.clone().filter(|price| !price.is_empty()),
			property: self.property.as_ref().map(PropertyFilter::normalized).filter(non_empty),
			amenities: normalize_strings(self.amenities.as_deref()),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFilter {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub locality: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sub_locality: Option<Vec<String>>,
}
impl LocationFilter {
	fn normalized(&self) -> Self {
		Self {
			city: normalize_string(self.city.as_deref()),
			locality: normalize_strings(self.locality.as_deref()),
			sub_locality: normalize_strings(self.sub_locality.as_deref()),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceFilter {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<i64>,
}
impl PriceFilter {
	fn is_empty(&self) -> bool {
		self.min.is_none() && self.max.is_none()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub property_type: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bedrooms: Option<Vec<i32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bathrooms: Option<Vec<i32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parking: Option<Vec<i32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub possession: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub area: Option<AreaFilter>,
}
impl PropertyFilter {
	fn normalized(&self) -> Self {
		Self {
			property_type: normalize_strings(self.property_type.as_deref()),
			bedrooms: self.bedrooms.clone().filter(|values| !values.is_empty()),
			bathrooms: self.bathrooms.clone().filter(|values| !values.is_empty()),
			parking: self.parking.clone().filter(|values| !values.is_empty()),
			possession: normalize_strings(self.possession.as_deref()),
			area: self.area.as_ref().map(AreaFilter::normalized).filter(non_empty),
		}
	}
}

/// Inclusive carpet-area bounds. `unit` is carried for display and does not filter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaFilter {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unit: Option<String>,
}
impl AreaFilter {
	fn normalized(&self) -> Self {
		Self { min: self.min, max: self.max, unit: normalize_string(self.unit.as_deref()) }
	}
}

fn non_empty<T>(value: &T) -> bool
where
	T: Default + PartialEq,
{
	*value != T::default()
}

/// Blank values are dropped; kept values are bound exactly as sent.
fn normalize_string(value: Option<&str>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty()).map(str::to_string)
}

fn normalize_strings(values: Option<&[String]>) -> Option<Vec<String>> {
	let values: Vec<String> =
		values?.iter().filter_map(|value| normalize_string(Some(value))).collect();

	if values.is_empty() { None } else { Some(values) }
}

#[cfg(test)]
mod tests {
	use crate::filter::{AreaFilter, FilterDocument, LocationFilter, PropertyFilter};

	#[test]
	fn normalized_drops_blank_and_empty_values() {
		let filters = FilterDocument {
			location: Some(LocationFilter {
				city: Some("  ".to_string()),
				locality: Some(vec![]),
				sub_locality: Some(vec![" ".to_string()]),
			}),
			property: Some(PropertyFilter {
				bedrooms: Some(vec![]),
				area: Some(AreaFilter { min: None, max: None, unit: Some("".to_string()) }),
				..Default::default()
			}),
			amenities: Some(vec![]),
			..Default::default()
		};

		assert_eq!(filters.normalized(), FilterDocument::default());
	}

	#[test]
	fn normalized_keeps_non_blank_strings_as_sent() {
		let filters = FilterDocument {
			location: Some(LocationFilter {
				city: Some(" Pune ".to_string()),
				locality: Some(vec!["Baner ".to_string(), "".to_string()]),
				sub_locality: None,
			}),
			..Default::default()
		};
		let location = filters.normalized().location.expect("Expected location group.");

		assert_eq!(location.city.as_deref(), Some(" Pune "));
		assert_eq!(location.locality, Some(vec!["Baner ".to_string()]));
	}

	#[test]
	fn area_unit_alone_keeps_the_group() {
		let filters = FilterDocument {
			property: Some(PropertyFilter {
				area: Some(AreaFilter { min: None, max: None, unit: Some("sqft".to_string()) }),
				..Default::default()
			}),
			..Default::default()
		};

		assert_ne!(filters.normalized(), FilterDocument::default());
	}
}
