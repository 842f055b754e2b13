use std::{collections::HashMap, time::Duration};

use sqlx::{PgConnection, Postgres, QueryBuilder};
use tokio::time;

use estate_domain::{
	Condition, FieldValue, ListingField, ListingMedia, ListingPage, ListingQuery, Predicate,
	SortDirection, SortOrder,
};

use crate::{
	Error, Result,
	db::Db,
	models::{AmenityRow, ListingRow, MediaRow},
};

const LISTING_COLUMNS: &str = "\
l.id, l.city, l.locality, l.sub_locality, l.looking_to, l.property_type, l.price_value, \
l.bedrooms, l.bathrooms, l.parking, l.availability_status, l.carpet_area_value, \
l.carpet_area_unit, l.description, l.created_at, l.updated_at";

/// Column backing a single-valued listing field.
pub fn column(field: ListingField) -> Option<&'static str> {
	let column = match field {
		ListingField::Id => "l.id",
		ListingField::City => "l.city",
		ListingField::Locality => "l.locality",
		ListingField::SubLocality => "l.sub_locality",
		ListingField::TransactionType => "l.looking_to",
		ListingField::PropertyType => "l.property_type",
		ListingField::Price => "l.price_value",
		ListingField::Bedrooms => "l.bedrooms",
		ListingField::Bathrooms => "l.bathrooms",
		ListingField::Parking => "l.parking",
		ListingField::Possession => "l.availability_status",
		ListingField::CarpetArea => "l.carpet_area_value",
		ListingField::CreatedAt => "l.created_at",
		ListingField::UpdatedAt => "l.updated_at",
		ListingField::Amenities => return None,
	};

	Some(column)
}

/// Maps a storage sort attribute to its column, rejecting names the listings table does not
/// order by.
pub fn order_column(order: &SortOrder) -> Result<&'static str> {
	let field =
		ListingField::parse(&order.field).ok_or_else(|| Error::UnknownField(order.field.clone()))?;

	if !field.is_sortable() {
		return Err(Error::UnsortableField(order.field.clone()));
	}

	column(field).ok_or_else(|| Error::UnsortableField(order.field.clone()))
}

/// Fetches one ordered page of matching listings plus the total match count, inside a single
/// read-only transaction bounded by `timeout`.
pub async fn find_page(db: &Db, query: &ListingQuery, timeout: Duration) -> Result<ListingPage> {
	let order_by = order_column(&query.order)?;

	match time::timeout(timeout, fetch_page(db, query, order_by)).await {
		Ok(result) => result,
		Err(_) => Err(Error::Timeout { timeout_ms: timeout.as_millis() as u64 }),
	}
}

async fn fetch_page(db: &Db, query: &ListingQuery, order_by: &str) -> Result<ListingPage> {
	let mut tx = db.pool.begin().await?;

	sqlx::query("SET TRANSACTION READ ONLY").execute(&mut *tx).await?;

	let total = count_matches(&mut tx, &query.predicate).await?;
	let rows = if total > query.window.offset {
		select_rows(&mut tx, query, order_by).await?
	} else {
		Vec::new()
	};
	let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
	let mut amenities = load_amenities(&mut tx, &ids).await?;
	let mut media = load_media(&mut tx, &ids).await?;

	tx.commit().await?;

	let listings = rows
		.into_iter()
		.map(|row| {
			let id = row.id;

			row.into_listing(
				amenities.remove(&id).unwrap_or_default(),
				media.remove(&id).unwrap_or_default(),
			)
		})
		.collect();

	Ok(ListingPage { listings, total })
}

async fn count_matches(conn: &mut PgConnection, predicate: &Predicate) -> Result<u64> {
	let mut builder = if predicate.requires_distinct() {
		QueryBuilder::new("SELECT COUNT(DISTINCT l.id) FROM listings l")
	} else {
		QueryBuilder::new("SELECT COUNT(*) FROM listings l")
	};

	push_predicate(&mut builder, predicate)?;

	let count: i64 = builder.build_query_scalar().fetch_one(conn).await?;

	Ok(count.max(0) as u64)
}

async fn select_rows(
	conn: &mut PgConnection,
	query: &ListingQuery,
	order_by: &str,
) -> Result<Vec<ListingRow>> {
	let select = if query.predicate.requires_distinct() { "SELECT DISTINCT " } else { "SELECT " };
	let mut builder = QueryBuilder::new(select);

	builder.push(LISTING_COLUMNS);
	builder.push(" FROM listings l");

	push_predicate(&mut builder, &query.predicate)?;

	builder.push(" ORDER BY ");
	builder.push(order_by);
	builder.push(match query.order.direction {
		SortDirection::Asc => " ASC",
		SortDirection::Desc => " DESC",
	});

	if order_by != "l.id" {
		builder.push(", l.id ASC");
	}

	builder.push(" LIMIT ");
	builder.push_bind(i64::from(query.window.limit));
	builder.push(" OFFSET ");
	builder.push_bind(i64::try_from(query.window.offset).unwrap_or(i64::MAX));

	let rows = builder.build_query_as::<ListingRow>().fetch_all(conn).await?;

	Ok(rows)
}

async fn load_amenities(
	conn: &mut PgConnection,
	ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
	let mut out: HashMap<i64, Vec<String>> = HashMap::new();

	if ids.is_empty() {
		return Ok(out);
	}

	let rows: Vec<AmenityRow> = sqlx::query_as(
		"\
SELECT listing_id, amenity
FROM listing_amenities
WHERE listing_id = ANY($1)",
	)
	.bind(ids)
	.fetch_all(conn)
	.await?;

	for row in rows {
		out.entry(row.listing_id).or_default().push(row.amenity);
	}

	Ok(out)
}

async fn load_media(
	conn: &mut PgConnection,
	ids: &[i64],
) -> Result<HashMap<i64, Vec<ListingMedia>>> {
	let mut out: HashMap<i64, Vec<ListingMedia>> = HashMap::new();

	if ids.is_empty() {
		return Ok(out);
	}

	let rows: Vec<MediaRow> = sqlx::query_as(
		"\
SELECT listing_id, type AS kind, file_url
FROM listing_media
WHERE listing_id = ANY($1)
ORDER BY listing_id, id",
	)
	.bind(ids)
	.fetch_all(conn)
	.await?;

	for row in rows {
		out.entry(row.listing_id).or_default().push(row.into());
	}

	Ok(out)
}

/// Appends ` WHERE ...` for `predicate`. Every value is bound, never interpolated.
pub fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) -> Result<()> {
	if predicate.is_match_all() {
		return Ok(());
	}

	builder.push(" WHERE ");

	for (idx, condition) in predicate.conditions().iter().enumerate() {
		if idx > 0 {
			builder.push(" AND ");
		}

		push_condition(builder, condition)?;
	}

	Ok(())
}

fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, condition: &Condition) -> Result<()> {
	match condition {
		Condition::Equals { field, value } => {
			builder.push(scalar_column(*field)?);
			builder.push(" = ");
			push_value(builder, value);
		},
		Condition::In { field, values } => {
			builder.push(scalar_column(*field)?);
			builder.push(" IN (");

			let mut separated = builder.separated(", ");

			for value in values {
				match value {
					FieldValue::Integer(value) => separated.push_bind(*value),
					FieldValue::Number(value) => separated.push_bind(*value),
					FieldValue::Text(value) => separated.push_bind(value.clone()),
					FieldValue::Timestamp(value) => separated.push_bind(*value),
				};
			}

			separated.push_unseparated(")");
		},
		Condition::Range { field, min, max } => {
			let column = scalar_column(*field)?;

			builder.push("(");

			match (min, max) {
				(Some(min), Some(max)) => {
					push_bound(builder, column, " >= ", *field, *min);
					builder.push(" AND ");
					push_bound(builder, column, " <= ", *field, *max);
				},
				(Some(min), None) => push_bound(builder, column, " >= ", *field, *min),
				(None, Some(max)) => push_bound(builder, column, " <= ", *field, *max),
				(None, None) => {
					builder.push("TRUE");
				},
			}

			builder.push(")");
		},
		Condition::ContainsAll { field, values } => {
			if *field != ListingField::Amenities {
				return Err(Error::UnknownField(field.as_str().to_string()));
			}

			let mut required = values.clone();

			required.sort();
			required.dedup();

			let required_count = required.len() as i64;

			builder.push(
				"l.id IN (SELECT listing_id FROM listing_amenities WHERE amenity = ANY(",
			);
			builder.push_bind(required);
			builder.push(") GROUP BY listing_id HAVING COUNT(DISTINCT amenity) = ");
			builder.push_bind(required_count);
			builder.push(")");
		},
	}

	Ok(())
}

fn scalar_column(field: ListingField) -> Result<&'static str> {
	column(field).ok_or_else(|| Error::UnknownField(field.as_str().to_string()))
}

fn push_bound(
	builder: &mut QueryBuilder<'_, Postgres>,
	column: &str,
	op: &str,
	field: ListingField,
	bound: i64,
) {
	builder.push(column);
	builder.push(op);

	// Carpet area is stored as a float column.
	if field == ListingField::CarpetArea {
		builder.push_bind(bound as f64);
	} else {
		builder.push_bind(bound);
	}
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
	match value {
		FieldValue::Integer(value) => builder.push_bind(*value),
		FieldValue::Number(value) => builder.push_bind(*value),
		FieldValue::Text(value) => builder.push_bind(value.clone()),
		FieldValue::Timestamp(value) => builder.push_bind(*value),
	};
}
