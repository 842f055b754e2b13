mod error;
mod fixtures;
mod memory;

pub use error::{Error, Result};
pub use fixtures::{catalog, listing};
pub use memory::MemoryListingStore;

use std::{env, future::Future, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor, PgPool,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use estate_domain::Listing;

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

/// Throwaway Postgres database created next to the one named by `ESTATE_PG_DSN`.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options: PgConnectOptions = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse ESTATE_PG_DSN: {err}.")))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("estate_test_{}", Uuid::new_v4().simple());
		let create_sql = format!(r#"CREATE DATABASE "{}""#, name);

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		let dsn = base_options.clone().database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, cleaned: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Drops the database now. On failure the `Drop` fallback retries once more.
	pub async fn cleanup(mut self) -> Result<()> {
		cleanup_database(&self.name, &self.admin_options).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test database cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(cleanup_database(&name, &admin_options)) {
				eprintln!("Test database cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var("ESTATE_PG_DSN").ok()
}

/// Runs `body` against a fresh database, handed over by DSN, and drops the database afterwards
/// even when `body` fails. A cleanup failure only surfaces when `body` succeeded.
pub async fn with_test_db<F, Fut, T>(base_dsn: &str, body: F) -> Result<T>
where
	F: FnOnce(String) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let test_db = TestDatabase::new(base_dsn).await?;
	let result = body(test_db.dsn().to_string()).await;

	match test_db.cleanup().await {
		Ok(()) => result,
		Err(err) if result.is_ok() => Err(err),
		Err(err) => {
			eprintln!("Test database cleanup warning: {err}.");

			result
		},
	}
}

/// Writes `listing` with its amenities and media, keeping the fixture id.
pub async fn insert_listing(pool: &PgPool, listing: &Listing) -> Result<()> {
	let mut tx = pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO listings (
	id,
	city,
	locality,
	sub_locality,
	looking_to,
	property_type,
	price_value,
	bedrooms,
	bathrooms,
	parking,
	availability_status,
	carpet_area_value,
	carpet_area_unit,
	description,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
	)
	.bind(listing.id)
	.bind(listing.city.as_deref())
	.bind(listing.locality.as_deref())
	.bind(listing.sub_locality.as_deref())
	.bind(listing.transaction_type.as_deref())
	.bind(listing.property_type.as_deref())
	.bind(listing.price)
	.bind(listing.bedrooms)
	.bind(listing.bathrooms)
	.bind(listing.parking)
	.bind(listing.possession.as_deref())
	.bind(listing.carpet_area)
	.bind(listing.carpet_area_unit.as_deref())
	.bind(listing.description.as_deref())
	.bind(listing.created_at)
	.bind(listing.updated_at)
	.execute(&mut *tx)
	.await?;

	for amenity in &listing.amenities {
		sqlx::query("INSERT INTO listing_amenities (listing_id, amenity) VALUES ($1, $2)")
			.bind(listing.id)
			.bind(amenity)
			.execute(&mut *tx)
			.await?;
	}
	for media in &listing.media {
		sqlx::query("INSERT INTO listing_media (listing_id, type, file_url) VALUES ($1, $2, $3)")
			.bind(listing.id)
			.bind(media.kind.as_deref())
			.bind(media.url.as_deref())
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(())
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => {
				last_err = Some(err);
			},
		}
	}

	Err(Error::Message(format!("Failed to connect to an admin database: {last_err:?}.")))
}

async fn cleanup_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await.map_err(|err| {
		Error::Message(format!("Failed to connect to admin database for cleanup: {err}."))
	})?;
	let drop_sql = format!(r#"DROP DATABASE IF EXISTS "{}""#, name);
	let _ = sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await;

	sqlx::query(drop_sql.as_str())
		.execute(&mut conn)
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}
