use crate::models::lenient::{self, flag_map};
use crate::models::{
    Budget, Criteria, Customer, CustomerStatus, LocationCriteria, Property, PropertyLocation,
    PropertyStatus, PropertyType,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when reading listings and customers
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

const PORTFOLIO_COLUMNS: &str = r#"
    id::text AS id, title, status, type, price::float8 AS price,
    il, ilce, mahalle, rooms, square_meters::float8 AS square_meters, features
"#;

/// Read-only access to the listing database
///
/// Rows are turned into plain `Property` and `Customer` records. Columns
/// holding unexpected values decode as absent so one bad row never fails a
/// whole listing.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
        )
        .await
    }

    /// Fetch one portfolio with its image URLs
    pub async fn get_portfolio(&self, id: Uuid) -> Result<Property, StoreError> {
        let query = format!("SELECT {} FROM portfolios WHERE id = $1", PORTFOLIO_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Portfolio {}", id)))?;

        let mut property = property_from_row(&row);
        property.image_urls = self
            .image_urls(&[id])
            .await?
            .remove(&id.to_string())
            .unwrap_or_default();

        Ok(property)
    }

    /// Fetch every portfolio, newest first
    pub async fn list_portfolios(&self) -> Result<Vec<Property>, StoreError> {
        let query = format!(
            "SELECT {} FROM portfolios ORDER BY created_at DESC",
            PORTFOLIO_COLUMNS
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let mut properties: Vec<Property> = rows.iter().map(property_from_row).collect();

        let ids: Vec<Uuid> = properties
            .iter()
            .filter_map(|p| p.id.as_deref().and_then(|id| Uuid::parse_str(id).ok()))
            .collect();
        let mut urls = self.image_urls(&ids).await?;
        for property in &mut properties {
            if let Some(id) = &property.id {
                property.image_urls = urls.remove(id).unwrap_or_default();
            }
        }

        tracing::debug!("Loaded {} portfolios", properties.len());

        Ok(properties)
    }

    /// Fetch every customer, newest first
    pub async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let query = r#"
            SELECT id::text AS id, name, status, criteria
            FROM customers
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let customers: Vec<Customer> = rows.iter().map(customer_from_row).collect();

        tracing::debug!("Loaded {} customers", customers.len());

        Ok(customers)
    }

    /// Image URLs per portfolio id, in upload order
    async fn image_urls(&self, ids: &[Uuid]) -> Result<HashMap<String, Vec<String>>, StoreError> {
        let query = r#"
            SELECT portfolio_id::text AS portfolio_id, url
            FROM property_images
            WHERE portfolio_id = ANY($1)
            ORDER BY created_at ASC
        "#;

        let rows = sqlx::query(query).bind(ids).fetch_all(&self.pool).await?;

        let mut urls: HashMap<String, Vec<String>> = HashMap::new();
        for row in &rows {
            let (Some(portfolio_id), Some(url)) = (
                row.try_get::<Option<String>, _>("portfolio_id").ok().flatten(),
                row.try_get::<Option<String>, _>("url").ok().flatten(),
            ) else {
                continue;
            };
            urls.entry(portfolio_id).or_default().push(url);
        }

        Ok(urls)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn text(row: &PgRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .filter(|s| !s.is_empty())
}

fn number(row: &PgRow, column: &str) -> Option<f64> {
    row.try_get::<Option<f64>, _>(column).ok().flatten()
}

fn json(row: &PgRow, column: &str) -> Option<Value> {
    row.try_get::<Option<Json<Value>>, _>(column)
        .ok()
        .flatten()
        .map(|Json(value)| value)
}

/// Listing status as written by the intake forms
///
/// Sold listings (`satildi`) have no matching intent and decode as absent.
pub fn stored_property_status(value: &str) -> Option<PropertyStatus> {
    match value {
        "satilik" | "for_sale" => Some(PropertyStatus::ForSale),
        "kiralik" | "for_rent" => Some(PropertyStatus::ForRent),
        _ => None,
    }
}

pub fn stored_property_type(value: &str) -> Option<PropertyType> {
    match value {
        "daire" | "apartment" => Some(PropertyType::Apartment),
        "mustakil" | "house" => Some(PropertyType::House),
        "isyeri" | "business" => Some(PropertyType::Business),
        "arsa" | "land" => Some(PropertyType::Land),
        _ => None,
    }
}

pub fn stored_customer_status(value: &str) -> Option<CustomerStatus> {
    match value {
        "aktif" | "active" => Some(CustomerStatus::Active),
        "pasif" | "passive" => Some(CustomerStatus::Passive),
        "buldu" | "found" => Some(CustomerStatus::Found),
        _ => None,
    }
}

/// The `customers.criteria` column as the customer form writes it
#[derive(Debug, Default, Deserialize)]
struct StoredCriteria {
    #[serde(default, deserialize_with = "lenient::text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    types: Vec<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    location: Option<StoredLocation>,
    #[serde(default, deserialize_with = "lenient::optional")]
    budget: Option<Budget>,
    #[serde(default, deserialize_with = "lenient::optional")]
    details: Option<StoredDetails>,
    /// Older records keep the room minimum at the top level
    #[serde(rename = "minRooms", alias = "min_rooms", default, deserialize_with = "lenient::text")]
    min_rooms: Option<String>,
    #[serde(default, deserialize_with = "lenient::flags")]
    features: BTreeMap<String, bool>,
}

#[derive(Debug, Default, Deserialize)]
struct StoredLocation {
    #[serde(alias = "province", default, deserialize_with = "lenient::text")]
    il: Option<String>,
    #[serde(alias = "district", default, deserialize_with = "lenient::text")]
    ilce: Option<String>,
    #[serde(alias = "neighborhoods", default, deserialize_with = "lenient::list")]
    mahalleler: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StoredDetails {
    #[serde(rename = "minRooms", alias = "min_rooms", default, deserialize_with = "lenient::text")]
    min_rooms: Option<String>,
}

impl From<StoredCriteria> for Criteria {
    fn from(stored: StoredCriteria) -> Self {
        Self {
            status: stored.status.as_deref().and_then(stored_property_status),
            types: stored
                .types
                .iter()
                .filter_map(|t| stored_property_type(t))
                .collect(),
            location: stored.location.map(|location| LocationCriteria {
                province: location.il,
                district: location.ilce,
                neighborhoods: location.mahalleler,
            }),
            budget: stored.budget,
            min_rooms: stored
                .details
                .and_then(|details| details.min_rooms)
                .or(stored.min_rooms),
            features: stored.features,
        }
    }
}

/// Build a `Property` from a `portfolios` row
///
/// Location is stored flat (`il`, `ilce`, `mahalle`); it is nested here as
/// province, district and neighborhood.
pub fn property_from_row(row: &PgRow) -> Property {
    let features = json(row, "features").map(flag_map).unwrap_or_default();

    Property {
        id: text(row, "id"),
        title: text(row, "title"),
        status: text(row, "status").as_deref().and_then(stored_property_status),
        property_type: text(row, "type").as_deref().and_then(stored_property_type),
        location: Some(PropertyLocation {
            province: text(row, "il"),
            district: text(row, "ilce"),
            neighborhood: text(row, "mahalle"),
        }),
        price: number(row, "price"),
        rooms: text(row, "rooms"),
        area_sqm: number(row, "square_meters"),
        features,
        image_urls: Vec::new(),
    }
}

/// Build a `Customer` from a `customers` row
pub fn customer_from_row(row: &PgRow) -> Customer {
    customer_from_parts(
        text(row, "id"),
        text(row, "name"),
        text(row, "status"),
        json(row, "criteria"),
    )
}

/// Assemble a customer from stored column values
///
/// The criteria column is the intake form's JSON, decoded leniently. Anything
/// other than a JSON object counts as no criteria.
pub fn customer_from_parts(
    id: Option<String>,
    name: Option<String>,
    status: Option<String>,
    criteria: Option<Value>,
) -> Customer {
    Customer {
        id,
        name,
        status: status.as_deref().and_then(stored_customer_status),
        criteria: criteria
            .filter(Value::is_object)
            .and_then(|value| serde_json::from_value::<StoredCriteria>(value).ok())
            .map(Criteria::from),
    }
}
