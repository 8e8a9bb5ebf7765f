//! SurrealDB implementation of [`ListingRepository`].

use portico_core::error::PorticoResult;
use portico_core::models::listing::{CreateListing, Listing, ListingFilter};
use portico_core::repository::ListingRepository;
use serde::Deserialize;
use surrealdb::sql::Datetime;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct ListingRow {
    title: String,
    price: f64,
    location: String,
    description: String,
    agent_id: String,
    created_at: Datetime,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct ListingRowWithId {
    record_id: String,
    title: String,
    price: f64,
    location: String,
    description: String,
    agent_id: String,
    created_at: Datetime,
}

impl ListingRow {
    fn into_listing(self, id: Uuid) -> Result<Listing, DbError> {
        let agent_id = Uuid::parse_str(&self.agent_id)
            .map_err(|e| DbError::Decode(format!("invalid agent UUID: {e}")))?;
        Ok(Listing {
            id,
            title: self.title,
            price: self.price,
            location: self.location,
            description: self.description,
            agent_id,
            created_at: self.created_at.0,
        })
    }
}

impl ListingRowWithId {
    fn try_into_listing(self) -> Result<Listing, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let agent_id = Uuid::parse_str(&self.agent_id)
            .map_err(|e| DbError::Decode(format!("invalid agent UUID: {e}")))?;
        Ok(Listing {
            id,
            title: self.title,
            price: self.price,
            location: self.location,
            description: self.description,
            agent_id,
            created_at: self.created_at.0,
        })
    }
}

/// SurrealDB implementation of the Listing repository.
#[derive(Clone)]
pub struct SurrealListingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealListingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ListingRepository for SurrealListingRepository<C> {
    async fn create(&self, input: CreateListing) -> PorticoResult<Listing> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::thing('listing', $id) SET \
                 title = $title, \
                 price = $price, \
                 location = $location, \
                 description = $description, \
                 agent_id = $agent_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("price", input.price))
            .bind(("location", input.location))
            .bind(("description", input.description))
            .bind(("agent_id", input.agent_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> PorticoResult<Listing> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('listing', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ListingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "listing".into(),
            id: id_str,
        })?;

        Ok(row.into_listing(id)?)
    }

    async fn list(&self, filter: ListingFilter) -> PorticoResult<Vec<Listing>> {
        // Filters compose with AND; absent filters impose no
        // restriction.
        let mut sql = String::from("SELECT meta::id(id) AS record_id, * FROM listing");
        let mut clauses: Vec<&str> = Vec::new();
        if filter.price_max.is_some() {
            clauses.push("price <= $price_max");
        }
        if filter.location.is_some() {
            clauses.push(
                "string::contains(string::lowercase(location), \
                 string::lowercase($location))",
            );
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.db.query(sql);
        if let Some(price_max) = filter.price_max {
            query = query.bind(("price_max", price_max));
        }
        if let Some(location) = filter.location {
            query = query.bind(("location", location));
        }

        let mut result = query.await.map_err(DbError::from)?;
        let rows: Vec<ListingRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in rows {
            listings.push(row.try_into_listing()?);
        }
        Ok(listings)
    }
}
