//! Property listing domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub location: String,
    pub description: String,
    /// The verified agent who owns this listing.
    pub agent_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListing {
    pub title: String,
    pub price: f64,
    pub location: String,
    pub description: String,
    pub agent_id: Uuid,
}

/// Optional listing filters. Absent fields impose no restriction;
/// present fields compose with logical AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Upper price bound (inclusive).
    pub price_max: Option<f64>,
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.price_max.is_none() && self.location.is_none()
    }
}
