//! SurrealDB implementation of [`CommunicationRepository`].
//!
//! Webhook status updates match records by the
//! (virtual address, channel) pair: no provider-assigned identifier
//! is stored, so concurrent outstanding calls to the same shared
//! number cannot be disambiguated.

use portico_core::error::PorticoResult;
use portico_core::models::communication::{
    Communication, CommunicationChannel, CreateCommunication,
};
use portico_core::repository::CommunicationRepository;
use serde::Deserialize;
use surrealdb::sql::Datetime;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct CommunicationRow {
    listing_id: Option<String>,
    user_id: Option<String>,
    agent_id: Option<String>,
    channel: String,
    status: String,
    virtual_address: Option<String>,
    contact_email: Option<String>,
    message: Option<String>,
    created_at: Datetime,
}

fn parse_channel(s: &str) -> Result<CommunicationChannel, DbError> {
    CommunicationChannel::parse(s)
        .ok_or_else(|| DbError::Decode(format!("unknown communication channel: {s}")))
}

fn parse_opt_uuid(value: Option<String>, field: &str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|s| {
            Uuid::parse_str(&s)
                .map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
        })
        .transpose()
}

impl CommunicationRow {
    fn into_communication(self, id: Uuid) -> Result<Communication, DbError> {
        Ok(Communication {
            id,
            listing_id: parse_opt_uuid(self.listing_id, "listing")?,
            user_id: parse_opt_uuid(self.user_id, "user")?,
            agent_id: parse_opt_uuid(self.agent_id, "agent")?,
            channel: parse_channel(&self.channel)?,
            status: self.status,
            virtual_address: self.virtual_address,
            contact_email: self.contact_email,
            message: self.message,
            created_at: self.created_at.0,
        })
    }
}

/// SurrealDB implementation of the Communication repository.
#[derive(Clone)]
pub struct SurrealCommunicationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCommunicationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CommunicationRepository for SurrealCommunicationRepository<C> {
    async fn create(&self, input: CreateCommunication) -> PorticoResult<Communication> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::thing('communication', $id) SET \
                 listing_id = $listing_id, \
                 user_id = $user_id, \
                 agent_id = $agent_id, \
                 channel = $channel, \
                 status = $status, \
                 virtual_address = $virtual_address, \
                 contact_email = $contact_email, \
                 message = $message",
            )
            .bind(("id", id_str.clone()))
            .bind(("listing_id", input.listing_id.map(|v| v.to_string())))
            .bind(("user_id", input.user_id.map(|v| v.to_string())))
            .bind(("agent_id", input.agent_id.map(|v| v.to_string())))
            .bind(("channel", input.channel.as_str()))
            .bind(("status", input.status))
            .bind(("virtual_address", input.virtual_address))
            .bind(("contact_email", input.contact_email))
            .bind(("message", input.message))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<CommunicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "communication".into(),
            id: id_str,
        })?;

        Ok(row.into_communication(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> PorticoResult<Communication> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('communication', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommunicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "communication".into(),
            id: id_str,
        })?;

        Ok(row.into_communication(id)?)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> PorticoResult<Communication> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::thing('communication', $id) \
                 SET status = $status \
                 RETURN AFTER",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommunicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "communication".into(),
            id: id_str,
        })?;

        Ok(row.into_communication(id)?)
    }

    async fn update_status_by_address(
        &self,
        virtual_address: &str,
        channel: CommunicationChannel,
        status: &str,
    ) -> PorticoResult<u64> {
        // `status != $status` keeps repeated provider callbacks from
        // touching already-settled rows.
        let mut result = self
            .db
            .query(
                "UPDATE communication SET status = $status \
                 WHERE virtual_address = $virtual_address \
                 AND channel = $channel \
                 AND status != $status \
                 RETURN AFTER",
            )
            .bind(("status", status.to_string()))
            .bind(("virtual_address", virtual_address.to_string()))
            .bind(("channel", channel.as_str()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommunicationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.len() as u64)
    }
}
