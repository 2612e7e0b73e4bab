//! Domain Events
//!
//! Typed notifications of completed writes, carrying the scope needed to work
//! out which cached views went stale.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

// == Event Type ==
/// Known domain event names, plus a catch-all for names the mapping does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    InventoryCreated,
    InventoryUpdated,
    InventoryDeleted,
    InventoryBulkUpdated,
    SupplierCreated,
    SupplierUpdated,
    SupplierDeleted,
    CategoryUpdated,
    TransactionCreated,
    TransactionUpdated,
    RentalCreated,
    RentalUpdated,
    RentalReturned,
    MaintenanceScheduled,
    MaintenanceCompleted,
    /// Reserved: drop every entry of every store
    ClearAll,
    /// Any other name; maps to no base patterns
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::InventoryCreated => "inventory.created",
            EventType::InventoryUpdated => "inventory.updated",
            EventType::InventoryDeleted => "inventory.deleted",
            EventType::InventoryBulkUpdated => "inventory.bulk_updated",
            EventType::SupplierCreated => "supplier.created",
            EventType::SupplierUpdated => "supplier.updated",
            EventType::SupplierDeleted => "supplier.deleted",
            EventType::CategoryUpdated => "category.updated",
            EventType::TransactionCreated => "financial.transaction_created",
            EventType::TransactionUpdated => "financial.transaction_updated",
            EventType::RentalCreated => "rental.created",
            EventType::RentalUpdated => "rental.updated",
            EventType::RentalReturned => "rental.returned",
            EventType::MaintenanceScheduled => "maintenance.scheduled",
            EventType::MaintenanceCompleted => "maintenance.completed",
            EventType::ClearAll => "cache.clear_all",
            EventType::Other(name) => name,
        }
    }

    /// The entity family the event is about: everything before the first `.`.
    pub fn domain(&self) -> &str {
        let name = self.as_str();
        name.split_once('.').map_or(name, |(domain, _)| domain)
    }
}

impl FromStr for EventType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let event = match s {
            "inventory.created" => EventType::InventoryCreated,
            "inventory.updated" => EventType::InventoryUpdated,
            "inventory.deleted" => EventType::InventoryDeleted,
            "inventory.bulk_updated" => EventType::InventoryBulkUpdated,
            "supplier.created" => EventType::SupplierCreated,
            "supplier.updated" => EventType::SupplierUpdated,
            "supplier.deleted" => EventType::SupplierDeleted,
            "category.updated" => EventType::CategoryUpdated,
            "financial.transaction_created" => EventType::TransactionCreated,
            "financial.transaction_updated" => EventType::TransactionUpdated,
            "rental.created" => EventType::RentalCreated,
            "rental.updated" => EventType::RentalUpdated,
            "rental.returned" => EventType::RentalReturned,
            "maintenance.scheduled" => EventType::MaintenanceScheduled,
            "maintenance.completed" => EventType::MaintenanceCompleted,
            "cache.clear_all" => EventType::ClearAll,
            other => EventType::Other(other.to_string()),
        };
        Ok(event)
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name.parse() {
            Ok(event) => event,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Event Payload ==
/// Loosely-typed payload as emitted by mutation handlers. All fields are
/// optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EventPayload {
    pub fn entity(id: impl Into<String>) -> Self {
        Self {
            entity_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn entities<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity_ids: Some(ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn supplier(id: impl Into<String>) -> Self {
        Self {
            supplier_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            ..Self::default()
        }
    }

    /// Converts every present field into a scope, checking each one on its own.
    ///
    /// A blank identifier, an empty `entityIds` list or a blank element of it
    /// is dropped and reported; the remaining fields still yield their scopes.
    pub fn into_scopes(self) -> (Vec<EventScope>, Vec<CacheError>) {
        let mut scopes = Vec::new();
        let mut rejected = Vec::new();

        if let Some(id) = self.entity_id {
            match non_empty("entityId", id) {
                Ok(id) => scopes.push(EventScope::Entity(id)),
                Err(e) => rejected.push(e),
            }
        }
        if let Some(ids) = self.entity_ids {
            if ids.is_empty() {
                rejected.push(CacheError::InvalidEvent(
                    "entityIds must not be empty".to_string(),
                ));
            } else {
                let mut kept = Vec::with_capacity(ids.len());
                for id in ids {
                    match non_empty("entityIds", id) {
                        Ok(id) => kept.push(id),
                        Err(e) => rejected.push(e),
                    }
                }
                if !kept.is_empty() {
                    scopes.push(EventScope::Entities(kept));
                }
            }
        }
        if let Some(id) = self.supplier_id {
            match non_empty("supplierId", id) {
                Ok(id) => scopes.push(EventScope::Supplier(id)),
                Err(e) => rejected.push(e),
            }
        }
        if let Some(category) = self.category {
            match non_empty("category", category) {
                Ok(category) => scopes.push(EventScope::Category(category)),
                Err(e) => rejected.push(e),
            }
        }

        (scopes, rejected)
    }
}

fn non_empty(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(CacheError::InvalidEvent(format!("{field} must not be blank")))
    } else {
        Ok(value)
    }
}

// == Event Scope ==
/// What part of a domain an event touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventScope {
    /// One entity
    Entity(String),
    /// Several entities changed by one bulk write
    Entities(Vec<String>),
    /// Everything belonging to one supplier
    Supplier(String),
    /// Everything in one category
    Category(String),
}

// == Domain Event ==
/// A validated domain event, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvent {
    pub event_type: EventType,
    pub scopes: Vec<EventScope>,
}

impl DomainEvent {
    /// Builds an event, rejecting blank identifiers and empty id lists.
    pub fn new(event_type: impl Into<EventType>, payload: EventPayload) -> Result<Self> {
        let (scopes, mut rejected) = payload.into_scopes();
        if !rejected.is_empty() {
            return Err(rejected.swap_remove(0));
        }
        Ok(Self {
            event_type: event_type.into(),
            scopes,
        })
    }

    /// Builds an event from whatever fields of `payload` are usable.
    ///
    /// Each rejected field is logged and skipped; the valid ones keep their
    /// scopes.
    pub fn lenient(event_type: impl Into<EventType>, payload: EventPayload) -> Self {
        let event_type = event_type.into();
        let (scopes, rejected) = payload.into_scopes();
        for e in &rejected {
            warn!(event_type = %event_type, error = %e, "Payload field skipped");
        }
        Self { event_type, scopes }
    }

    /// An event with no payload-derived scope.
    pub fn bare(event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            scopes: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: EventScope) -> Self {
        self.scopes.push(scope);
        self
    }
}
