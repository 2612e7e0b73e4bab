//! Event → Pattern Mapping
//!
//! Static table of the views each event type makes stale, extended with
//! patterns derived from the event's scopes.

use crate::invalidation::events::{DomainEvent, EventScope, EventType};
use crate::invalidation::pattern::{escape_literal, MATCH_ALL};

const INVENTORY_WRITE: &[&str] = &["inventory-list.*", "dashboard-metrics.*"];
const INVENTORY_SHAPE: &[&str] = &[
    "inventory-list.*",
    "inventory-stats.*",
    "category-list.*",
    "dashboard-metrics.*",
];
const SUPPLIER_WRITE: &[&str] = &["supplier-list.*", "dashboard-metrics.*"];
const SUPPLIER_DELETE: &[&str] = &[
    "supplier-list.*",
    "inventory-list.*",
    "dashboard-metrics.*",
];
const CATEGORY_WRITE: &[&str] = &["category-list.*", "inventory-list.*"];
const FINANCIAL_WRITE: &[&str] = &[
    "financial-summary.*",
    "financial-reports.*",
    "dashboard-metrics.*",
];
const RENTAL_WRITE: &[&str] = &["rental-list.*", "inventory-list.*", "dashboard-metrics.*"];
const MAINTENANCE_WRITE: &[&str] = &["maintenance-list.*", "inventory-list.*"];
const CLEAR_ALL: &[&str] = &[MATCH_ALL];

// == Base Patterns ==
/// Wildcard patterns an event type invalidates regardless of payload.
///
/// Unknown event types map to no patterns.
pub fn base_patterns(event_type: &EventType) -> &'static [&'static str] {
    match event_type {
        EventType::InventoryCreated | EventType::InventoryDeleted => INVENTORY_SHAPE,
        EventType::InventoryUpdated => INVENTORY_WRITE,
        EventType::InventoryBulkUpdated => INVENTORY_SHAPE,
        EventType::SupplierCreated | EventType::SupplierUpdated => SUPPLIER_WRITE,
        EventType::SupplierDeleted => SUPPLIER_DELETE,
        EventType::CategoryUpdated => CATEGORY_WRITE,
        EventType::TransactionCreated | EventType::TransactionUpdated => FINANCIAL_WRITE,
        EventType::RentalCreated | EventType::RentalUpdated | EventType::RentalReturned => {
            RENTAL_WRITE
        }
        EventType::MaintenanceScheduled | EventType::MaintenanceCompleted => MAINTENANCE_WRITE,
        EventType::ClearAll => CLEAR_ALL,
        EventType::Other(_) => &[],
    }
}

// == Specific Patterns ==
/// Base patterns unioned with the patterns derived from the event's scopes.
///
/// Order is kept and duplicates are dropped. Identifiers are escaped before
/// interpolation so they only ever match literally.
pub fn get_specific_patterns(event: &DomainEvent) -> Vec<String> {
    let domain = event.event_type.domain();
    let mut patterns: Vec<String> = Vec::new();
    let mut push = |pattern: String| {
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    };

    for base in base_patterns(&event.event_type) {
        push((*base).to_string());
    }

    for scope in &event.scopes {
        match scope {
            EventScope::Entity(id) => push(item_pattern(domain, id)),
            EventScope::Entities(ids) => {
                for id in ids {
                    push(item_pattern(domain, id));
                }
            }
            EventScope::Supplier(id) => {
                let id = escape_literal(id);
                push(format!("supplier-inventory-{id}"));
                push(format!("supplier-metrics-{id}"));
            }
            EventScope::Category(category) => {
                push(format!("{domain}-category-{}", escape_literal(category)));
            }
        }
    }

    patterns
}

fn item_pattern(domain: &str, id: &str) -> String {
    format!("{domain}-item-{}", escape_literal(id))
}
