//! # Order Ledger
//!
//! Data model and queryable store for retail order records.
//!
//! This crate owns the order-side types consumed by the demand
//! forecasting engine: the immutable [`OrderRecord`], the inclusive
//! [`DateWindow`] used to scope queries, and the [`OrderStore`] trait
//! with an in-memory implementation for tests and demos.
//!
//! Monetary totals are [`rust_decimal::Decimal`] so order amounts never
//! pass through binary floating point on their way to or from storage.

pub mod synthetic;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A query window with start after end
    #[error("Invalid date window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

/// Result type with the ledger error
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Fulfillment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// A single order as read from the order store. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Store-assigned order id
    pub id: u64,
    /// Instant the order was placed
    pub created_at: DateTime<Utc>,
    /// Monetary total of the order
    pub total_amount: Decimal,
    /// Number of items in the order
    pub item_count: u32,
    /// Current fulfillment status
    pub status: OrderStatus,
}

impl OrderRecord {
    /// Create a record with the default `Pending` status
    pub fn new(id: u64, created_at: DateTime<Utc>, total_amount: Decimal, item_count: u32) -> Self {
        Self {
            id,
            created_at,
            total_amount,
            item_count,
            status: OrderStatus::Pending,
        }
    }
}

/// Inclusive calendar-date query window. A `None` bound means unbounded
/// on that side; both `None` selects all history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Window covering all history
    pub fn all() -> Self {
        Self::default()
    }

    /// Window bounded on both sides (inclusive)
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(LedgerError::InvalidWindow { start, end });
        }
        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    /// Whether a UTC calendar date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

/// Read-only access to stored order records
pub trait OrderStore {
    /// Return every record whose UTC calendar date falls inside the
    /// window, in no particular order.
    fn orders_in(&self, window: &DateWindow) -> Result<Vec<OrderRecord>>;
}

/// In-memory order store backed by a plain vector
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderStore {
    records: Vec<OrderRecord>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    /// Append a record to the store
    pub fn push(&mut self, record: OrderRecord) {
        self.records.push(record);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn orders_in(&self, window: &DateWindow) -> Result<Vec<OrderRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| window.contains(r.created_at.date_naive()))
            .cloned()
            .collect())
    }
}
