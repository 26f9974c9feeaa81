//! Transaction lifecycle and query engine.
//!
//! The engine owns every business rule of the transfer-record service:
//! sequential identifier assignment, the distinct-accounts rule, the
//! `refunded` terminal status, the completed-record deletion guard, and the
//! read side (filtered listing, pagination, search, statistics).
//!
//! Storage is a sea-orm [`DatabaseConnection`] handed in by the caller:
//! in-memory SQLite for tests, a file-backed database in production. The
//! engine keeps no state of its own; every operation is one logical unit
//! against the store.

pub use commands::CreateTransactionCmd;
pub use currency::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{
    BatchError, BatchOutcome, PageRequest, SortDirection, SortField, Statistics,
    TransactionListFilter, TransactionPage,
};
use sea_orm::DatabaseConnection;
pub use transactions::{Transaction, TransactionStatus};

mod commands;
mod currency;
mod error;
mod ids;
mod money;
mod ops;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    reject_duplicates: bool,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    reject_duplicates: bool,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Reject a creation whose (from, to, amount) triple is already recorded.
    ///
    /// Off by default; see DESIGN.md for the duplicate-detection decision.
    pub fn reject_duplicates(mut self, reject: bool) -> EngineBuilder {
        self.reject_duplicates = reject;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            reject_duplicates: self.reject_duplicates,
        }
    }
}
