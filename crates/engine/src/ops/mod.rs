//! Engine operations, grouped by concern.
//!
//! - `transactions`: lifecycle writes (create, batch create, status update,
//!   delete) and single-record reads.
//! - `queries`: filtered/sorted/paginated listing, free-text search,
//!   threshold queries.
//! - `statistics`: aggregate numbers over the whole record set.

mod queries;
mod statistics;
mod transactions;

pub use queries::{
    PageRequest, SortDirection, SortField, TransactionListFilter, TransactionPage,
};
pub use statistics::Statistics;
pub use transactions::{BatchError, BatchOutcome};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;
