//! Aggregate statistics over the whole record set.

use std::collections::HashMap;

use sea_orm::{ConnectionTrait, Statement};

use crate::{Currency, Engine, Money, ResultEngine, TransactionStatus};

/// Aggregate numbers over all transaction records.
///
/// Sums are exact (integer cents); the average is rounded half-up to a cent.
/// An empty record set yields zeros and an empty breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statistics {
    pub total_transactions: u64,
    pub total_amount: Money,
    pub average_amount: Money,
    pub currency: Currency,
    pub status_breakdown: HashMap<TransactionStatus, u64>,
}

impl Engine {
    /// Computes count, total, average and the per-status breakdown.
    pub async fn statistics(&self) -> ResultEngine<Statistics> {
        let backend = self.database.get_database_backend();

        let (count, total_minor): (i64, i64) = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COUNT(*) AS cnt, COALESCE(SUM(amount_minor), 0) AS total \
                 FROM transactions",
                [],
            );
            match self.database.query_one(stmt).await? {
                Some(row) => (row.try_get("", "cnt")?, row.try_get("", "total")?),
                None => (0, 0),
            }
        };

        let mut status_breakdown = HashMap::new();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT status, COUNT(*) AS cnt FROM transactions GROUP BY status",
            [],
        );
        for row in self.database.query_all(stmt).await? {
            let status: String = row.try_get("", "status")?;
            let cnt: i64 = row.try_get("", "cnt")?;
            let status = TransactionStatus::try_from(status.as_str())?;
            status_breakdown.insert(status, cnt as u64);
        }

        let total_amount = Money::new(total_minor);
        Ok(Statistics {
            total_transactions: count as u64,
            total_amount,
            average_amount: total_amount.div_round_half_up(count),
            currency: Currency::default(),
            status_breakdown,
        })
    }
}
