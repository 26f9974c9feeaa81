//! Read-side operations: listing, search, threshold queries.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{Condition, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{Engine, EngineError, Money, ResultEngine, Transaction, TransactionStatus, transactions};

/// Filters for listing transactions.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    /// Matches records where the account is either the sender or the receiver.
    pub account: Option<String>,
    pub status: Option<TransactionStatus>,
}

/// Sortable fields for `list`.
///
/// Unrecognized sort field names fall back to the timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    Amount,
    FromAccount,
    #[default]
    Timestamp,
}

impl SortField {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "amount" => Self::Amount,
            "fromAccount" | "from_account" => Self::FromAccount,
            _ => Self::Timestamp,
        }
    }

    fn column(self) -> transactions::Column {
        match self {
            Self::Amount => transactions::Column::AmountMinor,
            Self::FromAccount => transactions::Column::FromAccount,
            Self::Timestamp => transactions::Column::OccurredAt,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "desc" | "DESC" => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

/// Page request for `list`.
///
/// `size` is clamped to `[1, 100]`; an out-of-range `page` yields an empty
/// slice rather than an error.
#[derive(Clone, Debug)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

/// One page of transactions plus paging metadata.
#[derive(Clone, Debug)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl Engine {
    /// Lists transactions with optional account/status filters, sorted and
    /// paginated.
    pub async fn list(
        &self,
        filter: &TransactionListFilter,
        page: &PageRequest,
    ) -> ResultEngine<TransactionPage> {
        let mut query = transactions::Entity::find();

        if let Some(account) = &filter.account {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::FromAccount.eq(account.as_str()))
                    .add(transactions::Column::ToAccount.eq(account.as_str())),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }

        // Stable ordering: id breaks ties within equal sort keys.
        query = match page.direction {
            SortDirection::Ascending => query
                .order_by_asc(page.sort.column())
                .order_by_asc(transactions::Column::Id),
            SortDirection::Descending => query
                .order_by_desc(page.sort.column())
                .order_by_desc(transactions::Column::Id),
        };

        let size = page.size.clamp(1, 100);
        let paginator = query.paginate(&self.database, size);
        let totals = paginator.num_items_and_pages().await?;

        let models = paginator.fetch_page(page.page).await?;
        let items = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(TransactionPage {
            items,
            page: page.page,
            size,
            total_elements: totals.number_of_items,
            total_pages: totals.number_of_pages,
            first: page.page == 0,
            last: page.page + 1 >= totals.number_of_pages,
        })
    }

    /// Case-insensitive substring search over descriptions.
    ///
    /// Records without a description never match. An empty or whitespace-only
    /// query is rejected.
    pub async fn search(&self, query: &str) -> ResultEngine<Vec<Transaction>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidOperation(
                "search query cannot be empty".to_string(),
            ));
        }

        // `%`/`_` in the query are literal characters, not wildcards.
        let escaped = trimmed
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let models = transactions::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(transactions::Column::Description)))
                    .like(LikeExpr::new(format!("%{escaped}%")).escape('\\')),
            )
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }

    /// Returns records with `amount > threshold` (strictly greater).
    pub async fn large_transactions(&self, threshold: Money) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::AmountMinor.gt(threshold.cents()))
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_falls_back_to_timestamp() {
        assert_eq!(SortField::parse("amount"), SortField::Amount);
        assert_eq!(SortField::parse("fromAccount"), SortField::FromAccount);
        assert_eq!(SortField::parse("from_account"), SortField::FromAccount);
        assert_eq!(SortField::parse("timestamp"), SortField::Timestamp);
        assert_eq!(SortField::parse("nonsense"), SortField::Timestamp);
        assert_eq!(SortField::parse(""), SortField::Timestamp);
    }

    #[test]
    fn sort_direction_defaults_to_ascending() {
        assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Ascending);
    }
}
