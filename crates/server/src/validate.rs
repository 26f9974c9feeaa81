//! Structural field validation, applied before any business logic runs.
//!
//! Mirrors the constraints on the record model: account identifier lengths,
//! amount range (positive, daily limit), description length. Failures are
//! collected as one message per offending field so the client sees everything
//! wrong with a request at once.

use api_types::transaction::TransactionNew;
use engine::Money;

/// Daily per-transfer limit: R 50,000.00 in cents.
pub const MAX_AMOUNT: Money = Money::new(5_000_000);

const ACCOUNT_MIN: usize = 3;
const ACCOUNT_MAX: usize = 20;
const DESCRIPTION_MAX: usize = 200;

/// Validates a candidate record, returning the parsed amount on success.
pub fn candidate(payload: &TransactionNew) -> Result<Money, Vec<String>> {
    let mut messages = Vec::new();

    check_account(
        &payload.from_account,
        "Source account cannot be empty",
        &mut messages,
    );
    check_account(
        &payload.to_account,
        "Destination account cannot be empty",
        &mut messages,
    );

    let amount = match payload.amount.parse::<Money>() {
        Ok(amount) => {
            if !amount.is_positive() {
                messages.push("Amount must be positive".to_string());
            } else if amount > MAX_AMOUNT {
                messages.push("Amount cannot exceed daily limit of R 50,000".to_string());
            }
            Some(amount)
        }
        Err(_) => {
            messages.push("Amount must be a decimal number with at most 2 places".to_string());
            None
        }
    };

    if let Some(description) = &payload.description
        && description.chars().count() > DESCRIPTION_MAX
    {
        messages.push("Description cannot exceed 200 characters".to_string());
    }

    match (messages.is_empty(), amount) {
        (true, Some(amount)) => Ok(amount),
        _ => Err(messages),
    }
}

fn check_account(account: &str, empty_message: &str, messages: &mut Vec<String>) {
    if account.trim().is_empty() {
        messages.push(empty_message.to_string());
        return;
    }
    let len = account.chars().count();
    if !(ACCOUNT_MIN..=ACCOUNT_MAX).contains(&len) {
        messages.push("Account ID must be 3-20 characters".to_string());
    }
}
