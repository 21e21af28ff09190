use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocab::TransactionType;

/// One entry of a user's credit ledger. Entries are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: String,
    pub user_id: String,
    /// Signed change; usage entries are negative.
    pub amount: i64,
    pub description: String,
    pub transaction_type: TransactionType,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
    pub payment_id: Option<String>,
    /// Balance after this entry.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditTransaction {
    pub fn new(
        user_id: String,
        amount: i64,
        description: String,
        transaction_type: TransactionType,
        balance: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id,
            amount,
            description,
            transaction_type,
            related_entity_id: None,
            related_entity_type: None,
            payment_id: None,
            balance,
            created_at: now,
            updated_at: now,
        }
    }
}
