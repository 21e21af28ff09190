//! Credit ledger shapes.
//!
//! Ledger entries are append-only, so there is no update shape. Purchases
//! and usages are requests that produce new entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ideaverse_core::domain::CreditTransaction;
use ideaverse_core::validation::validate_not_blank;
use ideaverse_core::vocab::TransactionType;
use ideaverse_core::{ValidationError, Violations};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::common::entity_search_params;
use crate::registry::{CreateSchema, Schema, decode_flattened, derived_schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreditBase {
    /// Signed change to the balance.
    pub amount: i64,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    pub transaction_type: TransactionType,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
    pub payment_id: Option<String>,
}

impl From<&CreditTransaction> for CreditBase {
    fn from(entry: &CreditTransaction) -> Self {
        Self {
            amount: entry.amount,
            description: entry.description.clone(),
            transaction_type: entry.transaction_type,
            related_entity_id: entry.related_entity_id.clone(),
            related_entity_type: entry.related_entity_type.clone(),
            payment_id: entry.payment_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCreate {
    #[serde(flatten)]
    pub base: CreditBase,
    pub user_id: String,
    /// Balance after this entry.
    pub balance: i64,
}

impl Schema for CreditCreate {
    const NAME: &'static str = "credit.create";

    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_flattened::<CreditBase, Self>(raw)
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.merge(self.base.validate());
        violations.rule("user_id", validate_not_blank(&self.user_id));
        if self.balance < 0 {
            violations.push("balance", "must not be negative");
        }
        violations.finish()
    }
}

impl CreateSchema for CreditCreate {}

impl CreditCreate {
    pub fn into_transaction(self) -> CreditTransaction {
        let base = self.base;
        let mut entry = CreditTransaction::new(
            self.user_id,
            base.amount,
            base.description,
            base.transaction_type,
            self.balance,
        );
        entry.related_entity_id = base.related_entity_id;
        entry.related_entity_type = base.related_entity_type;
        entry.payment_id = base.payment_id;
        entry
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditResponse {
    #[serde(flatten)]
    pub base: CreditBase,
    pub id: String,
    pub user_id: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CreditTransaction> for CreditResponse {
    fn from(entry: CreditTransaction) -> Self {
        Self {
            base: CreditBase::from(&entry),
            id: entry.id,
            user_id: entry.user_id,
            balance: entry.balance,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Totals over a user's ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSummary {
    /// Sum of every credit-adding entry.
    pub total_credits: i64,
    /// Sum of every credit-spending entry, as a positive number.
    pub total_spent: i64,
    pub available_credits: i64,
    /// Most recent entry in the ledger.
    pub last_transaction: Option<CreditResponse>,
}

impl CreditSummary {
    /// Totals saturate at the `i64` bounds.
    pub fn from_ledger(entries: &[CreditTransaction]) -> Self {
        let (total_credits, total_spent) =
            entries.iter().fold((0i64, 0i64), |(credits, spent), entry| {
                if entry.amount > 0 {
                    (credits.saturating_add(entry.amount), spent)
                } else {
                    (credits, spent.saturating_add(entry.amount.saturating_neg()))
                }
            });
        Self {
            total_credits,
            total_spent,
            available_credits: total_credits.saturating_sub(total_spent),
            last_transaction: entries
                .iter()
                .max_by_key(|e| e.created_at)
                .cloned()
                .map(CreditResponse::from),
        }
    }
}

/// A payment detail value: provider payloads mix strings and integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentDetail {
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreditPurchase {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub amount: i64,
    #[validate(custom(function = "validate_not_blank"))]
    pub payment_method: String,
    #[serde(default)]
    pub payment_details: BTreeMap<String, PaymentDetail>,
}

impl CreditPurchase {
    /// Ledger entry for a settled purchase on top of `balance`.
    pub fn into_transaction(
        self,
        user_id: String,
        balance: i64,
        payment_id: Option<String>,
    ) -> CreditTransaction {
        let mut entry = CreditTransaction::new(
            user_id,
            self.amount,
            format!("Purchased {} credits via {}", self.amount, self.payment_method),
            TransactionType::Purchase,
            balance.saturating_add(self.amount),
        );
        entry.payment_id = payment_id;
        entry
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreditUsage {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub amount: i64,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    pub related_entity_id: Option<String>,
    pub related_entity_type: Option<String>,
}

impl CreditUsage {
    /// Ledger entry spending `amount` from `balance`, or `None` when the
    /// balance does not cover it.
    pub fn into_transaction(self, user_id: String, balance: i64) -> Option<CreditTransaction> {
        if balance < self.amount {
            return None;
        }
        let mut entry = CreditTransaction::new(
            user_id,
            -self.amount,
            self.description,
            TransactionType::Usage,
            balance - self.amount,
        );
        entry.related_entity_id = self.related_entity_id;
        entry.related_entity_type = self.related_entity_type;
        Some(entry)
    }
}

derived_schema! {
    CreditPurchase => "credit.purchase",
    CreditUsage => "credit.usage",
}

entity_search_params! {
    /// Parameters for listing ledger entries.
    CreditSearchParams {
        user_id: Option<String>,
        transaction_type: Option<TransactionType>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    }
}

impl Schema for CreditSearchParams {
    const NAME: &'static str = "credit.search";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.merge(self.validate());
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                violations.push("end_date", "must not be before start_date");
            }
        }
        violations.finish()
    }
}
