// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Transaction Aggregate
//!
//! The parent ledger entry. A transaction debits one account for an amount on
//! a given date, optionally on behalf of a member. Receipts, expenditures and
//! transfers are child records that reference a transaction by id; they are
//! created through their own services and are not owned in memory here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::account::{Account, AccountId, AccountView};
use crate::domain::member::{Member, MemberId, MemberView};
use crate::domain::validation::ValidationError;

entity_id!(
    /// Unique identifier for a ledger transaction
    TransactionId
);

/// Transaction classification, serialized as the lowercase literals
/// `receipts`, `withdrawal`, `expenses` and `transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Receipts,
    Withdrawal,
    Expenses,
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Receipts,
        TransactionType::Withdrawal,
        TransactionType::Expenses,
        TransactionType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Receipts => "receipts",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Expenses => "expenses",
            TransactionType::Transfer => "transfer",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == raw)
            .ok_or_else(|| ValidationError::InvalidTransactionType(raw.to_string()))
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Optional external reference code, unique when present.
    pub reference: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub debit_account_id: AccountId,
    pub member_id: Option<MemberId>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub const MAX_REFERENCE_LENGTH: usize = 20;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reference: Option<String>,
        transaction_date: Option<DateTime<Utc>>,
        transaction_type: TransactionType,
        amount: Decimal,
        notes: Option<String>,
        debit_account_id: AccountId,
        member_id: Option<MemberId>,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            reference,
            transaction_date: transaction_date.unwrap_or(now),
            transaction_type,
            amount,
            notes,
            debit_account_id,
            member_id,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: TransactionId,
    pub transaction_ref: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub debit_account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub debit_account: Option<AccountView>,
    pub member_id: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub member: Option<MemberView>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionView {
    pub fn with_relations(mut self, account: Option<&Account>, member: Option<&Member>) -> Self {
        self.debit_account = account.map(AccountView::from);
        self.member = member.map(MemberView::from);
        self
    }
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            transaction_ref: tx.reference.clone(),
            transaction_date: tx.transaction_date,
            transaction_type: tx.transaction_type,
            amount: tx.amount,
            notes: tx.notes.clone(),
            debit_account_id: tx.debit_account_id,
            debit_account: None,
            member_id: tx.member_id,
            member: None,
            created_by: tx.created_by.clone(),
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        Self::from(&tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_transaction_type_literals() {
        for t in TransactionType::ALL {
            assert_eq!(TransactionType::parse(t.as_str()).unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
        assert_eq!(
            TransactionType::parse("Receipts"),
            Err(ValidationError::InvalidTransactionType("Receipts".to_string()))
        );
        assert!(TransactionType::parse("deposit").is_err());
    }

    #[test]
    fn test_date_defaults_to_now() {
        let before = Utc::now();
        let tx = Transaction::new(
            None,
            None,
            TransactionType::Receipts,
            "100.50".parse().unwrap(),
            None,
            AccountId::new(),
            None,
            "system".to_string(),
        );
        assert!(tx.transaction_date >= before);
        assert!(tx.transaction_date <= Utc::now());
    }

    #[test]
    fn test_explicit_date_is_kept() {
        let date = Utc.with_ymd_and_hms(2024, 12, 25, 9, 0, 0).unwrap();
        let tx = Transaction::new(
            Some("CHR-001".to_string()),
            Some(date),
            TransactionType::Receipts,
            Decimal::ONE_HUNDRED,
            None,
            AccountId::new(),
            None,
            "system".to_string(),
        );
        assert_eq!(tx.transaction_date, date);
        let json = serde_json::to_value(TransactionView::from(&tx)).unwrap();
        assert_eq!(json["transaction_ref"], "CHR-001");
        assert!(json.get("debit_account").is_none());
        assert!(json.get("member").is_none());
    }
}
