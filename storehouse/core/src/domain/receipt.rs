// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Receipt
//!
//! Income recorded against a transaction and credited to an income account.
//! Any number of receipts may reference the same transaction, and nothing
//! forces their amounts to sum to the parent's amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountId, AccountView};
use crate::domain::transaction::{Transaction, TransactionId, TransactionView};

entity_id!(
    /// Unique identifier for a receipt
    ReceiptId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub transaction_id: TransactionId,
    pub income_account_id: AccountId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(transaction_id: TransactionId, income_account_id: AccountId, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: ReceiptId::new(),
            transaction_id,
            income_account_id,
            amount,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptView {
    pub id: ReceiptId,
    pub transaction_id: TransactionId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transaction: Option<TransactionView>,
    pub income_account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub income_account: Option<AccountView>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReceiptView {
    pub fn with_relations(
        mut self,
        transaction: Option<&Transaction>,
        income_account: Option<&Account>,
    ) -> Self {
        self.transaction = transaction.map(TransactionView::from);
        self.income_account = income_account.map(AccountView::from);
        self
    }
}

impl From<&Receipt> for ReceiptView {
    fn from(receipt: &Receipt) -> Self {
        Self {
            id: receipt.id,
            transaction_id: receipt.transaction_id,
            transaction: None,
            income_account_id: receipt.income_account_id,
            income_account: None,
            amount: receipt.amount,
            created_at: receipt.created_at,
            updated_at: receipt.updated_at,
        }
    }
}

impl From<Receipt> for ReceiptView {
    fn from(receipt: Receipt) -> Self {
        Self::from(&receipt)
    }
}
