// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountId, AccountView};
use crate::domain::transaction::{Transaction, TransactionId, TransactionView};

entity_id!(
    /// Unique identifier for a transfer
    TransferId
);

/// Movement into a credit account. The debit side is the parent
/// transaction's debit account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub transaction_id: TransactionId,
    pub particulars: String,
    pub credit_account_id: AccountId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transfer {
    pub const MAX_PARTICULARS_LENGTH: usize = 255;

    pub fn new(
        transaction_id: TransactionId,
        particulars: String,
        credit_account_id: AccountId,
        amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransferId::new(),
            transaction_id,
            particulars,
            credit_account_id,
            amount,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferView {
    pub id: TransferId,
    pub transaction_id: TransactionId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transaction: Option<TransactionView>,
    pub particulars: String,
    pub credit_account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub credit_account: Option<AccountView>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransferView {
    pub fn with_relations(
        mut self,
        transaction: Option<&Transaction>,
        credit_account: Option<&Account>,
    ) -> Self {
        self.transaction = transaction.map(TransactionView::from);
        self.credit_account = credit_account.map(AccountView::from);
        self
    }
}

impl From<&Transfer> for TransferView {
    fn from(t: &Transfer) -> Self {
        Self {
            id: t.id,
            transaction_id: t.transaction_id,
            transaction: None,
            particulars: t.particulars.clone(),
            credit_account_id: t.credit_account_id,
            credit_account: None,
            amount: t.amount,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<Transfer> for TransferView {
    fn from(t: Transfer) -> Self {
        Self::from(&t)
    }
}
