// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountId, AccountView};
use crate::domain::transaction::{Transaction, TransactionId, TransactionView};

entity_id!(
    /// Unique identifier for an expenditure
    ExpenditureId
);

/// Money paid out of a bank account as part of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expenditure {
    pub id: ExpenditureId,
    pub transaction_id: TransactionId,
    pub particulars: String,
    pub bank_account_id: AccountId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expenditure {
    pub const MAX_PARTICULARS_LENGTH: usize = 255;

    pub fn new(
        transaction_id: TransactionId,
        particulars: String,
        bank_account_id: AccountId,
        amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenditureId::new(),
            transaction_id,
            particulars,
            bank_account_id,
            amount,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureView {
    pub id: ExpenditureId,
    pub transaction_id: TransactionId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transaction: Option<TransactionView>,
    pub particulars: String,
    pub bank_account_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bank_account: Option<AccountView>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenditureView {
    pub fn with_relations(
        mut self,
        transaction: Option<&Transaction>,
        bank_account: Option<&Account>,
    ) -> Self {
        self.transaction = transaction.map(TransactionView::from);
        self.bank_account = bank_account.map(AccountView::from);
        self
    }
}

impl From<&Expenditure> for ExpenditureView {
    fn from(e: &Expenditure) -> Self {
        Self {
            id: e.id,
            transaction_id: e.transaction_id,
            transaction: None,
            particulars: e.particulars.clone(),
            bank_account_id: e.bank_account_id,
            bank_account: None,
            amount: e.amount,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<Expenditure> for ExpenditureView {
    fn from(e: Expenditure) -> Self {
        Self::from(&e)
    }
}
