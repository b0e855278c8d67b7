// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Account Aggregate
//!
//! A ledger account that transactions draw from and that receipts,
//! expenditures and transfers post to. Accounts are never hard-deleted:
//! retiring one flips `is_active` to `false`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ValidationError;

entity_id!(
    /// Unique identifier for a ledger account
    AccountId
);

/// Account classification.
///
/// The wire values are the literal strings `Bank`, `Expense`, `Income`,
/// `Asset` and `liability`. The lowercase `liability` is preserved as-is and
/// matching is case-sensitive for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Bank")]
    Bank,
    #[serde(rename = "Expense")]
    Expense,
    #[serde(rename = "Income")]
    Income,
    #[serde(rename = "Asset")]
    Asset,
    #[serde(rename = "liability")]
    Liability,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Bank,
        AccountType::Expense,
        AccountType::Income,
        AccountType::Asset,
        AccountType::Liability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "Bank",
            AccountType::Expense => "Expense",
            AccountType::Income => "Income",
            AccountType::Asset => "Asset",
            AccountType::Liability => "liability",
        }
    }

    /// Validate and convert a raw account type string.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == raw)
            .ok_or_else(|| ValidationError::InvalidAccountType(raw.to_string()))
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub account_type: AccountType,
    /// Fraction of receipts retained locally, when the account is shared.
    pub local_share: Option<Decimal>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub const MAX_NAME_LENGTH: usize = 100;

    pub fn new(
        name: String,
        account_type: AccountType,
        local_share: Option<Decimal>,
        notes: Option<String>,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name,
            account_type,
            local_share,
            notes,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Soft delete. Calling this on an inactive account leaves it inactive.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

/// Public projection of an [`Account`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub account_name: String,
    pub account_type: AccountType,
    pub local_share: Option<Decimal>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            account_name: account.name.clone(),
            account_type: account.account_type,
            local_share: account.local_share,
            notes: account.notes.clone(),
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_literals() {
        assert_eq!(AccountType::parse("Bank").unwrap(), AccountType::Bank);
        assert_eq!(AccountType::parse("liability").unwrap(), AccountType::Liability);
        assert_eq!(AccountType::Liability.as_str(), "liability");
    }

    #[test]
    fn test_account_type_is_case_sensitive() {
        assert_eq!(
            AccountType::parse("bank"),
            Err(ValidationError::InvalidAccountType("bank".to_string()))
        );
        assert!(AccountType::parse("Liability").is_err());
        assert!(AccountType::parse("").is_err());
    }

    #[test]
    fn test_account_type_serde_uses_literals() {
        let json = serde_json::to_string(&AccountType::Liability).unwrap();
        assert_eq!(json, "\"liability\"");
        let parsed: AccountType = serde_json::from_str("\"Income\"").unwrap();
        assert_eq!(parsed, AccountType::Income);
    }

    #[test]
    fn test_new_account_is_active() {
        let account = Account::new(
            "Main Bank".to_string(),
            AccountType::Bank,
            None,
            None,
            "system".to_string(),
        );
        assert!(account.is_active);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut account = Account::new(
            "Tithes".to_string(),
            AccountType::Income,
            None,
            None,
            "system".to_string(),
        );
        account.deactivate();
        account.deactivate();
        assert!(!account.is_active);
    }

    #[test]
    fn test_view_omits_creator() {
        let account = Account::new(
            "Building Fund".to_string(),
            AccountType::Asset,
            Some("0.25".parse().unwrap()),
            Some("capital project".to_string()),
            "treasurer".to_string(),
        );
        let view = AccountView::from(&account);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["account_name"], "Building Fund");
        assert_eq!(json["account_type"], "Asset");
        assert!(json.get("created_by").is_none());
    }
}
