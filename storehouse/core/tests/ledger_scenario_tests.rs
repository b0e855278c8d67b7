// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end ledger scenario across the application services.
//!
//! A Sunday service: members grouped into fellowships give offerings that are
//! recorded as one parent transaction with several receipts, part of the
//! takings is spent and the rest is swept into savings.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use storehouse_core::application::account_service::CreateAccountRequest;
use storehouse_core::application::expenditure_service::CreateExpenditureRequest;
use storehouse_core::application::member_service::CreateMemberRequest;
use storehouse_core::application::members_group_service::CreateGroupRequest;
use storehouse_core::application::receipt_service::CreateReceiptRequest;
use storehouse_core::application::transaction_service::CreateTransactionRequest;
use storehouse_core::application::transfer_service::CreateTransferRequest;
use storehouse_core::application::{ErrorKind, Services};
use storehouse_core::domain::period::DateRange;
use storehouse_core::domain::account::Account;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

async fn account(services: &Services, name: &str, account_type: &str) -> Account {
    services
        .accounts
        .create(
            CreateAccountRequest {
                account_name: name.to_string(),
                account_type: account_type.to_string(),
                local_share: None,
                notes: None,
            },
            "treasurer",
        )
        .await
        .unwrap()
}

fn transaction(kind: &str, amount: &str, debit: &Account, member: Option<String>) -> CreateTransactionRequest {
    CreateTransactionRequest {
        transaction_ref: None,
        transaction_date: None,
        transaction_type: kind.to_string(),
        amount: dec(amount),
        notes: None,
        debit_account_id: debit.id.to_string(),
        member_id: member,
    }
}

#[tokio::test]
async fn test_sunday_service_ledger() {
    let services = Services::in_memory();

    let bank = account(&services, "Main Bank", "Bank").await;
    let tithes = account(&services, "Tithes", "Income").await;
    let utilities = account(&services, "Utilities", "Expense").await;
    let savings = account(&services, "Building Savings", "Asset").await;

    let fellowship = services
        .groups
        .create(
            CreateGroupRequest {
                group_name: "Kasarani Fellowship".to_string(),
                notes: None,
            },
            "treasurer",
        )
        .await
        .unwrap();

    let grace = services
        .members
        .create(
            CreateMemberRequest {
                full_name: "Grace Wanjiru".to_string(),
                phone_number: "+254712345678".to_string(),
                email: Some("grace@church.org".to_string()),
                notes: None,
                group_id: Some(fellowship.id.to_string()),
            },
            "clerk",
        )
        .await
        .unwrap();

    // Offering: one parent, three receipts.
    let offering = services
        .transactions
        .create(transaction("receipts", "350", &bank, Some(grace.id.to_string())), "clerk")
        .await
        .unwrap();
    for amount in ["100", "200", "50"] {
        services
            .receipts
            .create(CreateReceiptRequest {
                transaction_id: offering.id.to_string(),
                income_account_id: tithes.id.to_string(),
                amount: dec(amount),
            })
            .await
            .unwrap();
    }
    assert_eq!(services.receipts.total_by_account(tithes.id).await.unwrap(), dec("350"));
    assert_eq!(services.receipts.list_by_transaction(offering.id).await.unwrap().len(), 3);

    // Spending.
    let bill = services
        .transactions
        .create(transaction("expenses", "120.75", &bank, None), "treasurer")
        .await
        .unwrap();
    services
        .expenditures
        .create(CreateExpenditureRequest {
            transaction_id: bill.id.to_string(),
            particulars: "Electricity".to_string(),
            bank_account_id: bank.id.to_string(),
            amount: dec("120.75"),
        })
        .await
        .unwrap();

    // Sweep into savings.
    let sweep = services
        .transactions
        .create(transaction("transfer", "200", &bank, None), "treasurer")
        .await
        .unwrap();
    services
        .transfers
        .create(CreateTransferRequest {
            transaction_id: sweep.id.to_string(),
            particulars: "Building fund".to_string(),
            credit_account_id: savings.id.to_string(),
            amount: dec("200"),
        })
        .await
        .unwrap();

    let today = DateRange::new(Utc::now() - Duration::hours(1), Utc::now() + Duration::hours(1)).unwrap();
    assert_eq!(
        services
            .transfers
            .total_by_credit_account_in_range(savings.id, today)
            .await
            .unwrap(),
        dec("200")
    );
    assert_eq!(services.transactions.list_by_account(bank.id).await.unwrap().len(), 3);
    assert_eq!(services.transactions.list_by_member(grace.id).await.unwrap().len(), 1);
    assert_eq!(services.transactions.list_by_type("expenses").await.unwrap().len(), 1);
    assert_eq!(services.expenditures.list_by_account(utilities.id).await.unwrap().len(), 0);

    // Member detail carries the group; the group cannot be removed while occupied.
    let detail = services.members.get_detailed(grace.id).await.unwrap();
    assert_eq!(
        detail.group.map(|g| g.group_name).as_deref(),
        Some("Kasarani Fellowship")
    );
    let err = services.groups.delete(fellowship.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // Retiring an account keeps its history.
    services.accounts.deactivate(utilities.id).await.unwrap();
    services.accounts.deactivate(utilities.id).await.unwrap();
    assert!(!services.accounts.get(utilities.id).await.unwrap().is_active);
    assert_eq!(services.accounts.list_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_children_reject_unknown_parent() {
    let services = Services::in_memory();
    let tithes = account(&services, "Tithes", "Income").await;

    let err = services
        .receipts
        .create(CreateReceiptRequest {
            transaction_id: uuid::Uuid::new_v4().to_string(),
            income_account_id: tithes.id.to_string(),
            amount: dec("10"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(services.receipts.list_all().await.unwrap().is_empty());
}
