//! Trial balance and dashboard reads over posted history.

mod common;

use common::{date, draft, seed_chart, setup_db};
use loom_core::ledger::{EntryCategory, JournalLineInput, LedgerScope};
use loom_core::reports::ReportError;
use loom_db::{AccountRepository, DashboardRepository, JournalRepository, ReportRepository};
use loom_shared::config::LedgerConfig;
use loom_shared::types::{BuyerId, SupplierId};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_trial_balance_opening_period_and_closing() {
    let db = setup_db().await;
    let chart = seed_chart(&db).await;
    let journal = JournalRepository::new(db.clone());

    let june = journal
        .create_draft(draft(
            EntryCategory::Journal,
            date(2025, 6, 20),
            vec![
                JournalLineInput::debit(chart.bank.id, dec!(500)),
                JournalLineInput::credit(chart.capital.id, dec!(500)),
            ],
        ))
        .await
        .unwrap();
    journal.post_entry(june.id).await.unwrap();

    let july = journal
        .create_draft(draft(
            EntryCategory::CustomerDue,
            date(2025, 7, 10),
            vec![
                JournalLineInput::debit(chart.receivables.id, dec!(300)),
                JournalLineInput::credit(chart.sales.id, dec!(300)),
            ],
        ))
        .await
        .unwrap();
    journal.post_entry(july.id).await.unwrap();

    // Drafts and entries after the window stay out.
    journal
        .create_draft(draft(
            EntryCategory::Journal,
            date(2025, 7, 12),
            vec![
                JournalLineInput::debit(chart.bank.id, dec!(999)),
                JournalLineInput::credit(chart.capital.id, dec!(999)),
            ],
        ))
        .await
        .unwrap();
    let august = journal
        .create_draft(draft(
            EntryCategory::Journal,
            date(2025, 8, 2),
            vec![
                JournalLineInput::debit(chart.bank.id, dec!(77)),
                JournalLineInput::credit(chart.capital.id, dec!(77)),
            ],
        ))
        .await
        .unwrap();
    journal.post_entry(august.id).await.unwrap();

    let report = ReportRepository::new(db.clone())
        .get_trial_balance(date(2025, 7, 1), date(2025, 7, 31))
        .await
        .unwrap();

    let names: Vec<&str> = report.rows.iter().map(|r| r.account_name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);

    let bank = report.rows.iter().find(|r| r.account_id == chart.bank.id).unwrap();
    assert_eq!(bank.opening_debit, dec!(500));
    assert_eq!(bank.period_debit, dec!(0));
    assert_eq!(bank.closing_debit, dec!(500));

    let sales = report.rows.iter().find(|r| r.account_id == chart.sales.id).unwrap();
    assert_eq!(sales.period_credit, dec!(300));
    assert_eq!(sales.closing_credit, dec!(300));

    assert_eq!(report.totals.closing_debit, dec!(800));
    assert_eq!(report.totals.closing_credit, dec!(800));
    assert!(report.totals.is_balanced);
}

#[tokio::test]
async fn test_trial_balance_skips_deleted_accounts_and_rejects_inverted_range() {
    let db = setup_db().await;
    let chart = seed_chart(&db).await;
    AccountRepository::new(db.clone())
        .soft_delete_account(chart.purchases.id)
        .await
        .unwrap();
    let reports = ReportRepository::new(db.clone());

    let report = reports
        .get_trial_balance(date(2025, 1, 1), date(2025, 12, 31))
        .await
        .unwrap();
    assert!(report.rows.iter().all(|r| r.account_id != chart.purchases.id));
    assert!(report.totals.is_balanced);

    let err = reports
        .get_trial_balance(date(2025, 12, 31), date(2025, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidDateRange { .. }));
    assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_dashboard_stats_from_posted_lines() {
    let db = setup_db().await;
    let chart = seed_chart(&db).await;
    let journal = JournalRepository::new(db.clone());
    let buyer = LedgerScope::Buyer(BuyerId::new());
    let supplier = LedgerScope::Supplier(SupplierId::new());

    let postings = [
        (
            EntryCategory::CustomerDue,
            vec![
                JournalLineInput::debit(chart.receivables.id, dec!(800)).scoped(buyer),
                JournalLineInput::credit(chart.sales.id, dec!(800)),
            ],
        ),
        (
            EntryCategory::Receipt,
            vec![
                JournalLineInput::debit(chart.bank.id, dec!(300)),
                JournalLineInput::credit(chart.receivables.id, dec!(300)).scoped(buyer),
            ],
        ),
        (
            EntryCategory::SupplierDue,
            vec![
                JournalLineInput::debit(chart.purchases.id, dec!(450)),
                JournalLineInput::credit(chart.payables.id, dec!(450)).scoped(supplier),
            ],
        ),
    ];
    for (category, lines) in postings {
        let entry = journal
            .create_draft(draft(category, date(2025, 7, 1), lines))
            .await
            .unwrap();
        journal.post_entry(entry.id).await.unwrap();
    }
    journal
        .create_draft(draft(
            EntryCategory::CustomerDue,
            date(2025, 7, 2),
            vec![
                JournalLineInput::debit(chart.receivables.id, dec!(5000)).scoped(buyer),
                JournalLineInput::credit(chart.sales.id, dec!(5000)),
            ],
        ))
        .await
        .unwrap();

    let stats = DashboardRepository::new(db.clone(), &LedgerConfig::default())
        .get_dashboard_stats()
        .await
        .unwrap();

    assert_eq!(stats.total_receivables, dec!(500));
    assert_eq!(stats.total_payables, dec!(450));
    // Cash in Hand opens at 1000, the bank received 300.
    assert_eq!(stats.cash_and_bank_balance, dec!(1300));
    assert_eq!(stats.total_assets, dec!(1800));
    assert_eq!(stats.total_liabilities, dec!(450));
}
