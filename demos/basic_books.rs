//! Basic bookkeeping walkthrough

use bigdecimal::BigDecimal;
use bookkeeping_core::build::{self, LineDraft, TradeDraft};
use bookkeeping_core::utils::MemoryStorage;
use bookkeeping_core::{
    Books, Company, JournalEntry, Ledger, RegistrationType, SettlementKind, StatementScope,
    StockItem, TradeKind,
};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Bookkeeping Core - Basic Books Example\n");

    // Open books on in-memory storage; the standard registry is seeded
    let storage = MemoryStorage::new();
    let mut books = Books::load(storage, Company::new("Acme Traders", "Karnataka")).await?;

    // 1. Master records
    println!("📊 Creating Masters...");
    books
        .add_ledger(Ledger::party(
            "Prakash Traders",
            "Sundry Debtors",
            Some("29AAAAA0000A1Z5".to_string()),
            Some(RegistrationType::Registered),
            Some("Karnataka".to_string()),
        ))
        .await?;
    println!("  ✓ Ledger: Prakash Traders (Sundry Debtors)");

    books
        .add_ledger(Ledger::party(
            "Mumbai Wholesale",
            "Sundry Creditors",
            Some("27BBBBB0000B1Z5".to_string()),
            Some(RegistrationType::Registered),
            Some("Maharashtra".to_string()),
        ))
        .await?;
    println!("  ✓ Ledger: Mumbai Wholesale (Sundry Creditors)");

    let mut laptop = StockItem::new("Laptop", "Electronics", "Nos");
    laptop.gst_rate = Some(BigDecimal::from(18));
    books.add_stock_item(laptop).await?;
    println!("  ✓ Stock item: Laptop @ 18% GST\n");

    // 2. Vouchers
    println!("💰 Recording Vouchers...\n");

    let purchase = build::trade_voucher(
        books.registry(),
        TradeKind::Purchase,
        TradeDraft {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            invoice_no: "PINV-001".to_string(),
            due_date: None,
            party: "Mumbai Wholesale".to_string(),
            lines: vec![LineDraft::new(
                "Laptop",
                BigDecimal::from(10),
                BigDecimal::from(40000),
            )],
            narration: Some("Opening stock purchase".to_string()),
        },
    );
    books.add_voucher(purchase).await?;
    println!("  ✓ Purchase: 10 Laptops from Mumbai Wholesale (inter-state, IGST)");

    let sale = build::trade_voucher(
        books.registry(),
        TradeKind::Sales,
        TradeDraft {
            date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            invoice_no: "INV-001".to_string(),
            due_date: None,
            party: "Prakash Traders".to_string(),
            lines: vec![LineDraft::new(
                "Laptop",
                BigDecimal::from(2),
                BigDecimal::from(65000),
            )],
            narration: None,
        },
    );
    books.add_voucher(sale).await?;
    println!("  ✓ Sale: 2 Laptops to Prakash Traders (intra-state, CGST+SGST)");

    books
        .add_voucher(build::settlement(
            SettlementKind::Receipt,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "Cash",
            "Prakash Traders",
            BigDecimal::from(100000),
            Some("Part payment".to_string()),
        ))
        .await?;
    println!("  ✓ Receipt: ₹100,000 from Prakash Traders");

    let journal = build::journal(
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        vec![
            JournalEntry::debit("Rent Expense", BigDecimal::from(15000)),
            JournalEntry::credit("Cash", BigDecimal::from(15000)),
        ],
        Some("June office rent".to_string()),
    )?;
    books.add_voucher(journal).await?;
    println!("  ✓ Journal: Rent Expense 15,000 Dr / Cash 15,000 Cr\n");

    // 3. Reports
    println!("📖 Day Book:");
    for row in books.day_book(None, None) {
        println!(
            "  {} | {:<8} | {:<16} | ₹{}",
            row.date, row.voucher_type, row.party, row.amount
        );
    }
    println!();

    println!("📑 Statement for Prakash Traders:");
    let statement = books.ledger_statement(
        &StatementScope::Named("Prakash Traders".to_string()),
        None,
        None,
    );
    for row in &statement.rows {
        println!(
            "  {} | {:<16} | Dr ₹{} | Cr ₹{} | Balance ₹{}",
            row.date, row.particulars, row.debit, row.credit, row.balance
        );
    }
    println!("  Closing balance: ₹{}\n", statement.closing_balance);

    println!("⚖️  Trial Balance:");
    let trial = books.trial_balance();
    for row in &trial.rows {
        println!("  {:<20} | Dr ₹{} | Cr ₹{}", row.ledger, row.debit, row.credit);
    }
    println!(
        "  Totals: Dr ₹{} / Cr ₹{} (balanced: {})\n",
        trial.total_debit,
        trial.total_credit,
        trial.is_balanced()
    );

    println!("📦 Stock Summary:");
    for row in books.stock_summary() {
        println!(
            "  {:<10} | opening {} | in {} | out {} | closing {}",
            row.name, row.opening, row.inward, row.outward, row.closing
        );
    }
    println!();

    println!("📈 Dashboard:");
    let dashboard = books.dashboard();
    println!("  Total sales:     ₹{}", dashboard.total_sales);
    println!("  Total purchases: ₹{}", dashboard.total_purchases);
    println!("  Receivables:     ₹{}", dashboard.receivables);
    println!("  Payables:        ₹{}", dashboard.payables);

    let integrity = books.validate_integrity();
    println!("\n✅ Books valid: {}", integrity.is_valid);

    Ok(())
}
