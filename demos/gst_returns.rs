//! GST return preparation walkthrough

use bigdecimal::BigDecimal;
use bookkeeping_core::build::{self, LineDraft, TradeDraft};
use bookkeeping_core::utils::{MemoryStorage, StaticHsnDirectory};
use bookkeeping_core::{
    Books, Company, GstSlab, GstrForm, HsnValidator, Ledger, RegistrationType, StockItem,
    TradeKind,
};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Bookkeeping Core - GST Returns Example\n");

    // 1. The conventional rate slabs
    println!("📊 GST Rate Slabs:");
    let slabs = [
        (GstSlab::Exempt, "Essential items (food, medicines)"),
        (GstSlab::Reduced, "Reduced rate items"),
        (GstSlab::Merit, "Merit rate items"),
        (GstSlab::Standard, "Standard rate items"),
        (GstSlab::Luxury, "Luxury/sin goods"),
    ];
    for (slab, description) in slabs.iter() {
        println!("  {:?}: {}% - {}", slab, slab.rate(), description);
    }
    println!();

    // 2. A register with registered and unregistered counterparties
    let mut books = Books::new(MemoryStorage::new(), Company::new("Acme Traders", "Karnataka"));

    books
        .add_ledger(Ledger::party(
            "Prakash Traders",
            "Sundry Debtors",
            Some("29AAAAA0000A1Z5".to_string()),
            Some(RegistrationType::Registered),
            Some("Karnataka".to_string()),
        ))
        .await?;
    books
        .add_ledger(Ledger::party(
            "Walk-in Customer",
            "Sundry Debtors",
            None,
            Some(RegistrationType::Unregistered),
            Some("Karnataka".to_string()),
        ))
        .await?;
    books
        .add_ledger(Ledger::party(
            "Mumbai Wholesale",
            "Sundry Creditors",
            Some("27BBBBB0000B1Z5".to_string()),
            Some(RegistrationType::Registered),
            Some("Maharashtra".to_string()),
        ))
        .await?;

    let mut laptop = StockItem::new("Laptop", "Electronics", "Nos");
    laptop.hsn = Some("8471".to_string());
    laptop.gst_rate = Some(BigDecimal::from(18));
    books.add_stock_item(laptop).await?;

    let sale = |invoice_no: &str, party: &str, qty: i64, rate: i64| TradeDraft {
        date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        invoice_no: invoice_no.to_string(),
        due_date: None,
        party: party.to_string(),
        lines: vec![LineDraft::new(
            "Laptop",
            BigDecimal::from(qty),
            BigDecimal::from(rate),
        )],
        narration: None,
    };

    let b2b = build::trade_voucher(
        books.registry(),
        TradeKind::Sales,
        sale("INV-001", "Prakash Traders", 2, 65000),
    );
    let b2c = build::trade_voucher(
        books.registry(),
        TradeKind::Sales,
        sale("INV-002", "Walk-in Customer", 1, 68000),
    );
    let inward = build::trade_voucher(
        books.registry(),
        TradeKind::Purchase,
        sale("PINV-044", "Mumbai Wholesale", 10, 40000),
    );
    books.add_vouchers(vec![b2b, b2c, inward]).await?;

    // 3. GSTR-1: outward supplies
    println!("📤 GSTR-1 (Outward Supplies):");
    let gstr1 = books.gstr1();
    println!("  B2B invoices:");
    for entry in &gstr1.b2b {
        println!(
            "    {} | {} ({}) | taxable ₹{} | tax ₹{}",
            entry.invoice_no,
            entry.party,
            entry.gstin.as_deref().unwrap_or("-"),
            entry.taxable_value,
            entry.total_tax
        );
    }
    println!("  B2C invoices:");
    for entry in &gstr1.b2c {
        println!(
            "    {} | {} | taxable ₹{} | tax ₹{}",
            entry.invoice_no, entry.party, entry.taxable_value, entry.total_tax
        );
    }
    println!();

    // 4. GSTR-2B: inward supplies from registered dealers
    println!("📥 GSTR-2B (Inward Supplies):");
    let gstr2 = books.gstr2(GstrForm::Gstr2b);
    for entry in &gstr2.b2b_purchases {
        println!(
            "    {} | {} | invoice value ₹{}",
            entry.invoice_no, entry.party, entry.invoice_value
        );
    }
    println!();

    // 5. GSTR-3B: consolidated summary
    println!("📋 GSTR-3B Summary:");
    let gstr3b = books.gstr3b();
    println!(
        "  Outward taxable value: ₹{}",
        gstr3b.outward.taxable_value
    );
    println!(
        "  Outward tax: IGST ₹{} / CGST ₹{} / SGST ₹{}",
        gstr3b.outward.tax.igst, gstr3b.outward.tax.cgst, gstr3b.outward.tax.sgst
    );
    println!(
        "  ITC:         IGST ₹{} / CGST ₹{} / SGST ₹{}",
        gstr3b.itc.igst, gstr3b.itc.cgst, gstr3b.itc.sgst
    );
    let payable = gstr3b.payable_for_display();
    println!(
        "  Payable:     IGST ₹{} / CGST ₹{} / SGST ₹{}",
        payable.igst, payable.cgst, payable.sgst
    );
    println!();

    // 6. HSN validation against the built-in directory
    println!("🔍 HSN Validation:");
    let directory = StaticHsnDirectory::new();
    for (code, rate) in [("8471", 18i64), ("8473", 18), ("0000", 18)] {
        let result = directory.validate_hsn(code, &BigDecimal::from(rate)).await;
        println!("  {} @ {}%: {:?} - {}", code, rate, result.status, result.message);
    }

    Ok(())
}
