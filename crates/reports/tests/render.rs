use chrono::{NaiveDate, TimeZone, Utc};
use engine::{
    BankSource, Channel, Conversion, CurrencyCode, Direction, HistoryItem, LedgerEntry, Money,
    TransferEntry, UnitType,
};
use reports::{Format, ReportSnapshot, render, render_delimited, render_document};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
}

fn conversion(rate: f64) -> Conversion {
    Conversion::new(
        CurrencyCode::try_from("USD").unwrap(),
        CurrencyCode::try_from("INR").unwrap(),
        rate,
    )
}

fn entry(id: i64, item: &str, cents: i64, direction: Direction, channel: Channel) -> LedgerEntry {
    LedgerEntry {
        id,
        date: date(),
        source_name: "Cash-Wallet".to_string(),
        person_name: "Asha".to_string(),
        category: "Home Expenses".to_string(),
        item_name: item.to_string(),
        note: String::new(),
        quantity: 1.0,
        unit: UnitType::Piece,
        unit_price: Money::new(cents),
        total_amount: Money::new(cents),
        direction,
        channel,
        created_at: Utc.timestamp_opt(1_715_650_000 + id, 0).unwrap(),
    }
}

fn transfer(id: i64, cents: i64, direction: Direction) -> TransferEntry {
    TransferEntry {
        id,
        date: date(),
        from_holder: "Asha".to_string(),
        from_source: "City Bank".to_string(),
        from_account_ref: "00012".to_string(),
        to_holder: "Ravi, Jr".to_string(),
        to_source: "Metro Bank".to_string(),
        to_account_ref: "00034".to_string(),
        amount: Money::new(cents),
        direction,
        channel: Channel::Card,
        created_at: Utc.timestamp_opt(1_715_650_000 + id, 0).unwrap(),
    }
}

fn wallet_day() -> ReportSnapshot {
    ReportSnapshot::Daily {
        date: date(),
        entries: vec![
            entry(1, "Salary advance", 5_000, Direction::Credit, Channel::Cash),
            entry(2, "Vegetables, fruit", 2_000, Direction::Debit, Channel::Cash),
            entry(3, "Refund", 3_000, Direction::Credit, Channel::Cheque),
        ],
        sources: vec![BankSource::new(
            date(),
            "Cash-Wallet",
            Money::new(10_000),
            Money::ZERO,
            Money::ZERO,
        )],
    }
}

fn csv_text(snapshot: &ReportSnapshot, conversion: &Conversion) -> String {
    String::from_utf8(render_delimited(snapshot, conversion).unwrap()).unwrap()
}

fn pdf_text(snapshot: &ReportSnapshot, conversion: &Conversion) -> String {
    String::from_utf8(render_document(snapshot, conversion)).unwrap()
}

/// `(base, converted)` from the CSV grand total row.
fn csv_grand_total(csv: &str) -> (String, String) {
    let row = csv
        .lines()
        .find(|line| line.starts_with("GRAND TOTAL,"))
        .unwrap();
    let fields: Vec<&str> = row.split(',').collect();
    (fields[8].to_string(), fields[10].to_string())
}

/// `(base, converted)` from a PDF line such as `LABEL: USD 1.00 / INR 83.50`.
fn pdf_amounts(pdf: &str, label: &str) -> (String, String) {
    let start = pdf.find(&format!("({label}: ")).unwrap();
    let end = start + pdf[start..].find(") Tj").unwrap();
    let words: Vec<&str> = pdf[start..end].split_whitespace().collect();
    let n = words.len();
    (words[n - 4].to_string(), words[n - 1].to_string())
}

fn csv_amounts(csv: &str, label: &str) -> (String, String) {
    let row = csv
        .lines()
        .find(|line| line.starts_with(&format!("{label},")))
        .unwrap();
    let fields: Vec<&str> = row.split(',').collect();
    (fields[1].to_string(), fields[2].to_string())
}

#[test]
fn grand_totals_agree_across_encodings() {
    let snapshot = wallet_day();
    for rate in [1.0, 83.5, 0.012_345, 1.0 / 3.0] {
        let conversion = conversion(rate);
        let csv = csv_grand_total(&csv_text(&snapshot, &conversion));
        let pdf = pdf_amounts(&pdf_text(&snapshot, &conversion), "GRAND TOTAL");
        assert_eq!(csv, pdf, "rate {rate}");
    }
    let (base, converted) = csv_grand_total(&csv_text(&snapshot, &conversion(83.5)));
    assert_eq!(base, "160.00");
    assert_eq!(converted, "13360.00");
}

#[test]
fn daily_csv_has_blocks_and_escaped_fields() {
    let csv = csv_text(&wallet_day(), &conversion(2.0));
    assert!(csv.starts_with("Daily Expense Report\n"));
    assert!(csv.contains("Person Name,Asha\n"));
    assert!(csv.contains("Date,14/05/2024\n"));
    assert!(csv.contains("Day,Tuesday\n"));
    assert!(csv.contains("Rate,1 USD = 2 INR\n"));
    assert!(csv.contains("BANK SOURCE: Cash-Wallet\n"));
    assert!(csv.contains("Opening Cash,100.00\n"));
    assert!(csv.contains("Home Expenses,Vegetables  fruit,,1,PIECE,20.00,40.00,DEBIT,Cash\n"));
    assert!(csv.contains("Home Expenses,SUBTOTAL (net),,,,60.00,120.00\n"));
    assert!(csv.contains(",Cash,Opening:,100.00,Credit:,50.00,Debit:,20.00,Closing:,130.00\n"));
    assert!(csv.contains(",Cheque,Opening:,0.00,Credit:,30.00,Debit:,0.00,Closing:,30.00\n"));
}

#[test]
fn empty_snapshots_render_headers_and_zero_totals() {
    let conversion = conversion(83.5);
    let daily = ReportSnapshot::Daily {
        date: date(),
        entries: vec![],
        sources: vec![],
    };
    let csv = csv_text(&daily, &conversion);
    assert!(csv.starts_with("Daily Expense Report\n"));
    assert!(csv.contains("Person Name,Unknown\n"));
    assert_eq!(csv_grand_total(&csv), ("0.00".to_string(), "0.00".to_string()));
    let pdf = pdf_text(&daily, &conversion);
    assert!(pdf.contains("(Daily Report \\(USD\\)) Tj"));
    assert_eq!(
        pdf_amounts(&pdf, "GRAND TOTAL"),
        ("0.00".to_string(), "0.00".to_string())
    );

    let accounts = ReportSnapshot::Accounts {
        date: date(),
        transfers: vec![],
    };
    assert_eq!(csv_amounts(&csv_text(&accounts, &conversion), "NET").0, "0.00");
    assert_eq!(pdf_amounts(&pdf_text(&accounts, &conversion), "NET").0, "0.00");

    let history = ReportSnapshot::History {
        start: date(),
        end: date(),
        items: vec![],
    };
    assert!(csv_text(&history, &conversion).starts_with("Monthly Report\n"));
    assert!(render_document(&history, &conversion).starts_with(b"%PDF-1.4"));
}

#[test]
fn account_totals_agree() {
    let snapshot = ReportSnapshot::Accounts {
        date: date(),
        transfers: vec![
            transfer(1, 12_345, Direction::Credit),
            transfer(2, 2_345, Direction::Debit),
        ],
    };
    let conversion = conversion(2.0);
    let csv = csv_text(&snapshot, &conversion);
    let pdf = pdf_text(&snapshot, &conversion);
    for label in ["TOTAL CREDIT", "TOTAL DEBIT", "NET"] {
        assert_eq!(csv_amounts(&csv, label), pdf_amounts(&pdf, label), "{label}");
    }
    assert_eq!(csv_amounts(&csv, "NET").0, "100.00");
    assert!(csv.contains("Asha,City Bank,'00012,Ravi  Jr,Metro Bank,'00034,123.45,246.90,CREDIT,Card\n"));
}

#[test]
fn history_totals_agree() {
    let items = vec![
        HistoryItem::Expense(entry(3, "Refund", 3_000, Direction::Credit, Channel::Cheque)),
        HistoryItem::Transfer(transfer(2, 1_000, Direction::Debit)),
        HistoryItem::Expense(entry(1, "Milk", 450, Direction::Debit, Channel::Cash)),
    ];
    let snapshot = ReportSnapshot::History {
        start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        items,
    };
    let conversion = conversion(1.1);
    let csv = csv_text(&snapshot, &conversion);
    let pdf = pdf_text(&snapshot, &conversion);
    assert_eq!(csv_amounts(&csv, "NET"), pdf_amounts(&pdf, "NET"));
    assert_eq!(csv_amounts(&csv, "NET").0, "15.50");
    assert!(csv.contains("Period,01/05/2024 - 31/05/2024\n"));
}

#[test]
fn long_days_flow_onto_more_pages() {
    let entries: Vec<LedgerEntry> = (1..=120)
        .map(|i| {
            entry(
                i,
                "A rather long item description that will certainly need wrapping inside the item column",
                100,
                Direction::Debit,
                Channel::Card,
            )
        })
        .collect();
    let snapshot = ReportSnapshot::Daily {
        date: date(),
        entries,
        sources: vec![],
    };
    let pdf = pdf_text(&snapshot, &conversion(1.0));
    let count: usize = pdf
        .split("/Count ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap();
    assert!(count > 2, "expected several pages, got {count}");
    assert_eq!(
        pdf_amounts(&pdf, "GRAND TOTAL"),
        csv_grand_total(&csv_text(&snapshot, &conversion(1.0)))
    );
}

#[test]
fn artifacts_carry_type_and_name() {
    let artifact = render(&wallet_day(), &conversion(1.0), Format::Pdf).unwrap();
    assert_eq!(artifact.content_type, "application/pdf");
    assert_eq!(artifact.filename, "Daily_14-05-2024.pdf");
    let artifact = render(&wallet_day(), &conversion(1.0), Format::Csv).unwrap();
    assert_eq!(artifact.content_type, "text/csv");
    assert_eq!(artifact.filename, "Daily_14-05-2024.csv");
}
