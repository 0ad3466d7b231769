//! Delimited-text encoding.

use chrono::NaiveDate;
use csv::{Writer, WriterBuilder};
use engine::{
    BankSource, Channel, Conversion, FlowTotals, HistoryItem, LedgerEntry, Money, TransferEntry,
};

use crate::{
    ReportError, ReportSnapshot,
    snapshot::{DailyReport, converted, history_totals, person_name, transfer_totals},
};

type CsvOut = Writer<Vec<u8>>;

/// Renders `snapshot` as comma separated UTF-8 text.
pub fn render_delimited(
    snapshot: &ReportSnapshot,
    conversion: &Conversion,
) -> Result<Vec<u8>, ReportError> {
    let mut out = WriterBuilder::new().flexible(true).from_writer(vec![]);
    match snapshot {
        ReportSnapshot::Daily {
            date,
            entries,
            sources,
        } => daily(&mut out, *date, entries, sources, conversion)?,
        ReportSnapshot::Accounts { date, transfers } => {
            accounts(&mut out, *date, transfers, conversion)?
        }
        ReportSnapshot::History { start, end, items } => {
            history(&mut out, *start, *end, items, conversion)?
        }
    }
    Ok(out.into_inner()?)
}

/// Text fields never carry the separator.
fn safe(text: &str) -> String {
    text.replace(',', " ")
}

fn rate_line(out: &mut CsvOut, conversion: &Conversion) -> Result<(), ReportError> {
    out.write_record(["Rate", conversion.describe().as_str()])?;
    Ok(())
}

fn blank(out: &mut CsvOut) -> Result<(), ReportError> {
    out.write_record([""])?;
    Ok(())
}

fn daily(
    out: &mut CsvOut,
    date: NaiveDate,
    entries: &[LedgerEntry],
    sources: &[BankSource],
    conversion: &Conversion,
) -> Result<(), ReportError> {
    let report = DailyReport::build(entries, sources);
    let base = conversion.base.code();
    let target = conversion.target.code();

    out.write_record(["Daily Expense Report"])?;
    out.write_record(["Person Name", safe(person_name(entries)).as_str()])?;
    out.write_record(["Date", date.format("%d/%m/%Y").to_string().as_str()])?;
    out.write_record(["Day", date.format("%A").to_string().as_str()])?;
    rate_line(out, conversion)?;
    blank(out)?;

    for section in &report.sections {
        let summary = &section.summary;
        let name = safe(&summary.source.source_name);
        out.write_record([format!("BANK SOURCE: {name}")])?;
        for channel in Channel::ALL {
            out.write_record([
                format!("Opening {}", channel.label()),
                summary.opening().get(channel).to_string(),
            ])?;
        }
        out.write_record([
            "Category".to_string(),
            "Item Name".to_string(),
            "Additional Info".to_string(),
            "Qty".to_string(),
            "Unit".to_string(),
            format!("Price ({base})"),
            format!("Price ({target})"),
            "Type".to_string(),
            "Mode".to_string(),
        ])?;

        for group in &section.categories {
            for entry in &group.entries {
                out.write_record([
                    safe(&entry.category),
                    safe(&entry.item_name),
                    safe(&entry.note),
                    entry.quantity.to_string(),
                    entry.unit.as_str().to_string(),
                    entry.total_amount.to_string(),
                    converted(conversion, entry.total_amount).to_string(),
                    entry.direction.as_str().to_string(),
                    entry.channel.label().to_string(),
                ])?;
            }
            let net = group.net();
            out.write_record([
                safe(group.name),
                "SUBTOTAL (net)".to_string(),
                String::new(),
                String::new(),
                String::new(),
                net.to_string(),
                converted(conversion, net).to_string(),
            ])?;
        }

        out.write_record([String::new(), format!("CLOSING SUMMARY ({name})")])?;
        for channel in Channel::ALL {
            out.write_record([
                String::new(),
                channel.label().to_string(),
                "Opening:".to_string(),
                summary.opening().get(channel).to_string(),
                "Credit:".to_string(),
                summary.credit.get(channel).to_string(),
                "Debit:".to_string(),
                summary.debit.get(channel).to_string(),
                "Closing:".to_string(),
                summary.closing.get(channel).to_string(),
            ])?;
        }
        blank(out)?;
    }

    let total = report.grand_total;
    out.write_record([
        "GRAND TOTAL".to_string(),
        "Cash".to_string(),
        total.per_channel.cash.to_string(),
        "Cheque".to_string(),
        total.per_channel.cheque.to_string(),
        "Card".to_string(),
        total.per_channel.card.to_string(),
        format!("Total ({base})"),
        total.total.to_string(),
        format!("Total ({target})"),
        converted(conversion, total.total).to_string(),
    ])?;
    Ok(())
}

fn flow_totals(
    out: &mut CsvOut,
    totals: FlowTotals,
    conversion: &Conversion,
) -> Result<(), ReportError> {
    let rows: [(&str, Money); 3] = [
        ("TOTAL CREDIT", totals.credit),
        ("TOTAL DEBIT", totals.debit),
        ("NET", totals.net()),
    ];
    for (label, amount) in rows {
        out.write_record([
            label.to_string(),
            amount.to_string(),
            converted(conversion, amount).to_string(),
        ])?;
    }
    Ok(())
}

fn accounts(
    out: &mut CsvOut,
    date: NaiveDate,
    transfers: &[TransferEntry],
    conversion: &Conversion,
) -> Result<(), ReportError> {
    let base = conversion.base.code();
    let target = conversion.target.code();

    out.write_record(["Account Transactions"])?;
    out.write_record(["Date", date.format("%d/%m/%Y").to_string().as_str()])?;
    rate_line(out, conversion)?;
    blank(out)?;
    out.write_record([
        "From Holder".to_string(),
        "From Bank".to_string(),
        "From Acc".to_string(),
        "To Beneficiary".to_string(),
        "To Bank".to_string(),
        "To Acc".to_string(),
        format!("Amt ({base})"),
        format!("Amt ({target})"),
        "Type".to_string(),
        "Mode".to_string(),
    ])?;
    for t in transfers {
        // Leading quote keeps spreadsheets from reading account numbers as numbers.
        out.write_record([
            safe(&t.from_holder),
            safe(&t.from_source),
            format!("'{}", safe(&t.from_account_ref)),
            safe(&t.to_holder),
            safe(&t.to_source),
            format!("'{}", safe(&t.to_account_ref)),
            t.amount.to_string(),
            converted(conversion, t.amount).to_string(),
            t.direction.as_str().to_string(),
            t.channel.label().to_string(),
        ])?;
    }
    blank(out)?;
    flow_totals(out, transfer_totals(transfers), conversion)
}

fn history(
    out: &mut CsvOut,
    start: NaiveDate,
    end: NaiveDate,
    items: &[HistoryItem],
    conversion: &Conversion,
) -> Result<(), ReportError> {
    let base = conversion.base.code();
    let target = conversion.target.code();

    out.write_record(["Monthly Report"])?;
    out.write_record([
        "Period".to_string(),
        format!("{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y")),
    ])?;
    rate_line(out, conversion)?;
    blank(out)?;
    out.write_record([
        "Date".to_string(),
        "Day".to_string(),
        "Kind".to_string(),
        "Description".to_string(),
        "Source".to_string(),
        format!("Amt ({base})"),
        format!("Amt ({target})"),
        "Type".to_string(),
        "Mode".to_string(),
    ])?;
    for item in items {
        let (kind, source) = match item {
            HistoryItem::Expense(e) => ("Expense", e.source_name.as_str()),
            HistoryItem::Transfer(t) => ("Transfer", t.from_source.as_str()),
        };
        out.write_record([
            item.date().format("%d/%m/%Y").to_string(),
            item.date().format("%A").to_string(),
            kind.to_string(),
            safe(&item.label()),
            safe(source),
            item.amount().to_string(),
            converted(conversion, item.amount()).to_string(),
            item.direction().as_str().to_string(),
            item.channel().label().to_string(),
        ])?;
    }
    blank(out)?;
    flow_totals(out, history_totals(items), conversion)
}
