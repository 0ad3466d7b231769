//! Paginated-document encoding.

use chrono::NaiveDate;
use engine::{
    BankSource, Channel, Conversion, Direction, FlowTotals, HistoryItem, LedgerEntry, Money,
    TransferEntry,
};

use crate::{
    ReportSnapshot,
    snapshot::{
        DailyReport, converted, direction_mark, history_totals, person_name, transfer_totals,
    },
};

use layout::{CONTENT_WIDTH, Layout, MARGIN_LEFT, Style};
use writer::Rgb;

mod layout;
mod metrics;
mod writer;

pub use layout::wrap;
pub use metrics::text_width;

/// Width reserved for the wrapped description of an item row; the converted
/// price sits right-aligned beside it.
const ITEM_TEXT_WIDTH: f32 = 300.0;

/// Renders `snapshot` as a PDF document.
pub fn render_document(snapshot: &ReportSnapshot, conversion: &Conversion) -> Vec<u8> {
    let mut layout = Layout::new();
    match snapshot {
        ReportSnapshot::Daily {
            date,
            entries,
            sources,
        } => daily(&mut layout, *date, entries, sources, conversion),
        ReportSnapshot::Accounts { date, transfers } => {
            accounts(&mut layout, *date, transfers, conversion)
        }
        ReportSnapshot::History { start, end, items } => {
            history(&mut layout, *start, *end, items, conversion)
        }
    }
    writer::finish(&layout.into_pages())
}

fn header(layout: &mut Layout, title: &str, subtitle: &str, conversion: &Conversion) {
    layout.paragraph(MARGIN_LEFT, CONTENT_WIDTH, Style::bold(16.0), title);
    layout.gap(10.0);
    layout.paragraph(MARGIN_LEFT, CONTENT_WIDTH, Style::regular(12.0), subtitle);
    layout.paragraph(
        MARGIN_LEFT,
        CONTENT_WIDTH,
        Style::regular(12.0).color(Rgb::DARK_GRAY),
        &format!("Rate: {}", conversion.describe()),
    );
    layout.gap(20.0);
}

fn amount_color(direction: Direction) -> Rgb {
    match direction {
        Direction::Credit => Rgb::GREEN,
        Direction::Debit => Rgb::RED,
    }
}

/// `USD 12.00 / INR 1002.00 (+)`
fn price_text(conversion: &Conversion, amount: Money, direction: Direction) -> String {
    format!(
        "{} {} / {} {} {}",
        conversion.base,
        amount,
        conversion.target,
        converted(conversion, amount),
        direction_mark(direction)
    )
}

fn daily(
    layout: &mut Layout,
    date: NaiveDate,
    entries: &[LedgerEntry],
    sources: &[BankSource],
    conversion: &Conversion,
) {
    let report = DailyReport::build(entries, sources);
    header(
        layout,
        &format!("Daily Report ({})", conversion.base),
        &format!(
            "Name: {} | Date: {} ({})",
            person_name(entries),
            date.format("%d/%m/%Y"),
            date.format("%A")
        ),
        conversion,
    );

    for section in &report.sections {
        let summary = &section.summary;
        layout.rule(2.0, Rgb::NAVY);
        layout.gap(10.0);
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            Style::bold(14.0).color(Rgb::NAVY),
            &format!("BANK: {}", summary.source.source_name),
        );
        let opening = summary.opening();
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            Style::regular(11.0),
            &format!(
                "Op Cash: {} | Op Chq: {} | Op Card: {}",
                opening.cash, opening.cheque, opening.card
            ),
        );
        layout.gap(15.0);

        for group in &section.categories {
            layout.paragraph(
                MARGIN_LEFT,
                CONTENT_WIDTH,
                Style::bold(13.0).color(Rgb::BLUE),
                group.name,
            );
            for entry in &group.entries {
                let info = if entry.note.trim().is_empty() {
                    String::new()
                } else {
                    format!(" ({})", entry.note.trim())
                };
                let description = format!(
                    "{}{} | {} {} | [{}]",
                    entry.item_name,
                    info,
                    entry.quantity,
                    entry.unit.as_str(),
                    entry.channel.label()
                );
                let price = price_text(conversion, entry.total_amount, entry.direction);
                layout.split_line(
                    ITEM_TEXT_WIDTH,
                    (Style::regular(10.0), &description),
                    (
                        Style::regular(10.0).color(amount_color(entry.direction)),
                        &price,
                    ),
                );
            }
            let net = group.net();
            layout.split_line(
                ITEM_TEXT_WIDTH,
                (Style::bold(10.0), "Subtotal (net)"),
                (
                    Style::bold(10.0),
                    &format!(
                        "{} {} / {} {}",
                        conversion.base,
                        net,
                        conversion.target,
                        converted(conversion, net)
                    ),
                ),
            );
            layout.gap(10.0);
        }

        layout.gap(5.0);
        layout.rule(1.0, Rgb::BLACK);
        layout.gap(10.0);
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            Style::bold(12.0),
            &format!("CLOSING SUMMARY ({}):", summary.source.source_name),
        );
        for channel in Channel::ALL {
            layout.paragraph(
                MARGIN_LEFT,
                CONTENT_WIDTH,
                Style::regular(11.0),
                &format!(
                    "{}: opening {} + credit {} - debit {} = closing {}",
                    channel.label(),
                    opening.get(channel),
                    summary.credit.get(channel),
                    summary.debit.get(channel),
                    summary.closing.get(channel)
                ),
            );
        }
        layout.gap(30.0);
    }

    let total = report.grand_total;
    layout.rule(2.0, Rgb::BLACK);
    layout.gap(10.0);
    layout.paragraph(
        MARGIN_LEFT,
        CONTENT_WIDTH,
        Style::regular(11.0),
        &format!(
            "Cash: {} | Cheque: {} | Card: {}",
            total.per_channel.cash, total.per_channel.cheque, total.per_channel.card
        ),
    );
    layout.paragraph(
        MARGIN_LEFT,
        CONTENT_WIDTH,
        Style::bold(13.0),
        &format!(
            "GRAND TOTAL: {} {} / {} {}",
            conversion.base,
            total.total,
            conversion.target,
            converted(conversion, total.total)
        ),
    );
}

fn flow_totals(layout: &mut Layout, totals: FlowTotals, conversion: &Conversion) {
    layout.rule(1.0, Rgb::BLACK);
    layout.gap(10.0);
    for (label, amount) in [
        ("TOTAL CREDIT", totals.credit),
        ("TOTAL DEBIT", totals.debit),
        ("NET", totals.net()),
    ] {
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            Style::bold(12.0),
            &format!(
                "{label}: {} {} / {} {}",
                conversion.base,
                amount,
                conversion.target,
                converted(conversion, amount)
            ),
        );
    }
}

fn accounts(
    layout: &mut Layout,
    date: NaiveDate,
    transfers: &[TransferEntry],
    conversion: &Conversion,
) {
    header(
        layout,
        &format!("Account Tx ({})", conversion.base),
        &format!("Date: {}", date.format("%d/%m/%Y")),
        conversion,
    );
    let detail = Style::regular(10.0).color(Rgb::DARK_GRAY);
    for t in transfers {
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            detail,
            &format!(
                "FROM: {} | {} | {}",
                t.from_holder, t.from_source, t.from_account_ref
            ),
        );
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            detail,
            &format!("TO: {} | {} | {}", t.to_holder, t.to_source, t.to_account_ref),
        );
        layout.paragraph(
            MARGIN_LEFT,
            CONTENT_WIDTH,
            Style::bold(10.0).color(amount_color(t.direction)),
            &format!(
                "{} {} {} => {} {} [{}]",
                t.direction.sign(),
                conversion.base,
                t.amount,
                conversion.target,
                converted(conversion, t.amount),
                t.channel.label()
            ),
        );
        layout.gap(5.0);
        layout.rule(0.5, Rgb::BLACK);
        layout.gap(5.0);
    }
    flow_totals(layout, transfer_totals(transfers), conversion);
}

fn history(
    layout: &mut Layout,
    start: NaiveDate,
    end: NaiveDate,
    items: &[HistoryItem],
    conversion: &Conversion,
) {
    header(
        layout,
        &format!("Monthly Report ({})", conversion.base),
        &format!(
            "Period: {} - {}",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        ),
        conversion,
    );
    let mut current: Option<NaiveDate> = None;
    for item in items {
        if current != Some(item.date()) {
            current = Some(item.date());
            layout.gap(5.0);
            layout.paragraph(
                MARGIN_LEFT,
                CONTENT_WIDTH,
                Style::bold(12.0).color(Rgb::NAVY),
                &item.date().format("%d/%m/%Y %A").to_string(),
            );
        }
        let description = match item {
            HistoryItem::Expense(e) => format!(
                "{} | {} | {} | [{}]",
                e.item_name,
                e.category,
                e.source_name,
                e.channel.label()
            ),
            HistoryItem::Transfer(t) => format!(
                "Transfer {} -> {} | {} | [{}]",
                t.from_holder,
                t.to_holder,
                t.from_source,
                t.channel.label()
            ),
        };
        let price = price_text(conversion, item.amount(), item.direction());
        layout.split_line(
            ITEM_TEXT_WIDTH,
            (Style::regular(10.0), &description),
            (
                Style::regular(10.0).color(amount_color(item.direction())),
                &price,
            ),
        );
    }
    layout.gap(10.0);
    flow_totals(layout, history_totals(items), conversion);
}
