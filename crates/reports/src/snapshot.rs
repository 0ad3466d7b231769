//! What a report is rendered from, and the numbers both encodings share.
//!
//! Every amount printed by either encoding is computed here, once, so the
//! CSV and the PDF of the same snapshot can never disagree.

use chrono::NaiveDate;
use engine::{
    BankSource, Conversion, Direction, FlowTotals, GrandTotal, HistoryItem, LedgerEntry, Money,
    SourceSummary, TransferEntry, grand_total, summarize_day,
};

/// The records a report is built from.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportSnapshot {
    /// Entries and opening snapshots of one date.
    Daily {
        date: NaiveDate,
        entries: Vec<LedgerEntry>,
        sources: Vec<BankSource>,
    },
    /// Transfers of one date.
    Accounts {
        date: NaiveDate,
        transfers: Vec<TransferEntry>,
    },
    /// Merged history of a range, newest first.
    History {
        start: NaiveDate,
        end: NaiveDate,
        items: Vec<HistoryItem>,
    },
}

impl ReportSnapshot {
    /// `true` when there is nothing worth exporting.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Daily {
                entries, sources, ..
            } => entries.is_empty() && sources.is_empty(),
            Self::Accounts { transfers, .. } => transfers.is_empty(),
            Self::History { items, .. } => items.is_empty(),
        }
    }

    /// File name without extension.
    pub fn file_stem(&self) -> String {
        match self {
            Self::Daily { date, .. } => format!("Daily_{}", date.format("%d-%m-%Y")),
            Self::Accounts { date, .. } => format!("Accounts_{}", date.format("%d-%m-%Y")),
            Self::History { start, .. } => format!("Monthly_{}", start.format("%m-%Y")),
        }
    }
}

/// Converted amount as printed next to the base amount.
pub fn converted(conversion: &Conversion, amount: Money) -> Money {
    conversion.convert(amount)
}

/// Entries of one category inside a source block.
#[derive(Debug)]
pub(crate) struct CategoryGroup<'a> {
    pub name: &'a str,
    pub entries: Vec<&'a LedgerEntry>,
}

impl CategoryGroup<'_> {
    /// Credits minus debits of the group.
    pub fn net(&self) -> Money {
        self.entries.iter().map(|e| e.signed_amount()).sum()
    }
}

/// One source block of the daily report.
#[derive(Debug)]
pub(crate) struct SourceSection<'a> {
    pub summary: SourceSummary,
    pub categories: Vec<CategoryGroup<'a>>,
}

/// Daily report layout: source blocks in name order, categories in order of
/// first appearance, and the grand total.
#[derive(Debug)]
pub(crate) struct DailyReport<'a> {
    pub sections: Vec<SourceSection<'a>>,
    pub grand_total: GrandTotal,
}

impl<'a> DailyReport<'a> {
    pub fn build(entries: &'a [LedgerEntry], sources: &[BankSource]) -> Self {
        let summaries = summarize_day(sources, entries);
        let grand_total = grand_total(&summaries);
        let sections = summaries
            .into_iter()
            .map(|summary| {
                let mut categories: Vec<CategoryGroup<'a>> = Vec::new();
                for entry in entries
                    .iter()
                    .filter(|e| e.source_name == summary.source.source_name)
                {
                    match categories.iter_mut().find(|g| g.name == entry.category) {
                        Some(group) => group.entries.push(entry),
                        None => categories.push(CategoryGroup {
                            name: &entry.category,
                            entries: vec![entry],
                        }),
                    }
                }
                SourceSection {
                    summary,
                    categories,
                }
            })
            .collect();
        Self {
            sections,
            grand_total,
        }
    }
}

/// First non-blank person name of the day, as the report owner.
pub(crate) fn person_name(entries: &[LedgerEntry]) -> &str {
    entries
        .iter()
        .map(|e| e.person_name.trim())
        .find(|name| !name.is_empty())
        .unwrap_or("Unknown")
}

pub(crate) fn transfer_totals(transfers: &[TransferEntry]) -> FlowTotals {
    let mut totals = FlowTotals::default();
    for transfer in transfers {
        totals.push(transfer.direction, transfer.amount);
    }
    totals
}

pub(crate) fn history_totals(items: &[HistoryItem]) -> FlowTotals {
    let mut totals = FlowTotals::default();
    for item in items {
        totals.push(item.direction(), item.amount());
    }
    totals
}

/// `(+)` / `(-)` marker used next to amounts.
pub(crate) fn direction_mark(direction: Direction) -> &'static str {
    match direction {
        Direction::Credit => "(+)",
        Direction::Debit => "(-)",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use engine::{Channel, UnitType};

    use super::*;

    fn entry(id: i64, source: &str, category: &str, cents: i64, direction: Direction) -> LedgerEntry {
        LedgerEntry {
            id,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            source_name: source.to_string(),
            person_name: if id == 2 { "Asha".to_string() } else { String::new() },
            category: category.to_string(),
            item_name: format!("item {id}"),
            note: String::new(),
            quantity: 1.0,
            unit: UnitType::Piece,
            unit_price: Money::new(cents),
            total_amount: Money::new(cents),
            direction,
            channel: Channel::Cash,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let entries = vec![
            entry(1, "Bank", "Snacks & Fruit", 100, Direction::Debit),
            entry(2, "Bank", "Rent", 5_000, Direction::Debit),
            entry(3, "Bank", "Snacks & Fruit", 40, Direction::Credit),
            entry(4, "Wallet", "Rent", 10, Direction::Debit),
        ];
        let report = DailyReport::build(&entries, &[]);
        assert_eq!(report.sections.len(), 2);
        let bank = &report.sections[0];
        let names: Vec<_> = bank.categories.iter().map(|g| g.name).collect();
        assert_eq!(names, ["Snacks & Fruit", "Rent"]);
        assert_eq!(bank.categories[0].net(), Money::new(-60));
        assert_eq!(report.grand_total.total, Money::new(-5_070));
        assert_eq!(person_name(&entries), "Asha");
    }

    #[test]
    fn emptiness_follows_the_screen() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let daily = ReportSnapshot::Daily {
            date,
            entries: vec![],
            sources: vec![BankSource::zero(date, "Bank")],
        };
        assert!(!daily.is_empty());
        assert_eq!(daily.file_stem(), "Daily_09-03-2024");
        let accounts = ReportSnapshot::Accounts {
            date,
            transfers: vec![],
        };
        assert!(accounts.is_empty());
        let history = ReportSnapshot::History {
            start: date,
            end: date,
            items: vec![],
        };
        assert_eq!(history.file_stem(), "Monthly_03-2024");
    }
}
