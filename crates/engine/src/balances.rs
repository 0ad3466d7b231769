//! Balance engine.
//!
//! Pure functions turning ledger entries and opening snapshots into closing
//! balances. Nothing here touches the store and nothing is cached: every view
//! is re-derived from raw entries on demand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BankSource, Channel, Direction, LedgerEntry, Money};

/// One amount per payment channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAmounts {
    pub cash: Money,
    pub cheque: Money,
    pub card: Money,
}

/// Closing balance of a source on a date, per channel.
pub type ClosingBalances = ChannelAmounts;

impl ChannelAmounts {
    pub const ZERO: ChannelAmounts = ChannelAmounts {
        cash: Money::ZERO,
        cheque: Money::ZERO,
        card: Money::ZERO,
    };

    pub fn get(&self, channel: Channel) -> Money {
        match channel {
            Channel::Cash => self.cash,
            Channel::Cheque => self.cheque,
            Channel::Card => self.card,
        }
    }

    fn slot(&mut self, channel: Channel) -> &mut Money {
        match channel {
            Channel::Cash => &mut self.cash,
            Channel::Cheque => &mut self.cheque,
            Channel::Card => &mut self.card,
        }
    }

    pub fn add(&mut self, channel: Channel, amount: Money) {
        *self.slot(channel) += amount;
    }

    /// Sum of the three channels.
    pub fn total(&self) -> Money {
        self.cash + self.cheque + self.card
    }
}

impl std::ops::Add for ChannelAmounts {
    type Output = ChannelAmounts;

    fn add(self, rhs: ChannelAmounts) -> Self::Output {
        ChannelAmounts {
            cash: self.cash + rhs.cash,
            cheque: self.cheque + rhs.cheque,
            card: self.card + rhs.card,
        }
    }
}

impl From<&BankSource> for ChannelAmounts {
    fn from(source: &BankSource) -> Self {
        Self {
            cash: source.opening_cash,
            cheque: source.opening_cheque,
            card: source.opening_card,
        }
    }
}

/// Totals across every source of a day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandTotal {
    pub per_channel: ChannelAmounts,
    pub total: Money,
}

/// Credits and debits of a set of entries, split by channel.
fn movements<'a, I>(entries: I) -> (ChannelAmounts, ChannelAmounts)
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut credit = ChannelAmounts::ZERO;
    let mut debit = ChannelAmounts::ZERO;
    for entry in entries {
        match entry.direction {
            Direction::Credit => credit.add(entry.channel, entry.total_amount),
            Direction::Debit => debit.add(entry.channel, entry.total_amount),
        }
    }
    (credit, debit)
}

/// Closing balance per channel: opening plus credits minus debits.
///
/// The caller passes the entries of one `(date, source)`; the result does not
/// depend on their order.
pub fn compute_closing<'a, I>(entries: I, opening: &BankSource) -> ClosingBalances
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let (credit, debit) = movements(entries);
    let mut closing = ChannelAmounts::from(opening);
    for channel in Channel::ALL {
        closing.add(channel, credit.get(channel) - debit.get(channel));
    }
    closing
}

/// Sums closings across sources. Each source contributes its closing as is,
/// so a source without entries contributes its opening unchanged.
pub fn aggregate_across_sources(per_source: &[(BankSource, ClosingBalances)]) -> GrandTotal {
    let per_channel = per_source
        .iter()
        .fold(ChannelAmounts::ZERO, |acc, (_, closing)| acc + *closing);
    GrandTotal {
        per_channel,
        total: per_channel.total(),
    }
}

/// Opening, movements and closing of one source on one date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: BankSource,
    pub credit: ChannelAmounts,
    pub debit: ChannelAmounts,
    pub closing: ClosingBalances,
    /// `true` when entries reference the source but no snapshot exists.
    pub implicit: bool,
}

impl SourceSummary {
    pub fn opening(&self) -> ChannelAmounts {
        ChannelAmounts::from(&self.source)
    }
}

/// Builds one summary per snapshot plus one per source name that entries
/// reference without a snapshot (computed against a zero opening).
///
/// Summaries are ordered by source name.
pub fn summarize_day(sources: &[BankSource], entries: &[LedgerEntry]) -> Vec<SourceSummary> {
    let mut by_source: BTreeMap<&str, (Option<&BankSource>, Vec<&LedgerEntry>)> = BTreeMap::new();
    for source in sources {
        by_source.entry(source.source_name.as_str()).or_default().0 = Some(source);
    }
    for entry in entries {
        by_source
            .entry(entry.source_name.as_str())
            .or_default()
            .1
            .push(entry);
    }

    let date = sources
        .first()
        .map(|s| s.date)
        .or_else(|| entries.first().map(|e| e.date));

    by_source
        .into_iter()
        .filter_map(|(name, (source, entries))| {
            let implicit = source.is_none();
            let source = match source {
                Some(source) => source.clone(),
                None => BankSource::zero(date?, name),
            };
            let (credit, debit) = movements(entries.iter().copied());
            let closing = compute_closing(entries.iter().copied(), &source);
            Some(SourceSummary {
                source,
                credit,
                debit,
                closing,
                implicit,
            })
        })
        .collect()
}

/// Grand total of a set of summaries.
pub fn grand_total(summaries: &[SourceSummary]) -> GrandTotal {
    let pairs: Vec<(BankSource, ClosingBalances)> = summaries
        .iter()
        .map(|s| (s.source.clone(), s.closing))
        .collect();
    aggregate_across_sources(&pairs)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::UnitType;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn entry(id: i64, source: &str, cents: i64, direction: Direction, channel: Channel) -> LedgerEntry {
        LedgerEntry {
            id,
            date: day(),
            source_name: source.to_string(),
            person_name: String::new(),
            category: "Others".to_string(),
            item_name: format!("item {id}"),
            note: String::new(),
            quantity: 0.0,
            unit: UnitType::NotApplicable,
            unit_price: Money::new(cents),
            total_amount: Money::new(cents),
            direction,
            channel,
            created_at: Utc::now(),
        }
    }

    fn wallet_scenario() -> (BankSource, Vec<LedgerEntry>) {
        let opening = BankSource::new(
            day(),
            "Cash-Wallet",
            Money::new(10_000),
            Money::ZERO,
            Money::ZERO,
        );
        let entries = vec![
            entry(1, "Cash-Wallet", 5_000, Direction::Credit, Channel::Cash),
            entry(2, "Cash-Wallet", 2_000, Direction::Debit, Channel::Cash),
            entry(3, "Cash-Wallet", 3_000, Direction::Credit, Channel::Cheque),
        ];
        (opening, entries)
    }

    #[test]
    fn cash_wallet_scenario() {
        let (opening, entries) = wallet_scenario();
        let closing = compute_closing(&entries, &opening);
        assert_eq!(closing.cash, Money::new(13_000));
        assert_eq!(closing.cheque, Money::new(3_000));
        assert_eq!(closing.card, Money::ZERO);

        let total = aggregate_across_sources(&[(opening, closing)]);
        assert_eq!(total.total, Money::new(16_000));
    }

    #[test]
    fn closing_is_order_independent() {
        let (opening, entries) = wallet_scenario();
        let expected = compute_closing(&entries, &opening);
        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in permutations {
            let shuffled: Vec<LedgerEntry> = order.iter().map(|i| entries[*i].clone()).collect();
            assert_eq!(compute_closing(&shuffled, &opening), expected);
        }
    }

    #[test]
    fn channel_totals_match_net_movements() {
        let opening = BankSource::new(day(), "Bank", Money::new(123), Money::new(456), Money::new(789));
        let entries = vec![
            entry(1, "Bank", 1_001, Direction::Credit, Channel::Card),
            entry(2, "Bank", 333, Direction::Debit, Channel::Cheque),
            entry(3, "Bank", 7, Direction::Debit, Channel::Cash),
            entry(4, "Bank", 99_999, Direction::Credit, Channel::Cash),
        ];
        let closing = compute_closing(&entries, &opening);
        let credits: Money = entries
            .iter()
            .filter(|e| e.direction == Direction::Credit)
            .map(|e| e.total_amount)
            .sum();
        let debits: Money = entries
            .iter()
            .filter(|e| e.direction == Direction::Debit)
            .map(|e| e.total_amount)
            .sum();
        assert_eq!(
            closing.total(),
            ChannelAmounts::from(&opening).total() + credits - debits
        );
    }

    #[test]
    fn sources_without_entries_keep_their_opening() {
        let a = BankSource::new(day(), "A", Money::new(100), Money::new(200), Money::new(300));
        let b = BankSource::new(day(), "B", Money::new(5), Money::ZERO, Money::new(1));
        let pairs: Vec<_> = [a, b]
            .into_iter()
            .map(|s| {
                let closing = compute_closing(std::iter::empty(), &s);
                (s, closing)
            })
            .collect();
        let total = aggregate_across_sources(&pairs);
        assert_eq!(total.per_channel.cash, Money::new(105));
        assert_eq!(total.per_channel.cheque, Money::new(200));
        assert_eq!(total.per_channel.card, Money::new(301));
        assert_eq!(total.total, Money::new(606));
    }

    #[test]
    fn orphan_entries_use_zero_opening() {
        let entries = vec![entry(1, "Ghost", 2_500, Direction::Debit, Channel::Card)];
        let summaries = summarize_day(&[], &entries);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].implicit);
        assert_eq!(summaries[0].closing.card, Money::new(-2_500));
        assert_eq!(grand_total(&summaries).total, Money::new(-2_500));
    }

    #[test]
    fn unrecognized_stored_channel_counts_as_cash() {
        let opening = BankSource::zero(day(), "Bank");
        let mut odd = entry(1, "Bank", 4_200, Direction::Credit, Channel::Card);
        odd.channel = Channel::from_stored(Some("CRYPTO"));
        let closing = compute_closing(&[odd], &opening);
        assert_eq!(closing.cash, Money::new(4_200));
        assert_eq!(closing.card, Money::ZERO);
    }

    #[test]
    fn summaries_are_sorted_and_split_by_source() {
        let sources = vec![
            BankSource::new(day(), "Zeta", Money::new(1_000), Money::ZERO, Money::ZERO),
            BankSource::new(day(), "Alpha", Money::ZERO, Money::new(1_000), Money::ZERO),
        ];
        let entries = vec![
            entry(1, "Zeta", 100, Direction::Debit, Channel::Cash),
            entry(2, "Alpha", 100, Direction::Credit, Channel::Cheque),
        ];
        let summaries = summarize_day(&sources, &entries);
        let names: Vec<_> = summaries.iter().map(|s| s.source.source_name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Zeta"]);
        assert_eq!(summaries[0].closing.cheque, Money::new(1_100));
        assert_eq!(summaries[1].closing.cash, Money::new(900));
        assert_eq!(summaries[1].debit.cash, Money::new(100));
    }
}
