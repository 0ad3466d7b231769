//! Day-scoped ledger: entries against named sources, transfers, opening
//! snapshots, and the balances derived from them.

pub use balances::{
    ChannelAmounts, ClosingBalances, GrandTotal, SourceSummary, aggregate_across_sources,
    compute_closing, grand_total, summarize_day,
};
pub use channels::{Channel, Direction};
pub use currency::{AVAILABLE_CURRENCIES, Conversion, CurrencyCode};
pub use entries::{LedgerEntry, NewLedgerEntry, UnitType};
pub use error::EngineError;
pub use history::{
    FlowTotals, HistoryItem, MAX_HISTORY_DAYS, check_range, month_of, month_range,
};
pub use money::Money;
pub use ops::{
    DailyView, DayRecords, HistoryCursor, HistoryFeed, Ledger, LedgerBuilder, NewRecord, Record,
    RecordRef,
};
pub use rates::{CurrencyService, CurrencySettings, FixedRate, QuoteCache, QuoteKey, RateSource};
pub use sources::BankSource;
pub use transfers::{NewTransfer, TransferEntry};
pub use watch::{ChangeKind, DaySubscription, LedgerChange};

mod balances;
mod channels;
mod currency;
mod entries;
mod error;
mod history;
mod locks;
mod money;
mod ops;
mod rates;
mod sources;
mod transfers;
mod watch;

pub type ResultEngine<T> = Result<T, EngineError>;

/// Categories offered even before any entry uses them.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Home Expenses",
    "Snacks & Fruit",
    "Utilities",
    "CNG/Petrol",
    "Assets",
    "Medical Expenses",
    "Education Expenses",
    "Rent",
    "Loans",
    "Others",
];
