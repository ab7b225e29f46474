//! Trade records, datasets and the record normalizer.
//!
//! Source documents are JSON objects:
//!
//! ```json
//! {
//!   "considering_timeframes": ["1h", "4h"],
//!   "trades": [
//!     {"id": "1", "strategy_name": "breakout", "symbol": "BTC-USDT", "exchange": "bybit",
//!      "type": "long", "entry_price": 100.0, "exit_price": 110.0, "qty": 1, "fee": 0.5,
//!      "size": 100, "PNL": 9.5, "PNL_percentage": 9.5, "holding_period": 3600,
//!      "opened_at": 1704067200000, "closed_at": 1704070800000}
//!   ]
//! }
//! ```

mod error;
mod loader;
mod normalizer;
mod record;
mod report;

pub use error::{DocumentError, LoadError};
pub use loader::{load_dir, read_documents};
pub use normalizer::{SourceDocument, fingerprint, normalize};
pub use record::{Dataset, DatasetId, Side, TradeRecord};
pub use report::{DocumentFailure, DroppedRecord, NormalizationReport};
