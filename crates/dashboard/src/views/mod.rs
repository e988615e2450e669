//! Render targets. Each one is rebuilt from the latest server response and
//! keeps no state of its own beyond that (and, for the table, a cursor).

pub mod charts;
pub mod summary;
pub mod table;

pub use charts::{CanvasId, ChartHandle, ChartRegistry, ChartSlot, ChartSpec, ChartSurface};
pub use summary::SummaryPanel;
pub use table::{TransactionRow, TransactionTable};
