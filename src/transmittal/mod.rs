pub mod config;
pub mod export;
pub mod table;

pub use config::{Alignment, ColumnLayout, LayoutConfig, TableLayout, TransmittalConfig};
pub use export::{export_table, sanitize_file_name, DelimitedFileSink, ExportError, ExportReceipt, TableSink};
pub use table::{
    CellLookup, PrimaryDescriptor, SecondaryDescriptor, TransmittalBuilder, TransmittalError,
    TransmittalTable,
};
