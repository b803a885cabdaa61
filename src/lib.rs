//! Keyed selection and cross-tabulation engine.
//!
//! `keyed-core` pairs keys with values, buckets grouped entries under group
//! keys with bounds-checked access, drives filtered single/multi pick lists,
//! and correlates two keyed sequences into a rectangular transmittal table
//! ready for export. Every build is a pure function of its inputs.

pub mod keyed;
pub mod selection;
pub mod transmittal;
pub mod types;

pub use keyed::{build_entries, build_matrix, Entry, GroupedEntry, Matrix, MatrixError};
pub use selection::{DisplayRow, Matcher, SelectionSession, SubstringMatcher};
pub use transmittal::{
    export_table, DelimitedFileSink, PrimaryDescriptor, SecondaryDescriptor, TableSink,
    TransmittalBuilder, TransmittalConfig, TransmittalTable,
};
pub use types::{SecondaryId, SelectionMode, SelectionOutcome, Slot, TableVersion};
