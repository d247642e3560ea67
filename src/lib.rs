//! Calendar, Gantt and Kanban layout for projects, weekly workplans and
//! tasks.
//!
//! - [`dates`] buckets records into days, weeks and months
//! - [`layout`] turns a window and records into Gantt geometry
//! - [`board`] groups records into status columns and handles drag moves
//! - [`view`] holds the calendar and Gantt view modes
//!
//! [`dataset`], [`storage`] and [`config`] are the host side: where records
//! come from and where status changes go.

pub mod board;
pub mod config;
pub mod dataset;
pub mod dates;
pub mod layout;
pub mod model;
pub mod status;
pub mod storage;
pub mod summary;
pub mod view;

pub use board::{group_by_status, Board, DragState, StatusChange};
pub use dataset::Dataset;
pub use model::{DateSpan, Record, RecordError};
pub use status::{canonical_column_order, RecordKind, Status, Tone};
