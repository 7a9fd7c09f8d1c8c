//! COSHH assessment and substance register documents.
//!
//! [`report::ReportGenerator`] is the entry point: it fetches the company
//! letterhead, resolves PPE and hazard pictograms from object storage, lays
//! out every section across as many pages as it needs and returns the PDF as
//! a `data:` URL.

pub mod config;
pub mod embed;
pub mod error;
pub mod fields;
pub mod header;
pub mod icons;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod report;
pub mod routes;
pub mod sections;
pub mod settings;
pub mod sink;
pub mod storage;
pub mod table;
pub mod text;
pub mod theme;
