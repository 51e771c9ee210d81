pub mod report;

pub use report::{fetch_report, DateRange, Report, ReportKind};
