//! fitplan-qa library - class sequence quality checks
//!
//! - [`analysis`]: muscle-group proximity analysis for ordered sequences
//! - [`report`]: Markdown and JSON rendering of analysis results
//! - [`service`]: QA reports for stored classes
//! - [`tools`]: tool capability contract and registry

pub mod analysis;
pub mod report;
pub mod service;
pub mod tools;

pub use analysis::{SequenceQualityAnalyzer, SequenceReport};
pub use report::ClassQaReport;
pub use service::ClassQaService;
pub use tools::{default_registry, Tool, ToolRegistry};
