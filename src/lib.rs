// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod logging;

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod format;
pub mod runner;
pub mod specs;

#[cfg(feature = "cli")]
pub mod cli;

pub use data::ActivityRecord;
pub use error::ScrapeError;
pub use format::{Envelope, Payload, build_envelope};
pub use specs::{ActivityPage, DiaryFeed, Extractor, SourceKind};
