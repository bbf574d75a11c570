//! Run summary collection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                    Registry                      │
//! │  ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  LastRunCollector    │   │   build_info    │  │
//! │  │  - DescriptorSet     │   └─────────────────┘  │
//! │  │  - scrape lock       │                        │
//! │  └──────────┬───────────┘                        │
//! │      ┌──────▼──────┐                             │
//! │      │ReportLoader │                             │
//! │      └──────┬──────┘                             │
//! │      ┌──────▼──────┐                             │
//! │      │  FileSystem │ (trait)                     │
//! │      └──────┬──────┘                             │
//! └─────────────┼────────────────────────────────────┘
//!        ┌──────┴──────┐
//!  ┌─────▼─────┐ ┌─────▼─────┐
//!  │  RealFs   │ │  MockFs   │
//!  └───────────┘ └───────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use lastrun_core::collector::{MockFs, build_registry};
//! use lastrun_core::report::ReportLoader;
//!
//! let fs = MockFs::typical_run();
//! let loader = ReportLoader::new(fs, MockFs::REPORT_PATH);
//! let registry = build_registry(loader, "puppet_last_run_exporter").unwrap();
//! assert!(!registry.gather().is_empty());
//! ```

mod build_info;
#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
mod registry;
pub mod traits;

pub use build_info::build_info;
pub use collector::{LastRunCollector, Sample};
pub use mock::MockFs;
pub use registry::build_registry;
pub use traits::{FileSystem, RealFs};
