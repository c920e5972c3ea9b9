//! Output generation for extracted listings.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── azattyk.json
//!     ├── rt.json
//!     └── vesti.json
//! ```
//!
//! Without an output directory the pages are printed to stdout instead.

pub mod json;
