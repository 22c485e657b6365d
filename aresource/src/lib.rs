#![forbid(unsafe_code)]
//! Android string resource toolkit for Rust.
//!
//! The values stored in `strings.xml` are escaped: whitespace collapses
//! outside double quotes, quotes themselves disappear and backslash escapes
//! stand in for newlines, tabs, apostrophes and unicode characters. This crate
//! converts between that storage text and the logical value a translator
//! edits, and provides a small store for whole resource files.
//!
//! # Quick Start
//!
//! ```rust
//! use aresource::{AndroidResourceFile, traits::Parser};
//!
//! let xml = r#"<resources><string name="greeting">"Hello,   %s!"</string></resources>"#;
//! let mut file = AndroidResourceFile::from_str(xml)?;
//!
//! let unit = file.find_id("greeting").unwrap();
//! assert_eq!(unit.target()?.as_deref(), Some("Hello,   %s!"));
//! assert!(unit.is_formatted()?);
//!
//! file.set_target("greeting", Some("It's %s"))?;
//! assert_eq!(file.find_id("greeting").unwrap().raw_text(), Some("It\\'s %s"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod escape;
pub mod language;
pub mod store;
pub mod traits;
pub mod unit;

// Re-export most used types for easy consumption
pub use crate::{
    error::{Error, EscapeError},
    escape::{Decoded, decode, encode},
    store::AndroidResourceFile,
    unit::AndroidResourceUnit,
};
