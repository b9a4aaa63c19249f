//! # Error Types
//!
//! This module defines the error type for the chord engine.
//!
//! The rendering/transposition pipeline itself is total and never fails:
//! malformed chords degrade to literal text. Errors exist only on the
//! construction surfaces that turn untrusted UI input into engine values
//! (format labels from query parameters, chord spellings from badges).
//!
//! ## Usage
//! ```rust
//! use cifra::{CifraError, Format};
//!
//! match "sideways".parse::<Format>() {
//!     Ok(format) => println!("render as {:?}", format),
//!     Err(CifraError::UnknownFormat(label)) => {
//!         eprintln!("unknown chord format: {}", label);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CifraError {
    /// Unknown format label.
    ///
    /// Occurs when a caller-supplied format override is none of
    /// `"inline"`, `"above"`, `"mixed"`, `"plain"`.
    ///
    /// # Example
    /// ```
    /// # use cifra::CifraError;
    /// let err = CifraError::UnknownFormat("sideways".to_string());
    /// assert_eq!(err.to_string(), "Unknown chord format: sideways");
    /// ```
    #[error("Unknown chord format: {0}")]
    UnknownFormat(String),

    /// Invalid chord spelling.
    ///
    /// Occurs when a string parsed as a standalone [`ChordSymbol`] does not
    /// match the chord grammar.
    ///
    /// # Example
    /// ```
    /// # use cifra::CifraError;
    /// let err = CifraError::InvalidChord("H7".to_string());
    /// assert_eq!(err.to_string(), "Invalid chord symbol: H7");
    /// ```
    ///
    /// [`ChordSymbol`]: crate::ChordSymbol
    #[error("Invalid chord symbol: {0}")]
    InvalidChord(String),
}
