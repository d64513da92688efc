//! Shared vocabulary types for the lexica spell-checking engine.
//!
//! # Architecture
//!
//! - [`text`] -- text span types passed between the splitter and its callers
//! - [`character`] -- character classification and accent folding
//! - [`case`] -- word-level case detection and case/accent folding

pub mod case;
pub mod character;
pub mod text;
