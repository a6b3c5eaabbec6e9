//! Core tokenizing primitives
//!
//! This module contains the building blocks the tokenizer is made of:
//! - Scanner: memchr-accelerated boundary finding for tags, comments,
//!   PIs, DOCTYPE blocks and CDATA-aware character data
//! - Decompose: splitting a raw span into name, attributes and data
//! - Attributes: attribute parsing into range tables
//! - Token: borrowed and owned token views
//! - Position: line/column/offset tracking

pub mod attributes;
pub mod decompose;
pub mod position;
pub mod scanner;
pub mod token;
