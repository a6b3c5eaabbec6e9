//! Byte source handling
//!
//! - GrowableBuffer: refillable, compactable buffer over any `Read`

pub mod buffered;
