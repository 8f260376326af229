//! Platform-agnostic wired adapter state, configuration and traits.
//!
//! This crate holds everything console protocol engines share, without any
//! platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! - [`types`]: Per-port buffers ([`WiredData`], [`WiredAdapter`]) and generic pad ids
//! - [`config`]: Per-port device configuration ([`Config`], [`OutCfg`])
//! - [`feedback`]: Records sent back to the adapter ([`RawFeedback`], [`FeedbackSink`])
//! - [`turbo`]: Frame-counter driven turbo masking
//! - [`system`]: Console selection ([`SystemId`], [`WiredSystem`], [`WiredDriver`])
//!
//! # Example
//!
//! ```rust
//! use wired_core::{turbo, WiredData};
//!
//! let mut data = WiredData::new();
//! data.cnt_mask[0] = 0b11 << 1; // 4-frame turbo, positive logic
//!
//! data.frame_cnt = 3;
//! assert!(!turbo::turbo_off(data.cnt_mask[0], data.frame_cnt));
//! data.frame_cnt = 4;
//! assert!(turbo::turbo_off(data.cnt_mask[0], data.frame_cnt));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for interrupt-context code.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod feedback;
pub mod system;
pub mod turbo;
pub mod types;

// Re-export main types at crate root
pub use config::{AccMode, Config, ConfigError, DevMode, OutCfg};
pub use feedback::{
    FeedbackConsumer, FeedbackError, FeedbackProducer, FeedbackQueue, FeedbackSink, FeedbackType,
    RawFeedback, MAX_FB_DATA,
};
pub use system::{SystemId, WiredDriver, WiredSystem, WIRED_MAX};
pub use types::{
    axis_to_btn_id, Axis, AxisMeta, PadBtn, WiredAdapter, WiredData, AXES_MAX, MAX_PORTS,
    OUTPUT_LEN, TURBO_SLOTS,
};
