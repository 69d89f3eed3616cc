//! UserOp Builder API
//!
//! Thin async client for the hosted UserOp Builder service. The client
//! builds user operations and fetches receipts; submission is left to the
//! caller.

pub mod client;


pub use client::{parse_receipt_body, UserOpBuilderClient};

/// Endpoint paths under `{base}/{project}/{chain}/`
pub mod endpoints {
    pub const INIT_KERNEL_CLIENT: &str = "init-kernel-client";
    pub const BUILD_USEROP: &str = "build-userop";
    pub const GET_USEROP_RECEIPT: &str = "get-userop-receipt";
}
