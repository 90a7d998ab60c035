//! Shared helpers for the integration and end-to-end tests.
//! Not every test binary uses every helper.
#![allow(dead_code)]

pub mod gateway_stub;
pub mod mocks;
