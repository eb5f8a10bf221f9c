//! Storefront library
//!
//! A product catalog client: a retrying fetch layer, a time-boxed cache in
//! durable storage, product data access on top of both, and a persisted cart
//! counter.

pub mod api;
pub mod app;
pub mod cache;
pub mod cart;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod search;
pub mod store;
