//! Identity provider adapters

pub mod client;

pub use client::HttpTokenExchange;
