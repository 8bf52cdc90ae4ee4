//! Remote document store transport

pub mod auth;
pub mod client;
pub mod messages;
pub mod push;
pub mod rest;

pub use client::DocumentStoreClient;
pub use push::StorePushClient;
pub use rest::StoreRestClient;
