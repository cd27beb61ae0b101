//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod courier_client;

pub use courier_client::*;
