//! Storage contracts used for durable desktop state.

pub mod kv;
