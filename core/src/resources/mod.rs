//! Resource methods of `M2xClient`, one file per API resource.
//!
//! Each method is a single call into the shared operation helpers; only the
//! path, the verb and the expected status code differ.

mod batches;
mod blueprints;
mod feeds;
mod keys;
mod triggers;
