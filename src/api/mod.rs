//! Thin HTTP layer over the service.
//!
//! # Architecture
//!
//! Every endpoint method follows the same shape: fetch JSON, unwrap the
//! response envelope, hand the payload to the materialization engine
//! ([`crate::materialize`]). The engine never sees the network; this layer
//! never interprets payload fields. Status-code mapping lives in exactly
//! one place ([`client`]).
//!
//! Composite fetches (a track with its lyrics, an artist with its albums)
//! run their independent requests concurrently and attach the secondary
//! results only after the base entity is built.

pub mod albums;
pub mod annotations;
pub mod artists;
pub mod charts;
pub mod client;
pub mod search;
pub mod tracks;
pub mod users;

pub use client::{Context, Genius};
