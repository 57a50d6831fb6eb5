//! Core types for the Leadline intake and review service.
//!
//! This crate is free of HTTP and database dependencies. It owns the lead
//! model, the [`store::LeadStore`] abstraction, the observable
//! [`repository::LeadRepository`], intake assembly, and the pure derivations
//! behind the staff dashboard.

// Native `async fn` in traits; `Send` bounds are spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod demo;
pub mod error;
pub mod intake;
pub mod lead;
pub mod repository;
pub mod store;
pub mod views;

pub use error::{Error, Result};
