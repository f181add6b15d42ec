//! Parcel Scout - Autonomous delivery address research agent
//!
//! This crate runs an iterative tool-calling agent against a language model,
//! gating its final answer on self-reported confidence and streaming every
//! step as a structured event.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
