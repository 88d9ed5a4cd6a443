//! Tubely DB Library
//!
//! Video record and thumbnail stores used by the ingestion pipeline.

pub mod db;

pub use db::*;
