//! Bikeshare station status client.
//!
//! Reads a GBFS system's live `station_status` feed and answers questions
//! like "which stations are fully working?" and "where are there at least
//! five bikes?".

pub mod catalog;
pub mod config;
pub mod domain;
pub mod gbfs;
pub mod web;

#[cfg(test)]
mod testing;
