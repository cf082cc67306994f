//! Corpus reading and tag normalization

pub mod corpus;
pub mod tagset;
