//! Platform adapters. Discord is the only platform; the adapter translates
//! gateway events into internal events and internal replies into sends.

pub mod discord;
