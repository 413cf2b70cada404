//! WebMark core — text-correction pipeline and signup/verification flow.

pub mod config;
pub mod correction;
pub mod error;
pub mod guard;
pub mod posts;
pub mod session;
pub mod signup;
