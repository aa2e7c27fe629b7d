//! Access gate for the habit screen.
//!
//! The credential check is a literal comparison kept behind the
//! `Authenticator` trait so a real identity provider can replace it without
//! touching habit logic.

pub mod gate;
