//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own membership, forwarding, and sink access so route
//! handlers can stay focused on protocol translation.

pub mod handover;
pub mod relay;
