/// Sign-in gate: per-window session plus the JSON user registry.
pub mod registry;
pub mod session;
