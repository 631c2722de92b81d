//! Integration tests for the token lifecycle and revocation flows.

mod config_test;
mod helpers;
mod lifecycle_test;
mod revocation_test;
