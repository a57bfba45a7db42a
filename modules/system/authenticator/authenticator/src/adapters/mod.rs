//! Framework adapters binding the authenticator to a transport.

pub mod mqtt;
