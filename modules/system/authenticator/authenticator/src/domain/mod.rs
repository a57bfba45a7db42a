//! Domain layer for the authenticator.

pub mod chain;
pub mod delivery;
pub mod pipeline;
pub mod registry;
pub mod service;

pub use chain::ChainRequest;
pub use pipeline::TransformPipeline;
pub use registry::StrategyRegistry;
pub use service::Authenticator;
