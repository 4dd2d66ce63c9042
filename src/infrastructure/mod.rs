// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod genie_codec;
pub mod genie_link;
