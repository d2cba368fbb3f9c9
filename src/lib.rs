pub mod aerial_pipeline;
pub mod logger;
