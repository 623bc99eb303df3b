pub mod classifier;
pub mod document;
pub mod generator;
pub mod handlers;
pub mod matcher;
pub mod orchestrator;
pub mod prompts;
pub mod quality;
pub mod requirements;
pub mod resume_parser;
pub mod text;
