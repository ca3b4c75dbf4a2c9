//! Token tree shared by the tokenizer, the phrase merger and the renderer.

pub mod node;

pub use node::*;
