//! Parlance Tools — server-side capabilities exposed to the model
//!
//! Each tool is a self-contained file in src/tools/.
//! To add a tool: create the file, implement Tool trait, register below.
//! To remove a tool: delete the file, remove from mod.rs and registry below.

pub mod registry;
pub mod tools;

pub use registry::{Tool, ToolError, ToolRegistry};

/// Create the default tool registry with all builtin tools.
///
/// Edit this function to add or remove tools from the relay.
pub fn create_default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(tools::fetch_user_data::FetchUserDataTool::new());
    registry.register(tools::search_knowledge_base::SearchKnowledgeBaseTool::new());

    registry
}
