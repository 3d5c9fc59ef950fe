//! Tests for parlance-tools: ToolRegistry behavior and both builtin tools.

use parlance_tools::*;
use serde_json::json;

// ===========================================================================
// ToolRegistry
// ===========================================================================

#[test]
fn registry_default_is_empty() {
    let reg = ToolRegistry::new();
    assert!(reg.list().is_empty());
    assert!(reg.definitions().is_empty());
}

#[tokio::test]
async fn registry_unknown_tool_yields_error_payload() {
    let reg = create_default_registry();
    let result = reg.invoke("delete_universe", json!({})).await.unwrap();
    assert_eq!(result, json!({ "error": "Unknown tool" }));
}

#[test]
fn create_default_registry_has_all_tools() {
    let reg = create_default_registry();
    let names = reg.list();
    assert!(names.contains(&"fetch_user_data"));
    assert!(names.contains(&"search_knowledge_base"));
    assert_eq!(names.len(), 2);
    assert_eq!(reg.definitions().len(), 2);
}

#[test]
fn registry_get_tool() {
    let reg = create_default_registry();
    assert!(reg.get("fetch_user_data").is_some());
    assert!(reg.get("nonexistent").is_none());
}

#[test]
fn registry_definitions_have_schemas() {
    let reg = create_default_registry();
    for def in reg.definitions() {
        assert!(!def.name.is_empty());
        assert!(!def.description.is_empty());
        assert!(def.parameters.is_object());
        assert_eq!(def.parameters["type"], "object");
    }
}

// ===========================================================================
// fetch_user_data
// ===========================================================================

#[tokio::test]
async fn fetch_user_data_returns_profile() {
    let reg = create_default_registry();
    let result = reg
        .invoke("fetch_user_data", json!({ "user_id": "abcdef1234" }))
        .await
        .unwrap();
    assert_eq!(result["user_id"], "abcdef1234");
    assert_eq!(result["name"], "User_abcdef12");
    assert_eq!(result["tier"], "premium");
}

#[tokio::test]
async fn fetch_user_data_short_id() {
    let reg = create_default_registry();
    let result = reg
        .invoke("fetch_user_data", json!({ "user_id": "u1" }))
        .await
        .unwrap();
    assert_eq!(result["name"], "User_u1");
}

#[tokio::test]
async fn fetch_user_data_missing_argument_fails() {
    let reg = create_default_registry();
    let result = reg.invoke("fetch_user_data", json!({})).await;
    assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
}

// ===========================================================================
// search_knowledge_base
// ===========================================================================

#[tokio::test]
async fn search_knowledge_base_returns_results() {
    let reg = create_default_registry();
    let result = reg
        .invoke("search_knowledge_base", json!({ "query": "rust" }))
        .await
        .unwrap();
    let results = result["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].as_str().unwrap().contains("'rust'"));
    assert!(results[1].as_str().unwrap().ends_with("#2"));
}

#[tokio::test]
async fn search_knowledge_base_missing_argument_fails() {
    let reg = create_default_registry();
    let result = reg.invoke("search_knowledge_base", json!({})).await;
    assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
}

#[tokio::test]
async fn search_knowledge_base_rejects_non_string_query() {
    let reg = create_default_registry();
    let result = reg
        .invoke("search_knowledge_base", json!({ "query": 42 }))
        .await;
    assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
}
