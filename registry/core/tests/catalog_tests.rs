// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use agent_registry_core::application::agent::AgentLifecycleService;
use agent_registry_core::application::errors::ServiceError;
use agent_registry_core::application::lifecycle::StandardAgentLifecycleService;
use agent_registry_core::application::source::SourceService;
use agent_registry_core::application::source_manager::StandardSourceService;
use agent_registry_core::application::tool::ToolService;
use agent_registry_core::application::tool_manager::StandardToolService;
use agent_registry_core::domain::actor::Actor;
use agent_registry_core::domain::agent::{AgentType, CreateAgent};
use agent_registry_core::domain::ids::{OrganizationId, SourceId, UserId};
use agent_registry_core::domain::llm::{EmbeddingConfig, LlmConfig};
use agent_registry_core::domain::source::CreateSource;
use agent_registry_core::domain::tool::CreateTool;
use agent_registry_core::infrastructure::repositories::InMemoryAgentStore;
use serde_json::json;
use std::sync::Arc;

fn actor() -> Actor {
    Actor::new(UserId::new(), OrganizationId::new())
}

fn tool_request(name: Option<&str>, code: &str) -> CreateTool {
    CreateTool {
        name: name.map(str::to_string),
        description: None,
        source_type: "python".to_string(),
        source_code: code.to_string(),
        json_schema: json!({ "name": "from_schema", "parameters": {} }),
        tags: vec![],
    }
}

#[tokio::test]
async fn test_tool_name_falls_back_to_schema() {
    let tools = StandardToolService::new(Arc::new(InMemoryAgentStore::new()));
    let actor = actor();

    let tool = tools.create_tool(tool_request(None, "pass"), false, &actor).await.unwrap();
    assert_eq!(tool.name, "from_schema");

    let mut nameless = tool_request(None, "pass");
    nameless.json_schema = json!({});
    let err = tools.create_tool(nameless, false, &actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_tool_exists_ok_overwrites_in_place() {
    let tools = StandardToolService::new(Arc::new(InMemoryAgentStore::new()));
    let actor = actor();

    let first = tools.create_tool(tool_request(Some("grep"), "v1"), false, &actor).await.unwrap();

    let err = tools
        .create_tool(tool_request(Some("grep"), "v2"), false, &actor)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let second = tools.create_tool(tool_request(Some("grep"), "v2"), true, &actor).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.source_code, "v2");

    let listed = tools.list_tools(&actor).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].source_code, "v2");
}

#[tokio::test]
async fn test_tool_delete_unlinks_agents() {
    let store = Arc::new(InMemoryAgentStore::new());
    let tools = StandardToolService::new(store.clone());
    let agents = StandardAgentLifecycleService::new(store);
    let actor = actor();

    let tool = tools.create_tool(tool_request(Some("grep"), "v1"), false, &actor).await.unwrap();
    let mut create = CreateAgent::new(
        "searcher",
        AgentType::MemgptAgent,
        LlmConfig::new("gpt-4o-mini", "openai", 128_000),
        EmbeddingConfig::new("text-embedding-3-small", "openai", 1536),
    );
    create.tool_ids = Some(vec![tool.id]);
    let agent = agents.create_agent(create, &actor).await.unwrap();

    let deleted = tools.delete_tool_by_name("grep", &actor).await.unwrap();
    assert_eq!(deleted.id, tool.id);

    let current = agents.get_agent_by_id(agent.id, &actor).await.unwrap();
    assert!(current.tools.is_empty());

    let err = tools.delete_tool_by_name("grep", &actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_tools_are_scoped_to_organization() {
    let tools = StandardToolService::new(Arc::new(InMemoryAgentStore::new()));
    let owner = actor();
    let outsider = actor();

    tools.create_tool(tool_request(Some("grep"), "v1"), false, &owner).await.unwrap();

    let err = tools.get_tool_by_name("grep", &outsider).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(tools.list_tools(&outsider).await.unwrap().is_empty());

    // Same name is free in another organization
    tools.create_tool(tool_request(Some("grep"), "v1"), false, &outsider).await.unwrap();
}

#[tokio::test]
async fn test_source_lifecycle() {
    let store = Arc::new(InMemoryAgentStore::new());
    let sources = StandardSourceService::new(store.clone());
    let agents = StandardAgentLifecycleService::new(store);
    let actor = actor();

    let err = sources.create_source(CreateSource::new("  "), &actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let docs = sources.create_source(CreateSource::new("docs"), &actor).await.unwrap();
    let err = sources.create_source(CreateSource::new("docs"), &actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let agent = agents
        .create_agent(
            CreateAgent::new(
                "reader",
                AgentType::MemgptAgent,
                LlmConfig::new("gpt-4o-mini", "openai", 128_000),
                EmbeddingConfig::new("text-embedding-3-small", "openai", 1536),
            ),
            &actor,
        )
        .await
        .unwrap();
    agents.attach_source(agent.id, docs.id, &actor).await.unwrap();

    let attached = agents.list_attached_sources(agent.id, &actor).await.unwrap();
    assert_eq!(attached.iter().map(|s| s.id).collect::<Vec<_>>(), vec![docs.id]);

    sources.delete_source(docs.id, &actor).await.unwrap();
    assert!(agents.list_attached_source_ids(agent.id, &actor).await.unwrap().is_empty());

    let err = sources.get_source(SourceId::new(), &actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
