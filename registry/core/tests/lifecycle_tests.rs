// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use agent_registry_core::application::agent::{AgentLifecycleService, ListAgentsQuery};
use agent_registry_core::application::errors::ServiceError;
use agent_registry_core::application::lifecycle::StandardAgentLifecycleService;
use agent_registry_core::application::source::SourceService;
use agent_registry_core::application::source_manager::StandardSourceService;
use agent_registry_core::application::tool::ToolService;
use agent_registry_core::application::tool_manager::StandardToolService;
use agent_registry_core::domain::actor::Actor;
use agent_registry_core::domain::agent::{AgentType, CreateAgent, ToolRule, UpdateAgent};
use agent_registry_core::domain::block::CreateBlock;
use agent_registry_core::domain::ids::{AgentId, BlockId, OrganizationId, SourceId, ToolId, UserId};
use agent_registry_core::domain::llm::{EmbeddingConfig, LlmConfig};
use agent_registry_core::domain::registry_config::PaginationConfig;
use agent_registry_core::domain::repository::AgentStore;
use agent_registry_core::domain::source::{CreateSource, Source};
use agent_registry_core::domain::system_prompt::{SystemPromptDeriver, MEMGPT_CHAT, MEMGPT_MODIFIED_O1};
use agent_registry_core::domain::tool::{CreateTool, Tool};
use agent_registry_core::infrastructure::repositories::InMemoryAgentStore;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

struct Fixture {
    store: Arc<InMemoryAgentStore>,
    agents: Arc<StandardAgentLifecycleService>,
    tools: StandardToolService,
    sources: StandardSourceService,
    actor: Actor,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryAgentStore::new());
        Self {
            agents: Arc::new(StandardAgentLifecycleService::new(store.clone())),
            tools: StandardToolService::new(store.clone()),
            sources: StandardSourceService::new(store.clone()),
            store,
            actor: actor(),
        }
    }

    async fn tool(&self, name: &str) -> Tool {
        self.tool_for(name, &self.actor).await
    }

    async fn tool_for(&self, name: &str, actor: &Actor) -> Tool {
        self.tools
            .create_tool(
                CreateTool {
                    name: Some(name.to_string()),
                    description: None,
                    source_type: "python".to_string(),
                    source_code: format!("def {}(): ...", name),
                    json_schema: json!({ "name": name }),
                    tags: vec![],
                },
                false,
                actor,
            )
            .await
            .unwrap()
    }

    async fn source(&self, name: &str) -> Source {
        self.sources
            .create_source(CreateSource::new(name), &self.actor)
            .await
            .unwrap()
    }
}

fn actor() -> Actor {
    Actor::new(UserId::new(), OrganizationId::new())
}

fn create_request(name: &str) -> CreateAgent {
    CreateAgent::new(
        name,
        AgentType::MemgptAgent,
        LlmConfig::new("gpt-4o-mini", "openai", 128_000),
        EmbeddingConfig::new("text-embedding-3-small", "openai", 1536),
    )
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_create_with_tool_and_tag_derives_system_prompt() {
    let fx = Fixture::new();
    let t1 = fx.tool("web_search").await;

    let mut create = create_request("researcher");
    create.tool_ids = Some(vec![t1.id]);
    create.tags = Some(tags(&["x"]));

    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();

    assert_eq!(agent.system, MEMGPT_CHAT);
    assert_eq!(agent.tool_ids(), vec![t1.id]);
    assert_eq!(agent.tags, tags(&["x"]));
    assert!(agent.sources.is_empty());
    assert!(agent.memory.is_empty());
    assert_eq!(agent.organization_id, fx.actor.organization_id);
    assert_eq!(agent.created_by_id, Some(fx.actor.user_id));
}

#[tokio::test]
async fn test_supplied_system_prompt_used_verbatim() {
    let fx = Fixture::new();
    let mut create = create_request("custom");
    create.agent_type = AgentType::O1Agent.as_str().to_string();
    create.system = Some("You are terse.".to_string());

    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();
    assert_eq!(agent.system, "You are terse.");

    let derived = fx
        .agents
        .create_agent(
            CreateAgent { agent_type: "o1_agent".to_string(), ..create_request("derived") },
            &fx.actor,
        )
        .await
        .unwrap();
    assert_eq!(derived.system, MEMGPT_MODIFIED_O1);
}

#[tokio::test]
async fn test_missing_template_is_configuration_error() {
    let store = Arc::new(InMemoryAgentStore::new());
    let agents = StandardAgentLifecycleService::new(store)
        .with_prompt_deriver(SystemPromptDeriver::empty().register("memgpt_chat", "chat"));
    let actor = actor();

    let mut create = create_request("offline");
    create.agent_type = AgentType::OfflineMemoryAgent.as_str().to_string();
    let err = agents.create_agent(create, &actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Configuration(_)));

    let ok = agents.create_agent(create_request("chat"), &actor).await.unwrap();
    assert_eq!(ok.system, "chat");
}

#[tokio::test]
async fn test_unknown_agent_type_is_configuration_error() {
    let fx = Fixture::new();
    let mut create = create_request("mystery");
    create.agent_type = "bogus_agent".to_string();

    let err = fx.agents.create_agent(create, &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Configuration(ref msg) if msg.contains("bogus_agent")));

    let err = fx.agents.get_agent_by_name("mystery", &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_unbounded_page_size_does_not_overflow() {
    let store = Arc::new(InMemoryAgentStore::new());
    let agents = StandardAgentLifecycleService::new(store)
        .with_pagination(PaginationConfig { default_limit: 50, max_limit: usize::MAX });
    let actor = actor();
    agents.create_agent(create_request("only"), &actor).await.unwrap();

    let page = agents
        .list_agents(&actor, ListAgentsQuery { limit: Some(usize::MAX), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(page.agents.len(), 1);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn test_duplicate_name_in_organization_conflicts() {
    let fx = Fixture::new();
    fx.agents.create_agent(create_request("twin"), &fx.actor).await.unwrap();

    let err = fx.agents.create_agent(create_request("twin"), &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Same name in another organization is fine
    fx.agents.create_agent(create_request("twin"), &actor()).await.unwrap();
}

#[tokio::test]
async fn test_inline_memory_blocks_are_created_and_linked() {
    let fx = Fixture::new();
    let mut create = create_request("memory");
    create.memory_blocks = vec![
        CreateBlock::new("human", "Name: Sam"),
        CreateBlock::new("persona", "A patient tutor"),
    ];

    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();
    let labels: Vec<&str> = agent.memory.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["human", "persona"]);
    assert!(agent.memory.iter().all(|b| b.organization_id == fx.actor.organization_id));
}

#[tokio::test]
async fn test_update_twice_with_same_lists_is_idempotent() {
    let fx = Fixture::new();
    let t1 = fx.tool("a").await;
    let t2 = fx.tool("b").await;
    let s1 = fx.source("docs").await;
    let agent = fx.agents.create_agent(create_request("steady"), &fx.actor).await.unwrap();

    let update = UpdateAgent {
        tool_ids: Some(vec![t1.id, t2.id, t1.id]),
        source_ids: Some(vec![s1.id]),
        tags: Some(tags(&["p", "q"])),
        ..Default::default()
    };

    let once = fx.agents.update_agent(agent.id, update.clone(), &fx.actor).await.unwrap();
    let twice = fx.agents.update_agent(agent.id, update, &fx.actor).await.unwrap();

    assert_eq!(once.tool_ids(), vec![t1.id, t2.id]);
    assert_eq!(once.tool_ids(), twice.tool_ids());
    assert_eq!(once.source_ids(), twice.source_ids());
    assert_eq!(once.tags, twice.tags);
}

#[tokio::test]
async fn test_update_with_only_name_leaves_everything_else() {
    let fx = Fixture::new();
    let t1 = fx.tool("a").await;
    let s1 = fx.source("docs").await;

    let mut create = create_request("before");
    create.tool_ids = Some(vec![t1.id]);
    create.source_ids = Some(vec![s1.id]);
    create.memory_blocks = vec![CreateBlock::new("human", "hi")];
    create.tags = Some(tags(&["keep"]));
    create.description = Some("desc".to_string());
    create.tool_rules = Some(vec![ToolRule::Terminal { tool_name: "send_message".to_string() }]);
    let before = fx.agents.create_agent(create, &fx.actor).await.unwrap();

    let after = fx
        .agents
        .update_agent(
            before.id,
            UpdateAgent { name: Some("after".to_string()), ..Default::default() },
            &fx.actor,
        )
        .await
        .unwrap();

    assert_eq!(after.name, "after");
    assert_eq!(after.system, before.system);
    assert_eq!(after.description, before.description);
    assert_eq!(after.tool_rules, before.tool_rules);
    assert_eq!(after.llm_config, before.llm_config);
    assert_eq!(after.tool_ids(), before.tool_ids());
    assert_eq!(after.source_ids(), before.source_ids());
    assert_eq!(after.block_ids(), before.block_ids());
    assert_eq!(after.tags, before.tags);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn test_empty_block_list_detaches_all_core_memory_only() {
    let fx = Fixture::new();
    let t1 = fx.tool("a").await;
    let s1 = fx.source("docs").await;

    let mut create = create_request("forgetful");
    create.tool_ids = Some(vec![t1.id]);
    create.source_ids = Some(vec![s1.id]);
    create.memory_blocks = vec![CreateBlock::new("human", "hi"), CreateBlock::new("persona", "me")];
    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();
    assert_eq!(agent.memory.len(), 2);

    let updated = fx
        .agents
        .update_agent(agent.id, UpdateAgent { block_ids: Some(vec![]), ..Default::default() }, &fx.actor)
        .await
        .unwrap();

    assert!(updated.memory.is_empty());
    assert_eq!(updated.tool_ids(), vec![t1.id]);
    assert_eq!(updated.source_ids(), vec![s1.id]);

    // The blocks themselves survive detachment
    let mut tx = fx.store.begin().await.unwrap();
    for block in &agent.memory {
        assert!(tx.find_block(block.id, fx.actor.organization_id).await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_attach_is_strict_detach_is_lenient() {
    let fx = Fixture::new();
    let s1 = fx.source("docs").await;
    let agent = fx.agents.create_agent(create_request("reader"), &fx.actor).await.unwrap();

    let attached = fx.agents.attach_source(agent.id, s1.id, &fx.actor).await.unwrap();
    assert_eq!(attached.source_ids(), vec![s1.id]);

    let err = fx.agents.attach_source(agent.id, s1.id, &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let ids = fx.agents.list_attached_source_ids(agent.id, &fx.actor).await.unwrap();
    assert_eq!(ids, vec![s1.id]);

    fx.agents.detach_source(agent.id, s1.id, &fx.actor).await.unwrap();
    let again = fx.agents.detach_source(agent.id, s1.id, &fx.actor).await.unwrap();
    assert!(again.sources.is_empty());

    // Never-attached source is also a silent no-op
    fx.agents.detach_source(agent.id, SourceId::new(), &fx.actor).await.unwrap();
}

#[tokio::test]
async fn test_attach_unknown_source_or_agent_is_not_found() {
    let fx = Fixture::new();
    let s1 = fx.source("docs").await;
    let agent = fx.agents.create_agent(create_request("reader"), &fx.actor).await.unwrap();

    let err = fx.agents.attach_source(agent.id, SourceId::new(), &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = fx.agents.attach_source(AgentId::new(), s1.id, &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_attach_of_same_pair() {
    let fx = Fixture::new();
    let s1 = fx.source("docs").await;
    let agent = fx.agents.create_agent(create_request("racer"), &fx.actor).await.unwrap();

    let (a, b) = tokio::join!(
        fx.agents.attach_source(agent.id, s1.id, &fx.actor),
        fx.agents.attach_source(agent.id, s1.id, &fx.actor),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::Conflict(_))))
            .count(),
        1
    );

    let ids = fx.agents.list_attached_source_ids(agent.id, &fx.actor).await.unwrap();
    assert_eq!(ids, vec![s1.id]);
}

#[tokio::test]
async fn test_concurrent_attach_across_tasks() {
    let fx = Fixture::new();
    let s1 = fx.source("docs").await;
    let agent = fx.agents.create_agent(create_request("racer"), &fx.actor).await.unwrap();

    let (agent_id, source_id) = (agent.id, s1.id);
    let mut handles = Vec::new();
    for _ in 0..4 {
        let agents = fx.agents.clone();
        let actor = fx.actor;
        handles.push(tokio::spawn(async move { agents.attach_source(agent_id, source_id, &actor).await }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ServiceError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_tags_are_deduplicated() {
    let fx = Fixture::new();
    let mut create = create_request("tagged");
    create.tags = Some(tags(&["a", "b", "a"]));
    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();
    assert_eq!(agent.tags, tags(&["a", "b"]));

    // Case-sensitive replace
    let updated = fx
        .agents
        .update_agent(agent.id, UpdateAgent { tags: Some(tags(&["A", "b"])), ..Default::default() }, &fx.actor)
        .await
        .unwrap();
    assert_eq!(updated.tags, tags(&["A", "b"]));
}

#[tokio::test]
async fn test_delete_unknown_agent_changes_nothing() {
    let fx = Fixture::new();
    fx.agents.create_agent(create_request("survivor"), &fx.actor).await.unwrap();

    let err = fx.agents.delete_agent(AgentId::new(), &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let page = fx.agents.list_agents(&fx.actor, ListAgentsQuery::default()).await.unwrap();
    assert_eq!(page.agents.len(), 1);
}

#[tokio::test]
async fn test_delete_returns_snapshot_and_keeps_targets() {
    let fx = Fixture::new();
    let t1 = fx.tool("a").await;
    let s1 = fx.source("docs").await;

    let mut create = create_request("doomed");
    create.tool_ids = Some(vec![t1.id]);
    create.source_ids = Some(vec![s1.id]);
    create.tags = Some(tags(&["gone"]));
    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();

    let snapshot = fx.agents.delete_agent(agent.id, &fx.actor).await.unwrap();
    assert_eq!(snapshot.tool_ids(), vec![t1.id]);
    assert_eq!(snapshot.tags, tags(&["gone"]));

    let err = fx.agents.get_agent_by_id(agent.id, &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    assert_eq!(fx.tools.get_tool_by_name("a", &fx.actor).await.unwrap().id, t1.id);
    assert_eq!(fx.sources.get_source(s1.id, &fx.actor).await.unwrap().id, s1.id);

    // The name is free again
    fx.agents.create_agent(create_request("doomed"), &fx.actor).await.unwrap();
}

#[tokio::test]
async fn test_cross_organization_references_are_not_found() {
    let fx = Fixture::new();
    let outsider = actor();
    let foreign_tool = fx.tool_for("foreign", &outsider).await;

    let mut create = create_request("borrower");
    create.tool_ids = Some(vec![foreign_tool.id]);
    let err = fx.agents.create_agent(create, &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref msg) if msg.contains(&foreign_tool.id.to_string())));

    let agent = fx.agents.create_agent(create_request("mine"), &fx.actor).await.unwrap();
    let err = fx.agents.get_agent_by_id(agent.id, &outsider).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    let err = fx.agents.get_agent_by_name("mine", &outsider).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    let err = fx
        .agents
        .update_agent(agent.id, UpdateAgent { name: Some("stolen".to_string()), ..Default::default() }, &outsider)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_create_leaves_nothing_behind() {
    let fx = Fixture::new();
    let block_id = BlockId::new();
    let mut block = CreateBlock::new("human", "orphan?");
    block.id = Some(block_id);

    let mut create = create_request("broken");
    create.memory_blocks = vec![block];
    create.tool_ids = Some(vec![ToolId::new()]);
    create.tags = Some(tags(&["x"]));

    let err = fx.agents.create_agent(create, &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = fx.agents.get_agent_by_name("broken", &fx.actor).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let mut tx = fx.store.begin().await.unwrap();
    assert!(tx.find_block(block_id, fx.actor.organization_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_update_rolls_back_scalars() {
    let fx = Fixture::new();
    let agent = fx.agents.create_agent(create_request("stable"), &fx.actor).await.unwrap();

    let err = fx
        .agents
        .update_agent(
            agent.id,
            UpdateAgent {
                name: Some("renamed".to_string()),
                source_ids: Some(vec![SourceId::new()]),
                ..Default::default()
            },
            &fx.actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let current = fx.agents.get_agent_by_id(agent.id, &fx.actor).await.unwrap();
    assert_eq!(current.name, "stable");
}

#[tokio::test]
async fn test_list_pages_cover_every_agent_once() {
    let store = Arc::new(InMemoryAgentStore::new());
    let agents = StandardAgentLifecycleService::new(store)
        .with_pagination(PaginationConfig { default_limit: 2, max_limit: 3 });
    let actor = actor();
    for i in 0..7 {
        agents.create_agent(create_request(&format!("agent-{}", i)), &actor).await.unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = None;
    let mut pages = 0;
    loop {
        let page = agents
            .list_agents(&actor, ListAgentsQuery { cursor: cursor.clone(), ..Default::default() })
            .await
            .unwrap();
        pages += 1;
        assert!(page.agents.len() <= 2);
        seen.extend(page.agents.iter().map(|a| (a.created_at, a.id)));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(pages, 4);
    assert_eq!(seen.len(), 7);
    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(seen, sorted);
    assert_eq!(seen.iter().map(|(_, id)| *id).collect::<HashSet<_>>().len(), 7);

    // Oversized limits are clamped
    let page = agents
        .list_agents(&actor, ListAgentsQuery { limit: Some(1000), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(page.agents.len(), 3);
}

#[tokio::test]
async fn test_list_rejects_garbage_cursor() {
    let fx = Fixture::new();
    let err = fx
        .agents
        .list_agents(&fx.actor, ListAgentsQuery { cursor: Some("%%%".to_string()), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_list_tag_filter_all_versus_any() {
    let fx = Fixture::new();
    for (name, agent_tags) in [("both", vec!["a", "b"]), ("only-a", vec!["a"]), ("none", vec![])] {
        let mut create = create_request(name);
        create.tags = Some(tags(&agent_tags));
        fx.agents.create_agent(create, &fx.actor).await.unwrap();
    }

    let names = |page: agent_registry_core::application::agent::AgentPage| {
        let mut names: Vec<String> = page.agents.into_iter().map(|a| a.name).collect();
        names.sort();
        names
    };

    let all = fx
        .agents
        .list_agents(&fx.actor, ListAgentsQuery { tags: tags(&["a", "b", "a"]), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(names(all), vec!["both".to_string()]);

    let any = fx
        .agents
        .list_agents(
            &fx.actor,
            ListAgentsQuery { tags: tags(&["a", "b"]), match_all_tags: false, ..Default::default() },
        )
        .await
        .unwrap();
    assert_eq!(names(any), vec!["both".to_string(), "only-a".to_string()]);
}

#[tokio::test]
async fn test_listing_is_scoped_unless_admin() {
    let fx = Fixture::new();
    let other = actor();
    fx.agents.create_agent(create_request("ours"), &fx.actor).await.unwrap();
    fx.agents.create_agent(create_request("theirs"), &other).await.unwrap();

    let ours = fx.agents.list_agents(&fx.actor, ListAgentsQuery::default()).await.unwrap();
    assert_eq!(ours.agents.len(), 1);
    assert_eq!(ours.agents[0].name, "ours");

    let everyone = fx.agents.list_all_organizations(ListAgentsQuery::default()).await.unwrap();
    assert_eq!(everyone.agents.len(), 2);
}

#[tokio::test]
async fn test_deleting_tool_removes_it_from_snapshots() {
    let fx = Fixture::new();
    let t1 = fx.tool("a").await;
    let t2 = fx.tool("b").await;
    let mut create = create_request("toolbox");
    create.tool_ids = Some(vec![t1.id, t2.id]);
    let agent = fx.agents.create_agent(create, &fx.actor).await.unwrap();

    fx.tools.delete_tool_by_name("a", &fx.actor).await.unwrap();

    let current = fx.agents.get_agent_by_id(agent.id, &fx.actor).await.unwrap();
    assert_eq!(current.tool_ids(), vec![t2.id]);
}
