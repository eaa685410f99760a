// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Agent Store
//!
//! Production [`AgentStore`] backed by the schema in
//! `migrations/0001_agent_registry.sql`. Each [`AgentStore::begin`] opens a
//! `sqlx` transaction; every primitive executes on that connection, so the
//! database's own isolation and unique constraints arbitrate concurrent
//! writers. Unique violations surface as [`RepositoryError::Conflict`].

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, Row, Transaction};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentType};
use crate::domain::block::Block;
use crate::domain::ids::{AgentId, BlockId, OrganizationId, SourceId, ToolId, UserId};
use crate::domain::relationship::RelationshipKind;
use crate::domain::repository::{AgentQuery, AgentStore, RepositoryError, StoreTransaction};
use crate::domain::source::Source;
use crate::domain::tool::Tool;

const AGENT_COLUMNS: &str = "id, organization_id, name, system, agent_type, llm_config, embedding_config, \
     description, metadata, tool_rules, message_ids, created_by_id, last_updated_by_id, created_at, updated_at";

const TOOL_COLUMNS: &str = "id, organization_id, name, description, source_type, source_code, json_schema, tags, \
     created_by_id, last_updated_by_id, created_at, updated_at";

const SOURCE_COLUMNS: &str = "id, organization_id, name, description, embedding_config, metadata, \
     created_by_id, last_updated_by_id, created_at, updated_at";

const BLOCK_COLUMNS: &str = "id, organization_id, label, value, char_limit, description, metadata, \
     created_by_id, last_updated_by_id, created_at, updated_at";

pub struct PostgresAgentStore {
    pool: PgPool,
}

impl PostgresAgentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentStore for PostgresAgentStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

// ============================================================================
// Row mapping
// ============================================================================

fn json_column<T: serde::de::DeserializeOwned>(row: &PgRow, column: &str) -> Result<T, RepositoryError> {
    let value: serde_json::Value = row.try_get(column)?;
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::Serialization(format!("Failed to deserialize {}: {}", column, e)))
}

fn optional_json_column<T: serde::de::DeserializeOwned>(
    row: &PgRow,
    column: &str,
) -> Result<Option<T>, RepositoryError> {
    let value: Option<serde_json::Value> = row.try_get(column)?;
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| RepositoryError::Serialization(format!("Failed to deserialize {}: {}", column, e)))
}

fn user_column(row: &PgRow, column: &str) -> Result<Option<UserId>, RepositoryError> {
    let id: Option<Uuid> = row.try_get(column)?;
    Ok(id.map(UserId))
}

fn agent_from_row(row: &PgRow) -> Result<Agent, RepositoryError> {
    let agent_type: String = row.try_get("agent_type")?;
    let agent_type = AgentType::from_str(&agent_type).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    Ok(Agent {
        id: AgentId(row.try_get("id")?),
        organization_id: OrganizationId(row.try_get("organization_id")?),
        name: row.try_get("name")?,
        system: row.try_get("system")?,
        agent_type,
        llm_config: json_column(row, "llm_config")?,
        embedding_config: json_column(row, "embedding_config")?,
        description: row.try_get("description")?,
        metadata: row.try_get("metadata")?,
        tool_rules: json_column(row, "tool_rules")?,
        message_ids: json_column(row, "message_ids")?,
        created_by_id: user_column(row, "created_by_id")?,
        last_updated_by_id: user_column(row, "last_updated_by_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn tool_from_row(row: &PgRow) -> Result<Tool, RepositoryError> {
    Ok(Tool {
        id: ToolId(row.try_get("id")?),
        organization_id: OrganizationId(row.try_get("organization_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        source_type: row.try_get("source_type")?,
        source_code: row.try_get("source_code")?,
        json_schema: row.try_get("json_schema")?,
        tags: json_column(row, "tags")?,
        created_by_id: user_column(row, "created_by_id")?,
        last_updated_by_id: user_column(row, "last_updated_by_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn source_from_row(row: &PgRow) -> Result<Source, RepositoryError> {
    Ok(Source {
        id: SourceId(row.try_get("id")?),
        organization_id: OrganizationId(row.try_get("organization_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        embedding_config: optional_json_column(row, "embedding_config")?,
        metadata: row.try_get("metadata")?,
        created_by_id: user_column(row, "created_by_id")?,
        last_updated_by_id: user_column(row, "last_updated_by_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn block_from_row(row: &PgRow) -> Result<Block, RepositoryError> {
    let limit: i32 = row.try_get("char_limit")?;
    Ok(Block {
        id: BlockId(row.try_get("id")?),
        organization_id: OrganizationId(row.try_get("organization_id")?),
        label: row.try_get("label")?,
        value: row.try_get("value")?,
        limit: limit.max(0) as usize,
        description: row.try_get("description")?,
        metadata: row.try_get("metadata")?,
        created_by_id: user_column(row, "created_by_id")?,
        last_updated_by_id: user_column(row, "last_updated_by_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn uuids<T: Copy>(ids: &[T], f: impl Fn(T) -> Uuid) -> Vec<Uuid> {
    ids.iter().map(|id| f(*id)).collect()
}

// ============================================================================
// Transaction primitives
// ============================================================================

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn insert_agent(&mut self, agent: &Agent) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO agents (
                id, organization_id, name, system, agent_type, llm_config, embedding_config,
                description, metadata, tool_rules, message_ids,
                created_by_id, last_updated_by_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(agent.id.0)
        .bind(agent.organization_id.0)
        .bind(&agent.name)
        .bind(&agent.system)
        .bind(agent.agent_type.as_str())
        .bind(serde_json::to_value(&agent.llm_config)?)
        .bind(serde_json::to_value(&agent.embedding_config)?)
        .bind(&agent.description)
        .bind(&agent.metadata)
        .bind(serde_json::to_value(&agent.tool_rules)?)
        .bind(serde_json::to_value(&agent.message_ids)?)
        .bind(agent.created_by_id.map(|u| u.0))
        .bind(agent.last_updated_by_id.map(|u| u.0))
        .bind(agent.created_at)
        .bind(agent.updated_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn update_agent(&mut self, agent: &Agent) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE agents SET
                name = $2,
                system = $3,
                agent_type = $4,
                llm_config = $5,
                embedding_config = $6,
                description = $7,
                metadata = $8,
                tool_rules = $9,
                message_ids = $10,
                last_updated_by_id = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(agent.id.0)
        .bind(&agent.name)
        .bind(&agent.system)
        .bind(agent.agent_type.as_str())
        .bind(serde_json::to_value(&agent.llm_config)?)
        .bind(serde_json::to_value(&agent.embedding_config)?)
        .bind(&agent.description)
        .bind(&agent.metadata)
        .bind(serde_json::to_value(&agent.tool_rules)?)
        .bind(serde_json::to_value(&agent.message_ids)?)
        .bind(agent.last_updated_by_id.map(|u| u.0))
        .bind(agent.updated_at)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Agent {}", agent.id)));
        }
        Ok(())
    }

    async fn find_agent_by_id(
        &mut self,
        id: AgentId,
        organization_id: OrganizationId,
    ) -> Result<Option<Agent>, RepositoryError> {
        let sql = format!("SELECT {} FROM agents WHERE id = $1 AND organization_id = $2", AGENT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .bind(organization_id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(agent_from_row).transpose()
    }

    async fn find_agent_by_name(
        &mut self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Agent>, RepositoryError> {
        let sql = format!("SELECT {} FROM agents WHERE name = $1 AND organization_id = $2", AGENT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(name)
            .bind(organization_id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(agent_from_row).transpose()
    }

    async fn list_agents(&mut self, query: &AgentQuery) -> Result<Vec<Agent>, RepositoryError> {
        // Tags arrive de-duplicated, so "all of" is a count comparison
        let sql = format!(
            r#"
            SELECT {} FROM agents a
            WHERE ($1::uuid IS NULL OR a.organization_id = $1)
              AND ($2::timestamptz IS NULL OR (a.created_at, a.id) > ($2, $3::uuid))
              AND (
                    cardinality($4::text[]) = 0
                 OR ($5 AND (
                        SELECT count(*) FROM agents_tags t
                        WHERE t.agent_id = a.id AND t.tag = ANY($4)
                    ) = cardinality($4))
                 OR (NOT $5 AND EXISTS (
                        SELECT 1 FROM agents_tags t
                        WHERE t.agent_id = a.id AND t.tag = ANY($4)
                    ))
              )
            ORDER BY a.created_at ASC, a.id ASC
            LIMIT $6
            "#,
            AGENT_COLUMNS
                .split(", ")
                .map(|c| format!("a.{}", c.trim()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let rows = sqlx::query(&sql)
            .bind(query.organization_id.map(|o| o.0))
            .bind(query.after.map(|c| c.created_at))
            .bind(query.after.map(|c| c.id.0))
            .bind(&query.tags)
            .bind(query.match_all_tags)
            .bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .fetch_all(&mut *self.tx)
            .await?;

        debug!("Listed {} agents", rows.len());
        rows.iter().map(agent_from_row).collect()
    }

    async fn delete_agent(&mut self, id: AgentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Agent {}", id)));
        }
        Ok(())
    }

    async fn resolve_targets(
        &mut self,
        kind: RelationshipKind,
        ids: &[Uuid],
        organization_id: OrganizationId,
    ) -> Result<Vec<Uuid>, RepositoryError> {
        let sql = format!(
            "SELECT id FROM {} WHERE id = ANY($1) AND organization_id = $2",
            kind.target_table()
        );
        let rows = sqlx::query(&sql)
            .bind(ids)
            .bind(organization_id.0)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(|row| row.try_get("id").map_err(RepositoryError::from)).collect()
    }

    async fn linked_ids(&mut self, agent_id: AgentId, kind: RelationshipKind) -> Result<Vec<Uuid>, RepositoryError> {
        let sql = format!(
            "SELECT {col} FROM {table} WHERE agent_id = $1 ORDER BY position",
            col = kind.link_column(),
            table = kind.link_table()
        );
        let rows = sqlx::query(&sql)
            .bind(agent_id.0)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter()
            .map(|row| row.try_get(kind.link_column()).map_err(RepositoryError::from))
            .collect()
    }

    async fn insert_links(
        &mut self,
        agent_id: AgentId,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "INSERT INTO {table} (agent_id, {col}) SELECT $1, t.id FROM UNNEST($2::uuid[]) WITH ORDINALITY AS t(id, n) ORDER BY t.n",
            col = kind.link_column(),
            table = kind.link_table()
        );
        sqlx::query(&sql)
            .bind(agent_id.0)
            .bind(ids)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn delete_links(
        &mut self,
        agent_id: AgentId,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "DELETE FROM {table} WHERE agent_id = $1 AND {col} = ANY($2)",
            col = kind.link_column(),
            table = kind.link_table()
        );
        sqlx::query(&sql)
            .bind(agent_id.0)
            .bind(ids)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn agent_tags(&mut self, agent_id: AgentId) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT tag FROM agents_tags WHERE agent_id = $1 ORDER BY tag")
            .bind(agent_id.0)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(|row| row.try_get("tag").map_err(RepositoryError::from)).collect()
    }

    async fn insert_tags(&mut self, agent_id: AgentId, tags: &[String]) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO agents_tags (agent_id, tag) SELECT $1, UNNEST($2::text[])")
            .bind(agent_id.0)
            .bind(tags)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn delete_tags(&mut self, agent_id: AgentId, tags: &[String]) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM agents_tags WHERE agent_id = $1 AND tag = ANY($2)")
            .bind(agent_id.0)
            .bind(tags)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn save_block(&mut self, block: &Block) -> Result<(), RepositoryError> {
        let limit = i32::try_from(block.limit)
            .map_err(|_| RepositoryError::Serialization(format!("Block limit {} out of range", block.limit)))?;

        // A block id owned by another organization is never overwritten
        let result = sqlx::query(
            r#"
            INSERT INTO blocks (
                id, organization_id, label, value, char_limit, description, metadata,
                created_by_id, last_updated_by_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                label = EXCLUDED.label,
                value = EXCLUDED.value,
                char_limit = EXCLUDED.char_limit,
                description = EXCLUDED.description,
                metadata = EXCLUDED.metadata,
                last_updated_by_id = EXCLUDED.last_updated_by_id,
                updated_at = EXCLUDED.updated_at
            WHERE blocks.organization_id = EXCLUDED.organization_id
            "#,
        )
        .bind(block.id.0)
        .bind(block.organization_id.0)
        .bind(&block.label)
        .bind(&block.value)
        .bind(limit)
        .bind(&block.description)
        .bind(&block.metadata)
        .bind(block.created_by_id.map(|u| u.0))
        .bind(block.last_updated_by_id.map(|u| u.0))
        .bind(block.created_at)
        .bind(block.updated_at)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!("Block id {} already exists", block.id)));
        }
        Ok(())
    }

    async fn find_block(
        &mut self,
        id: BlockId,
        organization_id: OrganizationId,
    ) -> Result<Option<Block>, RepositoryError> {
        let sql = format!("SELECT {} FROM blocks WHERE id = $1 AND organization_id = $2", BLOCK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .bind(organization_id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(block_from_row).transpose()
    }

    async fn blocks_by_ids(&mut self, ids: &[BlockId]) -> Result<Vec<Block>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM blocks WHERE id = ANY($1) ORDER BY array_position($1, id)",
            BLOCK_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(uuids(ids, |id| id.0))
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(block_from_row).collect()
    }

    async fn insert_tool(&mut self, tool: &Tool) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO tools (
                id, organization_id, name, description, source_type, source_code, json_schema, tags,
                created_by_id, last_updated_by_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(tool.id.0)
        .bind(tool.organization_id.0)
        .bind(&tool.name)
        .bind(&tool.description)
        .bind(&tool.source_type)
        .bind(&tool.source_code)
        .bind(&tool.json_schema)
        .bind(serde_json::to_value(&tool.tags)?)
        .bind(tool.created_by_id.map(|u| u.0))
        .bind(tool.last_updated_by_id.map(|u| u.0))
        .bind(tool.created_at)
        .bind(tool.updated_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn update_tool(&mut self, tool: &Tool) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE tools SET
                name = $2,
                description = $3,
                source_type = $4,
                source_code = $5,
                json_schema = $6,
                tags = $7,
                last_updated_by_id = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(tool.id.0)
        .bind(&tool.name)
        .bind(&tool.description)
        .bind(&tool.source_type)
        .bind(&tool.source_code)
        .bind(&tool.json_schema)
        .bind(serde_json::to_value(&tool.tags)?)
        .bind(tool.last_updated_by_id.map(|u| u.0))
        .bind(tool.updated_at)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Tool {}", tool.id)));
        }
        Ok(())
    }

    async fn find_tool_by_name(
        &mut self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Tool>, RepositoryError> {
        let sql = format!("SELECT {} FROM tools WHERE name = $1 AND organization_id = $2", TOOL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(name)
            .bind(organization_id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(tool_from_row).transpose()
    }

    async fn list_tools(&mut self, organization_id: OrganizationId) -> Result<Vec<Tool>, RepositoryError> {
        let sql = format!("SELECT {} FROM tools WHERE organization_id = $1 ORDER BY name", TOOL_COLUMNS);
        let rows = sqlx::query(&sql)
            .bind(organization_id.0)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(tool_from_row).collect()
    }

    async fn tools_by_ids(&mut self, ids: &[ToolId]) -> Result<Vec<Tool>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM tools WHERE id = ANY($1) ORDER BY array_position($1, id)",
            TOOL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(uuids(ids, |id| id.0))
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(tool_from_row).collect()
    }

    async fn delete_tool(&mut self, id: ToolId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Tool {}", id)));
        }
        Ok(())
    }

    async fn insert_source(&mut self, source: &Source) -> Result<(), RepositoryError> {
        let embedding_config = source.embedding_config.as_ref().map(serde_json::to_value).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO sources (
                id, organization_id, name, description, embedding_config, metadata,
                created_by_id, last_updated_by_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(source.id.0)
        .bind(source.organization_id.0)
        .bind(&source.name)
        .bind(&source.description)
        .bind(embedding_config)
        .bind(&source.metadata)
        .bind(source.created_by_id.map(|u| u.0))
        .bind(source.last_updated_by_id.map(|u| u.0))
        .bind(source.created_at)
        .bind(source.updated_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn find_source(
        &mut self,
        id: SourceId,
        organization_id: OrganizationId,
    ) -> Result<Option<Source>, RepositoryError> {
        let sql = format!("SELECT {} FROM sources WHERE id = $1 AND organization_id = $2", SOURCE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .bind(organization_id.0)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(source_from_row).transpose()
    }

    async fn list_sources(&mut self, organization_id: OrganizationId) -> Result<Vec<Source>, RepositoryError> {
        let sql = format!("SELECT {} FROM sources WHERE organization_id = $1 ORDER BY name", SOURCE_COLUMNS);
        let rows = sqlx::query(&sql)
            .bind(organization_id.0)
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(source_from_row).collect()
    }

    async fn sources_by_ids(&mut self, ids: &[SourceId]) -> Result<Vec<Source>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM sources WHERE id = ANY($1) ORDER BY array_position($1, id)",
            SOURCE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(uuids(ids, |id| id.0))
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(source_from_row).collect()
    }

    async fn delete_source(&mut self, id: SourceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id.0)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Source {}", id)));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let PostgresTransaction { tx } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        let PostgresTransaction { tx } = *self;
        tx.rollback().await?;
        Ok(())
    }
}
