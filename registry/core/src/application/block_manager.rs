// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Block upsert used while creating agents with inline memory blocks.

use tracing::debug;

use crate::application::errors::ServiceResult;
use crate::domain::actor::Actor;
use crate::domain::block::{Block, CreateBlock};
use crate::domain::repository::StoreTransaction;

/// Overwrite the block named by `create.id` when it exists in the actor's
/// organization, otherwise insert a new block. Runs on the caller's
/// transaction.
pub async fn create_or_update_block(
    tx: &mut dyn StoreTransaction,
    create: &CreateBlock,
    actor: &Actor,
) -> ServiceResult<Block> {
    let existing = match create.id {
        Some(id) => tx.find_block(id, actor.organization_id).await?,
        None => None,
    };

    let block = match existing {
        Some(mut block) => {
            block.overwrite(create, actor)?;
            debug!(block_id = %block.id, label = %block.label, "Updating block");
            block
        }
        None => {
            let block = Block::new(create, actor)?;
            debug!(block_id = %block.id, label = %block.label, "Creating block");
            block
        }
    };

    tx.save_block(&block).await?;
    Ok(block)
}
