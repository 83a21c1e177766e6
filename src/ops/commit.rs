use tracing::info;

use crate::config::UserConfig;
use crate::error::{CommitStep, CommitStepExt, Error, Result};
use crate::hash::Hash;
use crate::head::{read_head, write_head};
use crate::index::{clear_staged_flags, Index};
use crate::object::write_commit;
use crate::ops::build_tree;
use crate::repo::Repo;
use crate::types::CommitDraft;

/// record the current index as a new commit on top of HEAD
///
/// the commit object is stored before HEAD moves, and HEAD moves before the
/// staged flags are cleared. a failure is reported with the step it happened in.
pub fn create_commit(repo: &Repo, message: &str, author: &str) -> Result<Hash> {
    let tree = build_tree(repo).during(CommitStep::BuildTree)?;
    let parent = read_head(repo).during(CommitStep::ReadHead)?;

    let sealed = CommitDraft::new(tree, parent, author, message)
        .seal()
        .during(CommitStep::Serialize)?;

    let hash = write_commit(repo, &sealed).during(CommitStep::StoreCommit)?;
    write_head(repo, &hash).during(CommitStep::UpdateHead)?;
    clear_staged_flags(repo, &tree).during(CommitStep::ClearIndex)?;

    info!(
        "created commit {} (tree {}, parent {})",
        hash.short(),
        tree.short(),
        parent.map(|p| p.short()).unwrap_or_else(|| "none".to_string())
    );
    Ok(hash)
}

/// commit whatever is staged, authored by the configured user
pub fn commit(repo: &Repo, message: &str) -> Result<Hash> {
    if message.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }

    let _lock = repo.lock()?;

    let index = Index::load(repo)?;
    if !index.has_staged() {
        return Err(Error::NothingStaged);
    }

    let user = UserConfig::load(repo)?;
    create_commit(repo, message, &user.author())
}
