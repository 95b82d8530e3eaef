//! Greedy regrouping of chunks under a size budget

use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{Chunk, Group};

/// Pack consecutive chunks into groups of at most `target_size_mb`.
///
/// Single pass in chunk order. A chunk larger than the target on its own
/// becomes a singleton group; chunks are never subdivided.
pub fn group_by_size(chunks: Vec<Chunk>, target_size_mb: f64) -> Result<Vec<Group>, DomainError> {
    if !(target_size_mb > 0.0) || !target_size_mb.is_finite() {
        return Err(DomainError::Input(format!(
            "Group target size must be positive, got {}",
            target_size_mb
        )));
    }

    let mut groups = Vec::new();
    let mut current: Option<Group> = None;

    for chunk in chunks {
        if chunk.size_mb() > target_size_mb {
            warn!(
                "Chunk {} is {:.2} MB, above the {:.2} MB target; it will form its own part",
                chunk.index,
                chunk.size_mb(),
                target_size_mb
            );
        }

        current = match current.take() {
            Some(mut group) if group.cumulative_size_mb() + chunk.size_mb() <= target_size_mb => {
                group.push(chunk);
                Some(group)
            }
            Some(group) => {
                groups.push(group);
                Some(Group::new(chunk))
            }
            None => Some(Group::new(chunk)),
        };
    }
    groups.extend(current);

    debug!("Grouped into {} group(s) at {:.2} MB", groups.len(), target_size_mb);
    Ok(groups)
}
