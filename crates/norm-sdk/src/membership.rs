//! The membership-toggle flow.
//!
//! A togglable membership (e.g. "the user follows this collection") is held
//! twice in the cache: as a boolean flag on the entity record and as the
//! presence of an edge in a followed-list query result. This module is the
//! one place that writes both, so the two representations cannot diverge:
//! the optimistic closure and the confirmation closure run the same
//! idempotent co-write, and a failed remote call rolls both back together.

use serde_json::Value;
use tracing::debug;

use norm_mutate::{CacheHandles, ListTarget, MutateResult, PendingDirection};
use norm_query::{insert_edge_front, remove_edge, Edge};
use norm_store::{EntityStore, StoreError};
use norm_types::{EntityId, Fragment, QueryKey};

use crate::error::SdkResult;
use crate::session::CacheSession;

/// Description of one togglable membership: which entity, which flag field,
/// and which cached list mirrors it.
#[derive(Clone, Debug)]
pub struct MembershipToggle {
    /// The entity whose membership is toggled.
    pub entity: EntityId,
    /// Fragment declaring (at least) the flag field.
    pub flag_fragment: Fragment,
    /// Boolean field mirroring membership, e.g. `"followed"`.
    pub flag_field: String,
    /// The cached query whose edge list mirrors membership.
    pub list_query: QueryKey,
    /// Path of the edge list inside the cached result tree.
    pub list_path: Vec<String>,
    /// Remote operation fired when joining.
    pub join_operation: String,
    /// Remote operation fired when leaving.
    pub leave_operation: String,
}

/// Flip the flag and reconcile the edge list, in that order.
///
/// Idempotent: re-running after a successful run changes nothing, which is
/// what makes it safe to use both as the optimistic write and as the
/// confirmation write.
fn apply_toggle(
    handles: &CacheHandles,
    toggle: &MembershipToggle,
    direction: PendingDirection,
) -> MutateResult<()> {
    if !toggle.flag_fragment.declares(&toggle.flag_field) {
        return Err(StoreError::FieldNotDeclared {
            fragment: toggle.flag_fragment.name().to_string(),
            field: toggle.flag_field.clone(),
        }
        .into());
    }

    let accessor = handles.fragments();
    let mut data = accessor.read_fragment(&toggle.entity, &toggle.flag_fragment)?;
    let joined = direction == PendingDirection::Joining;
    data.set(&toggle.flag_field, joined);
    accessor.write_fragment(&toggle.entity, &toggle.flag_fragment, data)?;

    let path: Vec<&str> = toggle.list_path.iter().map(String::as_str).collect();
    match direction {
        PendingDirection::Joining => {
            // Denormalize the freshly merged record into the edge.
            let record = handles.store().get(&toggle.entity)?.unwrap_or_default();
            let edge = Edge::new(toggle.entity.clone(), record);
            insert_edge_front(handles.queries(), &toggle.list_query, &path, edge)?;
        }
        PendingDirection::Leaving => {
            remove_edge(handles.queries(), &toggle.list_query, &path, &toggle.entity)?;
        }
    }
    Ok(())
}

impl CacheSession {
    /// Toggle a membership optimistically.
    ///
    /// The flag flip and the edge-list change apply immediately; the named
    /// join/leave operation then goes to the remote service. On success the
    /// same co-write re-runs as confirmation (a no-op when the optimistic
    /// state already matches); on failure the toggled entity's record and its
    /// own edge roll back to their pre-toggle state, leaving concurrent
    /// toggles for other identities untouched. A toggle for an identity that
    /// is already pending is rejected with
    /// [`norm_mutate::MutateError::AlreadyPending`].
    pub async fn toggle_membership(
        &self,
        toggle: &MembershipToggle,
        direction: PendingDirection,
        variables: Value,
    ) -> SdkResult<Value> {
        let operation = match direction {
            PendingDirection::Joining => toggle.join_operation.as_str(),
            PendingDirection::Leaving => toggle.leave_operation.as_str(),
        };
        debug!(entity = %toggle.entity, %direction, operation, "membership toggle");

        let path: Vec<&str> = toggle.list_path.iter().map(String::as_str).collect();
        let result = self
            .executor()
            .execute_optimistic(
                operation,
                variables,
                &toggle.entity,
                ListTarget {
                    key: &toggle.list_query,
                    path: &path,
                },
                direction,
                |handles| apply_toggle(handles, toggle, direction),
                |handles, _result| apply_toggle(handles, toggle, direction),
            )
            .await?;
        Ok(result)
    }
}
