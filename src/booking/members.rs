//! Capacity-bounded traveler list
//!
//! A group booking lists at most `maxMembers` travelers besides the primary
//! client. The list shrinks from the tail when capacity drops and only grows by
//! an explicit add or a reseed.

use crate::booking::model::{CapacityInput, PrototypeMember, TravelerMember};
use crate::core::dates::normalize_date_string;
use crate::core::error::{DeskError, PreconditionError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    #[error("member list is full ({max_members} members allowed)")]
    AtCapacity { max_members: u32 },

    #[error("no member at index {index} (list has {len} members)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<MemberError> for PreconditionError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::AtCapacity { max_members } => {
                PreconditionError::MemberCapacityReached { max_members }
            }
            MemberError::IndexOutOfRange { index, len } => PreconditionError::IndexOutOfRange {
                list: "member".to_string(),
                index,
                len,
            },
        }
    }
}

impl From<MemberError> for DeskError {
    fn from(err: MemberError) -> Self {
        PreconditionError::from(err).into()
    }
}

/// Outcome of fitting a member list to a new capacity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    pub kept: Vec<TravelerMember>,
    /// Members removed from the tail, in their original order
    pub dropped: Vec<TravelerMember>,
}

impl Reconciliation {
    /// Display names of the dropped members
    ///
    /// Positions refer to the list before truncation.
    pub fn dropped_names(&self) -> Vec<String> {
        let offset = self.kept.len();
        self.dropped
            .iter()
            .enumerate()
            .map(|(i, m)| m.display_name(offset + i))
            .collect()
    }
}

/// `max(adults + childrenBandA + childrenBandB - 1, 0)`
pub fn compute_max_members(capacity: &CapacityInput) -> u32 {
    capacity.max_members()
}

/// Build a fresh member list from a client's family and friends
pub fn seed_from_prototype(prototypes: &[PrototypeMember], max_members: u32) -> Vec<TravelerMember> {
    prototypes
        .iter()
        .take(max_members as usize)
        .map(from_prototype)
        .collect()
}

/// Blank-safe conversion of a stored family/friend record
pub fn from_prototype(proto: &PrototypeMember) -> TravelerMember {
    fn text(value: &Option<String>) -> String {
        value.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    TravelerMember {
        id: None,
        name: text(&proto.name),
        gender: text(&proto.gender),
        relation: text(&proto.relation),
        date_of_birth: normalize_date_string(proto.date_of_birth.as_deref().unwrap_or_default()),
        food_type: text(&proto.food_type),
        mobile: text(&proto.mobile),
        email: text(&proto.email),
        id_proof_type: text(&proto.id_proof_type),
        id_proof_number: text(&proto.id_proof_number),
    }
}

/// Truncate from the tail so that `kept.len() <= max_members`
pub fn reconcile(mut current: Vec<TravelerMember>, max_members: u32) -> Reconciliation {
    let max = max_members as usize;
    let dropped = if current.len() > max {
        current.split_off(max)
    } else {
        Vec::new()
    };

    Reconciliation {
        kept: current,
        dropped,
    }
}

/// Append one blank member, unless the list is full
pub fn append(current: &mut Vec<TravelerMember>, max_members: u32) -> Result<(), MemberError> {
    if current.len() >= max_members as usize {
        return Err(MemberError::AtCapacity { max_members });
    }
    current.push(TravelerMember::default());
    Ok(())
}

/// Remove the member at `index`
pub fn remove(current: &mut Vec<TravelerMember>, index: usize) -> Result<TravelerMember, MemberError> {
    if index >= current.len() {
        return Err(MemberError::IndexOutOfRange {
            index,
            len: current.len(),
        });
    }
    Ok(current.remove(index))
}
