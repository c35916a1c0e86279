//! Eligible-set bookkeeping and aim tracking for the player.
//!
//! The registry only indexes entities; the world owns them. Effects that
//! touch interactables (Enable, Disable, Highlight, Interact) are returned to
//! the caller instead of being applied here.
use bevy::prelude::*;

use super::components::INELIGIBLE_PRIORITY;

/// Highlight transitions produced by an aim update.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AimChange {
    pub unhighlight: Option<Entity>,
    pub highlight: Option<Entity>,
}

/// What an interact input edge resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractRequest {
    /// A dialogue session is active; clear its scrolling flag.
    SkipDialogue,
    Interact(Entity),
    Ignored,
}

#[derive(Resource, Debug, Default)]
pub struct InteractionRegistry {
    members: Vec<Entity>,
    aimed_at: Option<Entity>,
    probe_hit: bool,
    disabled: bool,
    pending_disable: Vec<Entity>,
    rescan_requested: bool,
}

impl InteractionRegistry {
    /// Adds `entity` unless interaction is disabled, it is already present,
    /// or `priority` marks it ineligible.
    pub fn register(&mut self, entity: Entity, priority: i32) -> bool {
        if self.disabled || priority == INELIGIBLE_PRIORITY || self.contains(entity) {
            return false;
        }
        debug!(target: "interaction", "Registered {entity}");
        self.members.push(entity);
        true
    }

    pub fn deregister(&mut self, entity: Entity) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != entity);
        let removed = self.members.len() != before;
        if removed {
            debug!(target: "interaction", "Deregistered {entity}");
        }
        removed
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Disabling queues Disable for every member and drops any pending
    /// rescan. Enabling clears the set and requests a proximity rescan.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.disabled = false;
            self.members.clear();
            self.rescan_requested = true;
        } else {
            self.disabled = true;
            self.rescan_requested = false;
            self.pending_disable.extend(self.members.iter().copied());
        }
        debug!(target: "interaction", "Interaction enabled: {enabled}");
    }

    pub fn take_pending_disable(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending_disable)
    }

    pub fn take_rescan(&mut self) -> bool {
        std::mem::take(&mut self.rescan_requested)
    }

    pub fn aimed_at(&self) -> Option<Entity> {
        self.aimed_at
    }

    /// Points the aim at `entity` without consulting the probe.
    pub fn aim_at(&mut self, entity: Entity) {
        self.aimed_at = Some(entity);
    }

    /// Drops every reference to a despawned entity.
    pub fn forget(&mut self, entity: Entity) {
        self.deregister(entity);
        self.pending_disable.retain(|pending| *pending != entity);
        if self.aimed_at == Some(entity) {
            self.aimed_at = None;
        }
    }

    /// Applies one probe result. `hit` is the interactable under the probe.
    pub fn update_aim(&mut self, hit: Option<Entity>, dialogue_active: bool) -> AimChange {
        if self.disabled {
            self.probe_hit = false;
            return AimChange {
                unhighlight: self.aimed_at.take(),
                highlight: None,
            };
        }

        match hit {
            Some(entity) if !dialogue_active => {
                self.probe_hit = true;
                if self.aimed_at == Some(entity) {
                    return AimChange::default();
                }
                let previous = self.aimed_at.replace(entity);
                AimChange {
                    unhighlight: previous,
                    highlight: self.contains(entity).then_some(entity),
                }
            }
            _ => {
                self.probe_hit = false;
                AimChange {
                    unhighlight: self.aimed_at.take(),
                    highlight: None,
                }
            }
        }
    }

    /// Resolves an interact edge. `priority_of` returns `None` for entities
    /// that no longer exist.
    pub fn request_interact(
        &mut self,
        dialogue_active: bool,
        priority_of: impl Fn(Entity) -> Option<i32>,
    ) -> InteractRequest {
        if dialogue_active {
            return InteractRequest::SkipDialogue;
        }
        let Some(target) = self.aimed_at else {
            return InteractRequest::Ignored;
        };
        if self.disabled || !self.probe_hit || self.members.is_empty() || !self.contains(target) {
            return InteractRequest::Ignored;
        }

        self.collect_garbage(priority_of);
        InteractRequest::Interact(target)
    }

    /// Removes members that are gone or report the ineligible priority.
    pub fn collect_garbage(&mut self, priority_of: impl Fn(Entity) -> Option<i32>) {
        self.members.retain(|member| {
            let keep = matches!(priority_of(*member), Some(priority) if priority != INELIGIBLE_PRIORITY);
            if !keep {
                debug!(target: "interaction", "Collected {member}");
            }
            keep
        });
    }

    /// Members ordered by ascending priority, for target selection without a
    /// probe.
    pub fn by_priority(&self, priority_of: impl Fn(Entity) -> Option<i32>) -> Vec<Entity> {
        let mut ranked: Vec<(i32, Entity)> = self
            .members
            .iter()
            .filter_map(|member| priority_of(*member).map(|priority| (priority, *member)))
            .collect();
        ranked.sort_by_key(|(priority, _)| *priority);
        ranked.into_iter().map(|(_, member)| member).collect()
    }
}
