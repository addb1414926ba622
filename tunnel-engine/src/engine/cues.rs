//! Progress-interval cues: overlay visibility and one-shot enter effects.
//!
//! Intervals may wrap around the end of the path (`start > end`), which is how a
//! looping tunnel keeps a cue visible across the seam. Evaluation returns the
//! transitions and effects; callers decide how to show or play them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueEffect {
    /// Play the manifest's cue sound.
    Sound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueInterval {
    pub id: String,
    pub start: f32,
    pub end: f32,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "effect")]
    pub on_enter_once: Option<CueEffect>,
}

impl CueInterval {
    pub fn contains(&self, progress: f32) -> bool {
        if self.start < self.end {
            progress >= self.start && progress < self.end
        } else {
            (progress >= self.start && progress < 1.0) || (progress >= 0.0 && progress < self.end)
        }
    }

    pub fn wraps(&self) -> bool {
        self.start >= self.end
    }
}

/// When a cue's one-shot effect may fire again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneShotPolicy {
    #[default]
    OncePerSession,
    OncePerActivation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTransition {
    pub id: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredEffect {
    pub id: String,
    pub effect: CueEffect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueUpdate {
    pub transitions: Vec<CueTransition>,
    pub effects: Vec<FiredEffect>,
}

impl CueUpdate {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.effects.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CueActivationSet {
    policy: OneShotPolicy,
    active: HashSet<String>,
    fired: HashSet<String>,
}

impl CueActivationSet {
    pub fn new(policy: OneShotPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> OneShotPolicy {
        self.policy
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    pub fn has_fired(&self, id: &str) -> bool {
        self.fired.contains(id)
    }

    /// Active cue ids in interval order.
    pub fn active_ids<'a>(&self, intervals: &'a [CueInterval]) -> Vec<&'a str> {
        intervals
            .iter()
            .filter(|cue| self.active.contains(&cue.id))
            .map(|cue| cue.id.as_str())
            .collect()
    }

    pub fn update(&mut self, progress: f32, intervals: &[CueInterval]) -> CueUpdate {
        let mut update = CueUpdate::default();

        for cue in intervals {
            let inside = cue.contains(progress);
            let was_active = self.active.contains(&cue.id);

            match (was_active, inside) {
                (false, true) => {
                    self.active.insert(cue.id.clone());
                    update.transitions.push(CueTransition {
                        id: cue.id.clone(),
                        visible: true,
                    });

                    if let Some(effect) = cue.on_enter_once {
                        let permitted = match self.policy {
                            OneShotPolicy::OncePerSession => !self.fired.contains(&cue.id),
                            OneShotPolicy::OncePerActivation => true,
                        };
                        if permitted {
                            self.fired.insert(cue.id.clone());
                            update.effects.push(FiredEffect {
                                id: cue.id.clone(),
                                effect,
                            });
                        }
                    }
                }
                (true, false) => {
                    self.active.remove(&cue.id);
                    update.transitions.push(CueTransition {
                        id: cue.id.clone(),
                        visible: false,
                    });
                }
                _ => {}
            }
        }

        update
    }
}
