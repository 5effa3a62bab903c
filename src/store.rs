//! Headless city store: owns the state, runs intents until they settle.
//!
//! The interactive app drives the same reducer through the tui-dispatch
//! runtime, which spawns [`resolve`] as tasks. This driver resolves effects
//! inline instead, which makes every operation an `async fn` that returns
//! once the store is idle again.

use std::collections::VecDeque;

use crate::action::Action;
use crate::effect::{resolve, Services};
use crate::reducer::reducer;
use crate::state::{AppState, CityDraft, CityId};

pub struct CityStore {
    state: AppState,
    services: Services,
}

impl CityStore {
    pub fn new(state: AppState, services: Services) -> Self {
        Self { state, services }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Dispatch `action` and every action its effects produce.
    /// Returns whether the initial dispatch changed state.
    pub async fn dispatch(&mut self, action: Action) -> bool {
        let first = reducer(&mut self.state, action);
        let changed = first.changed;
        let mut pending: VecDeque<_> = first.effects.into_iter().collect();

        while let Some(effect) = pending.pop_front() {
            let next = resolve(effect, &self.services).await;
            pending.extend(reducer(&mut self.state, next).effects);
        }
        changed
    }

    pub async fn load_all(&mut self) {
        self.dispatch(Action::CitiesFetch).await;
    }

    /// Returns `false` when `id` is already the current city.
    pub async fn load_one(&mut self, id: CityId) -> bool {
        self.dispatch(Action::CityFetch(id)).await
    }

    pub async fn create(&mut self, draft: CityDraft) {
        self.dispatch(Action::CityCreate(draft)).await;
    }

    pub async fn delete(&mut self, id: CityId) {
        self.dispatch(Action::CityDelete(id)).await;
    }
}
