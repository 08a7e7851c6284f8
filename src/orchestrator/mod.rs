mod controller;
mod debounce;
mod state;

pub use controller::{
    FetchOutcome, Orchestrator, OrchestratorSettings, SideEffectError, SIDE_EFFECT_CAPACITY,
};
pub use debounce::debounce;
pub use state::{PageSnapshot, SearchState, GENERIC_FETCH_ERROR};
