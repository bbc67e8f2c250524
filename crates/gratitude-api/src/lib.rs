pub mod error;
pub mod intents;
pub mod middleware;
pub mod notes;
pub mod reactions;
pub mod routes;
pub mod state;
