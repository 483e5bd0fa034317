//! API endpoint implementations.

mod assistants;
mod crons;
mod runs;
mod store;
mod threads;

pub use assistants::{AssistantsApi, ListVersionsRequest};
pub use crons::CronsApi;
pub use runs::RunsApi;
pub use store::StoreApi;
pub use threads::ThreadsApi;
