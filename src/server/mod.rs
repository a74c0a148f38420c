mod account;
pub mod dto;
pub mod response;
mod router;
mod tracker;

pub use router::{AppState, create_router};
