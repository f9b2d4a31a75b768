pub mod extractor;
pub mod jwt;
pub mod revocation;
pub mod state;
pub mod test_utils;

pub use state::AppState;
