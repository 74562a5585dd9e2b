// Drawing engine: candidate pool, winner selection, result ledger, and the
// message types shared by the controller and its views.

pub mod config;
pub mod draw;
pub mod engine;
pub mod ingest;
pub mod ledger;
pub mod pool;
pub mod protocol;

pub use config::{Config, DrawMode};
pub use draw::{draw, DrawError, DrawSession};
pub use engine::DrawEngine;
pub use ingest::IngestError;
pub use ledger::{Ledger, Winner};
pub use pool::{normalize, Pool};
