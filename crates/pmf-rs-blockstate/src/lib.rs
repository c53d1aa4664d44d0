//! Translation of legacy `(id, meta)` block pairs into modern Bedrock block states.
//!
//! The mapping is a static table (`data/legacy_states.json`) compiled into the
//! crate. Pairs missing from it go through an explicit [`UnmappedPolicy`].

pub mod error;
pub mod legacy;
pub mod mapper;
pub mod state;

pub use error::BlockStateError;
pub use legacy::LegacyVoxelKey;
pub use mapper::{BlockStateMapper, UnmappedPolicy};
pub use state::{CanonicalBlockState, StateValue, AIR_NAME};
