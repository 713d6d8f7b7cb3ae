pub mod registry;
pub mod types;

pub use registry::{PlayerValueRegistry, Resolution};
pub use types::{
    InvitationalValue, PlayerId, PlayerValue, PlayerValueGroup, ResolvedValue,
    INVITATIONAL_CATEGORY, INVITATIONAL_ONLY_NOTE,
};
