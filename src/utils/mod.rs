//! Utility functions shared across the application.

mod collate;
mod parsing;
mod slug;

pub use collate::collate;
pub use parsing::{REF_SCHEME, parse_credential_ref, parse_item_ref};
pub use slug::name_to_slug;
