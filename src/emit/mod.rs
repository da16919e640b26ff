// src/emit/mod.rs

pub mod builder;
pub mod naming;
pub mod prelude;
pub mod stages;
pub mod vars;

pub use builder::RulesWriter;
pub use prelude::emit_prelude;
pub use vars::ListMode;
