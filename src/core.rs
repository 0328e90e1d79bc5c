pub mod assembly;
pub mod cell;
pub mod characterization;
pub mod error;
pub mod layout;
pub mod module;
pub mod selection;
