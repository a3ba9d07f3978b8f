pub mod cli;
pub mod daypass;
pub mod desk;
pub mod error;
pub mod fees;
pub mod form;
pub mod hints;
pub mod reconcile;
pub mod registry;
pub mod serial;
pub mod submission;
