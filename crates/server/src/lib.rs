pub mod errors;
pub mod plugins;
pub mod routes;
pub mod startup;

pub use startup::run;
