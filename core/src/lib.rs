pub mod audit;
pub mod checklist;
pub mod determinism;
pub mod document;
pub mod run;
pub mod sink;
pub mod validator;

pub mod error;

pub use run::manager::run_validation;
