#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

pub mod app;
pub mod card;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod generation;
pub mod history;
pub mod manifestation;
pub mod speech;

pub use config::Config;
pub use error::{Result, WishError};
