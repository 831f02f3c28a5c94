//! Answer generation against the hosted model backend.

mod generator;
mod titan;

pub use generator::AnswerGenerator;
pub use titan::TitanGenerator;
