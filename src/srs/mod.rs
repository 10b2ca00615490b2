pub mod distractors;
pub mod session;
pub mod sm2;

pub use distractors::{build_options, select_distractors};
pub use session::Reviewer;
pub use sm2::{update_schedule, Schedule};
