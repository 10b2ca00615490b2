pub mod card;
pub mod progress;
pub mod question;

pub use card::{CardContent, CardKind, Deck};
pub use progress::{Rating, UserCardProgress};
pub use question::{AnswerMode, AnswerOption, Feedback, Question, QuestionType};
