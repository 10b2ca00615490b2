use serde::{Deserialize, Serialize};

/// How a question expects its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
  /// Pick one of a closed set of options
  MultipleChoice,
  /// Free-text entry
  TypedAnswer,
}

/// Question format shown for a card, escalating with mastery.
///
/// Tagged variants replace the original API's string matching; the serde
/// renames keep that API's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
  /// Image plus target word shown; pick the translation
  #[serde(rename = "image_and_word_to_translation_mc")]
  ImageAndWordToTranslation,
  /// Image only; pick the target word
  #[serde(rename = "image_to_word_mc")]
  ImageToWord,
  /// Target word shown; pick the translation
  #[serde(rename = "word_to_translation_mc")]
  WordToTranslation,
  /// Target word shown; pick the matching image
  #[serde(rename = "word_to_image_mc")]
  WordToImage,
  /// Image only; type the target word
  #[serde(rename = "image_to_type_answer")]
  ImageToTypedWord,
  /// Native translation shown; type the target word
  #[serde(rename = "translation_to_type_answer")]
  TranslationToTypedWord,
}

impl QuestionType {
  /// Deterministic mapping from consecutive successful recalls to
  /// question format. Everything at or past mastery collapses to the
  /// hardest format.
  pub fn for_repetitions(repetitions: i64) -> Self {
    match repetitions {
      0 => Self::ImageAndWordToTranslation,
      1 => Self::ImageToWord,
      2 => Self::WordToTranslation,
      3 => Self::WordToImage,
      4 => Self::ImageToTypedWord,
      _ => Self::TranslationToTypedWord,
    }
  }

  pub fn answer_mode(&self) -> AnswerMode {
    match self {
      Self::ImageAndWordToTranslation
      | Self::ImageToWord
      | Self::WordToTranslation
      | Self::WordToImage => AnswerMode::MultipleChoice,
      Self::ImageToTypedWord | Self::TranslationToTypedWord => AnswerMode::TypedAnswer,
    }
  }

  pub fn is_multiple_choice(&self) -> bool {
    self.answer_mode() == AnswerMode::MultipleChoice
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ImageAndWordToTranslation => "image_and_word_to_translation_mc",
      Self::ImageToWord => "image_to_word_mc",
      Self::WordToTranslation => "word_to_translation_mc",
      Self::WordToImage => "word_to_image_mc",
      Self::ImageToTypedWord => "image_to_type_answer",
      Self::TranslationToTypedWord => "translation_to_type_answer",
    }
  }
}

/// One multiple-choice option. Text-only for word/translation
/// questions; carries an image for word-to-image questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
  pub text: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

/// Post-answer review block, attached to every question regardless of
/// its format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
  pub word: String,
  pub translation: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

/// Fully assembled question payload for one card in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub card_id: i64,
  pub question_type: QuestionType,
  pub prompt: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub word: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub options: Vec<AnswerOption>,
  pub correct_answer: String,
  pub feedback: Feedback,
}
