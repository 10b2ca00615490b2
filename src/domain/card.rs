use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
  #[serde(rename = "basic")]
  Basic,
  #[serde(rename = "multiple-choice")]
  MultipleChoice,
  #[serde(rename = "fill-in-the-blank")]
  FillInTheBlank,
}

impl CardKind {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "basic" => Some(Self::Basic),
      "multiple-choice" => Some(Self::MultipleChoice),
      "fill-in-the-blank" => Some(Self::FillInTheBlank),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Basic => "basic",
      Self::MultipleChoice => "multiple-choice",
      Self::FillInTheBlank => "fill-in-the-blank",
    }
  }
}

/// Immutable card content. Owned by the content-management side;
/// the review core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
  pub id: i64,
  pub kind: CardKind,
  pub level: i64,
  /// Native-language text (or a serialized question for MC-type cards)
  pub prompt: String,
  /// Target-language text, the ground truth answer
  pub answer: String,
  pub image_url: Option<String>,
  pub lang: Option<String>,
}

impl CardContent {
  pub fn new(kind: CardKind, prompt: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      id: 0,
      kind,
      level: 1,
      prompt: prompt.into(),
      answer: answer.into(),
      image_url: None,
      lang: None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
}
