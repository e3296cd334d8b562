use serde::{Deserialize, Serialize};

/// Canonical question record as stored in the bank. Stored under its owning
/// quiz id in the questions collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub multi: bool,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Single letter, re-assigned canonically (A, B, C...) by storage order
    /// on every mutation of the option list. Never a client-chosen value.
    pub label: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_correct: bool,
}

/// Re-derives canonical labels by storage order so gaps never appear and
/// labels never drift across edits.
pub fn relabel_options(options: &mut [QuestionOption]) {
    for (idx, opt) in options.iter_mut().enumerate() {
        opt.label = char::from(b'A' + idx as u8).to_string();
    }
}

/// Admin input for creating or replacing a question. Labels are not part of
/// the input; they are derived from storage order.
#[derive(Debug, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub multi: bool,
    pub options: Vec<OptionInput>,
}

#[derive(Debug, Deserialize)]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub correct: bool,
}
