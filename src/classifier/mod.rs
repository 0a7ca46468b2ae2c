mod rules;

use std::sync::LazyLock;

use regex::Regex;

pub use rules::{Rule, RULES};

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// What a free-text message is asking the bot to do.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    List,
    Monthly,
    Weekly,
    Delete,
    Help,
    /// Not a command, the text should be read as an expense.
    None
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    /// Extracted tokens; only `Delete` carries one, the expense id.
    pub args: Vec<String>
}

/// Classifies free text against [`RULES`], the first matching rule wins.
pub fn classify(text: &str) -> Classification {
    classify_with(RULES, text)
}

pub fn classify_with(rules: &[Rule], text: &str) -> Classification {
    let lower_text = text.to_lowercase();

    let Some(rule) = rules.iter().find(|rule| rule.matches(&lower_text)) else {
        return Classification { intent: Intent::None, args: Vec::new() }
    };

    let args = match rule.intent {
        Intent::Delete => DIGIT_RUN.find(text)
            .map(|found| vec![found.as_str().to_string()])
            .unwrap_or_default(),
        _ => Vec::new()
    };

    Classification { intent: rule.intent, args }
}
