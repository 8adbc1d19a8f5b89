//! Turning parsed agent objects into clue and guess decisions.
//!
//! Every rejection carries the feedback sentence the agent sees on its next attempt.

use crate::parse::JsonObject;
use derive_more::{Display, Error};
use serde_json::Value;

/// A spymaster's proposal, not yet checked by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueDecision {
    /// The clue word, trimmed and upper-cased.
    pub word: String,
    /// How many cards the clue covers.
    pub number: i64,
    /// Optional explanation from the agent.
    pub reasoning: String,
}

/// What the operatives want to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessAction {
    /// Reveal the card matching this raw text.
    Guess(String),
    /// Stop guessing for this turn.
    End,
}

/// An operative decision with its explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessDecision {
    /// Chosen action.
    pub action: GuessAction,
    /// Optional explanation from the agent.
    pub reasoning: String,
}

/// A parsed object that does not describe a usable decision.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DecisionError {
    /// `clue` missing, not a string, or not purely alphabetic.
    #[display("Clue must be a single alphabetical word.")]
    ClueNotAlphabetic,
    /// `number` missing or not an integer.
    #[display("Number must be an integer between 0 and {max}.")]
    NumberNotInteger {
        /// Highest allowed number.
        max: i64,
    },
    /// `number` outside the allowed range.
    #[display("Number must be between 0 and {max} inclusive.")]
    NumberOutOfRange {
        /// Highest allowed number.
        max: i64,
    },
    /// `action` missing or not a string.
    #[display("The action field is missing.")]
    MissingAction,
    /// `action` neither `guess` nor `end`.
    #[display("Action must be either 'guess' or 'end'.")]
    UnknownAction,
    /// A guess without a `word` string.
    #[display("Guesses must include the word value.")]
    MissingWord,
}

fn reasoning(object: &JsonObject) -> String {
    object
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads an integer from a JSON number or numeric string, truncating integral floats only.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads `clue`, `number` and `reasoning`, enforcing `0..=max_number`.
pub fn clue_decision(object: &JsonObject, max_number: i64) -> Result<ClueDecision, DecisionError> {
    let word = object
        .get("clue")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|w| !w.is_empty() && w.chars().all(char::is_alphabetic))
        .ok_or(DecisionError::ClueNotAlphabetic)?;

    let number = object
        .get("number")
        .and_then(integer)
        .ok_or(DecisionError::NumberNotInteger { max: max_number })?;
    if !(0..=max_number).contains(&number) {
        return Err(DecisionError::NumberOutOfRange { max: max_number });
    }

    Ok(ClueDecision {
        word: word.to_uppercase(),
        number,
        reasoning: reasoning(object),
    })
}

/// Reads `action`, `word` and `reasoning`.
pub fn guess_decision(object: &JsonObject) -> Result<GuessDecision, DecisionError> {
    let action = object
        .get("action")
        .and_then(Value::as_str)
        .ok_or(DecisionError::MissingAction)?;

    let action = match action.trim().to_lowercase().as_str() {
        "end" => GuessAction::End,
        "guess" => {
            let word = object
                .get("word")
                .and_then(Value::as_str)
                .ok_or(DecisionError::MissingWord)?;
            GuessAction::Guess(word.to_string())
        }
        _ => return Err(DecisionError::UnknownAction),
    };

    Ok(GuessDecision {
        action,
        reasoning: reasoning(object),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn clue_accepts_numeric_strings_and_integral_floats() {
        let d = clue_decision(&object(json!({"clue": " tide ", "number": "2"})), 4).unwrap();
        assert_eq!(d.word, "TIDE");
        assert_eq!(d.number, 2);
        let raw = object(json!({"clue": "tide", "number": 3.0, "reasoning": "r"}));
        let d = clue_decision(&raw, 4).unwrap();
        assert_eq!(d.number, 3);
        assert_eq!(d.reasoning, "r");
    }

    #[test]
    fn clue_rejections_carry_feedback() {
        let err = clue_decision(&object(json!({"clue": "two words", "number": 1})), 4).unwrap_err();
        assert_eq!(err.to_string(), "Clue must be a single alphabetical word.");
        let err = clue_decision(&object(json!({"number": 1})), 4).unwrap_err();
        assert_eq!(err, DecisionError::ClueNotAlphabetic);
        let err = clue_decision(&object(json!({"clue": "tide", "number": 2.5})), 4).unwrap_err();
        assert_eq!(err.to_string(), "Number must be an integer between 0 and 4.");
        let err = clue_decision(&object(json!({"clue": "tide", "number": 5})), 4).unwrap_err();
        assert_eq!(err.to_string(), "Number must be between 0 and 4 inclusive.");
        let err = clue_decision(&object(json!({"clue": "tide", "number": -1})), 4).unwrap_err();
        assert_eq!(err, DecisionError::NumberOutOfRange { max: 4 });
    }

    #[test]
    fn guess_parses_both_actions() {
        let d = guess_decision(&object(json!({"action": " Guess ", "word": "moon"}))).unwrap();
        assert_eq!(d.action, GuessAction::Guess("moon".to_string()));
        let d = guess_decision(&object(json!({"action": "END", "word": null}))).unwrap();
        assert_eq!(d.action, GuessAction::End);
    }

    #[test]
    fn guess_rejections_carry_feedback() {
        assert_eq!(
            guess_decision(&object(json!({"word": "moon"}))),
            Err(DecisionError::MissingAction)
        );
        assert_eq!(
            guess_decision(&object(json!({"action": "pass"}))),
            Err(DecisionError::UnknownAction)
        );
        assert_eq!(
            guess_decision(&object(json!({"action": "guess", "word": 3}))),
            Err(DecisionError::MissingWord)
        );
    }
}
