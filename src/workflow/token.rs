//! Action token protocol.
//!
//! A token is a short pipe-delimited ASCII string, verb first, carried as a
//! button's callback payload. It is the entire workflow state: decoding it
//! must fully determine the next step. Telegram caps callback data at 64
//! bytes, which the fixed verbs plus two numeric ids stay well under.

use thiserror::Error;

/// Malformed or unparseable action token.
///
/// Always a local bug or tampering, never a backend failure; a token that
/// fails to decode must not trigger any external call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty action token")]
    Empty,
    #[error("unknown verb: {0}")]
    UnknownVerb(String),
    #[error("wrong argument count for {verb}: expected {expected}, got {got}")]
    WrongArity {
        verb: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid numeric argument for {verb}: {value}")]
    InvalidNumber { verb: &'static str, value: String },
}

/// A decoded workflow action.
///
/// The set is closed: movies get a quality-selection sub-step
/// (`SelectQuality` then `AddWithQuality`), series add directly
/// (`AddSeries`). This asymmetry is a product decision, not an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Terminal: the item is already present, confirmation only
    AlreadyAdded,
    /// Advance to the quality-profile menu for a movie
    SelectQuality { catalog_id: i64 },
    /// Terminal: add the movie with the chosen profile
    AddWithQuality { catalog_id: i64, profile_id: i64 },
    /// Terminal: add the series with the first available profile/folder
    AddSeries { catalog_id: i64 },
}

fn parse_id(verb: &'static str, value: &str) -> Result<i64, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::InvalidNumber {
        verb,
        value: value.to_string(),
    })
}

fn check_arity(
    verb: &'static str,
    args: &[&str],
    expected: usize,
) -> Result<(), ProtocolError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::WrongArity {
            verb,
            expected,
            got: args.len(),
        })
    }
}

impl Action {
    /// Wire form of the action, suitable as callback data.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::AlreadyAdded => "already_added".to_string(),
            Self::SelectQuality { catalog_id } => format!("select_quality|{catalog_id}"),
            Self::AddWithQuality {
                catalog_id,
                profile_id,
            } => format!("add_with_quality|{catalog_id}|{profile_id}"),
            Self::AddSeries { catalog_id } => format!("add_series|{catalog_id}"),
        }
    }

    /// Decode a callback payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] for an unknown verb, wrong arity or an
    /// argument that does not parse as an integer.
    pub fn decode(data: &str) -> Result<Self, ProtocolError> {
        let mut parts = data.split('|');
        let verb = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match verb {
            "" => Err(ProtocolError::Empty),
            "already_added" => {
                check_arity("already_added", &args, 0)?;
                Ok(Self::AlreadyAdded)
            }
            "select_quality" => {
                check_arity("select_quality", &args, 1)?;
                Ok(Self::SelectQuality {
                    catalog_id: parse_id("select_quality", args[0])?,
                })
            }
            "add_with_quality" => {
                check_arity("add_with_quality", &args, 2)?;
                Ok(Self::AddWithQuality {
                    catalog_id: parse_id("add_with_quality", args[0])?,
                    profile_id: parse_id("add_with_quality", args[1])?,
                })
            }
            "add_series" => {
                check_arity("add_series", &args, 1)?;
                Ok(Self::AddSeries {
                    catalog_id: parse_id("add_series", args[0])?,
                })
            }
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_verbs() {
        assert_eq!(Action::decode("already_added"), Ok(Action::AlreadyAdded));
        assert_eq!(
            Action::decode("select_quality|27205"),
            Ok(Action::SelectQuality { catalog_id: 27205 })
        );
        assert_eq!(
            Action::decode("add_with_quality|27205|4"),
            Ok(Action::AddWithQuality {
                catalog_id: 27205,
                profile_id: 4
            })
        );
        assert_eq!(
            Action::decode("add_series|371980"),
            Ok(Action::AddSeries {
                catalog_id: 371980
            })
        );
    }

    #[test]
    fn test_encode_matches_wire_format() {
        assert_eq!(
            Action::SelectQuality { catalog_id: 27205 }.encode(),
            "select_quality|27205"
        );
        assert_eq!(
            Action::AddWithQuality {
                catalog_id: 27205,
                profile_id: 4
            }
            .encode(),
            "add_with_quality|27205|4"
        );
    }

    #[test]
    fn test_unknown_verb_is_protocol_error() {
        assert_eq!(
            Action::decode("drop_tables|1"),
            Err(ProtocolError::UnknownVerb("drop_tables".to_string()))
        );
        assert_eq!(Action::decode(""), Err(ProtocolError::Empty));
    }

    #[test]
    fn test_wrong_arity_is_protocol_error() {
        assert!(matches!(
            Action::decode("select_quality"),
            Err(ProtocolError::WrongArity { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            Action::decode("already_added|extra"),
            Err(ProtocolError::WrongArity { expected: 0, got: 1, .. })
        ));
        assert!(matches!(
            Action::decode("add_with_quality|27205"),
            Err(ProtocolError::WrongArity { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_non_numeric_argument_is_protocol_error() {
        assert!(matches!(
            Action::decode("select_quality|abc"),
            Err(ProtocolError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Action::decode("add_with_quality|27205|x"),
            Err(ProtocolError::InvalidNumber { .. })
        ));
    }
}
