//! Line encoding for outbound commands and batch splitting for inbound
//! lines.
//!
//! Every line on the wire is a JSON *array* of command objects. We always
//! send one command per line, but the server is free to batch several
//! commands into one line, so the inbound side has to split them apart
//! before they can be classified.

use crate::scan::objects_in_array;
use crate::{ClientCommand, ProtocolError};

/// Encodes one command as a complete line body (`[{...}]`, no newline).
///
/// # Errors
/// [`ProtocolError::Encode`] if serialization fails.
pub fn encode(command: &ClientCommand) -> Result<String, ProtocolError> {
    encode_batch(std::slice::from_ref(command))
}

/// Encodes several commands into a single line body.
pub fn encode_batch(commands: &[ClientCommand]) -> Result<String, ProtocolError> {
    // A slice serializes as a JSON array, which is exactly the framing the
    // server wants.
    serde_json::to_string(commands).map_err(ProtocolError::Encode)
}

/// Splits an inbound line into the bodies of the command objects it
/// carries, in order.
///
/// A line that is not a well-formed array of objects comes back whole as
/// a single body; classification will then either find a `cmd` in it or
/// ignore it.
pub fn split_batch(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    match trimmed.as_bytes().first() {
        Some(b'[') => {
            let bodies = objects_in_array(trimmed, 0);
            if bodies.is_empty() {
                vec![trimmed]
            } else {
                bodies
            }
        }
        Some(_) => vec![trimmed],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocationId;

    #[test]
    fn test_encode_wraps_single_command_in_array() {
        let line = encode(&ClientCommand::Sync).unwrap();
        assert_eq!(line, r#"[{"cmd":"Sync"}]"#);
    }

    #[test]
    fn test_encode_batch_keeps_order() {
        let line = encode_batch(&[
            ClientCommand::GetDataPackage,
            ClientCommand::location_check(LocationId(5)),
        ])
        .unwrap();
        assert_eq!(
            line,
            r#"[{"cmd":"GetDataPackage"},{"cmd":"LocationChecks","locations":[5]}]"#
        );
    }

    #[test]
    fn test_split_batch_returns_each_object() {
        let line = r#"[{"cmd":"Connected","slot":1}, {"cmd":"ReceivedItems","index":0,"items":[]}]"#;
        let bodies = split_batch(line);
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].starts_with(r#"{"cmd":"Connected""#));
        assert!(bodies[1].ends_with("[]}"));
    }

    #[test]
    fn test_split_batch_falls_back_to_whole_line() {
        let fragment = r#"[{"cmd":"DataPackage","data":{"games":{"#;
        assert_eq!(split_batch(fragment), vec![fragment]);
        assert_eq!(split_batch("  \n"), Vec::<&str>::new());
        assert_eq!(split_batch(r#"{"cmd":"Sync"}"#), vec![r#"{"cmd":"Sync"}"#]);
    }
}
