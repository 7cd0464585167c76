//! Report request bodies.
//!
//! Two body shapes are in service: terminals bound to a group send the
//! identifier under `rfid` together with their `group_id`, standalone
//! terminals send only `uid`.

use rollcall_core::CardIdentifier;
use serde::Serialize;

/// JSON body of one report request.
///
/// ```
/// use rollcall_core::CardIdentifier;
/// use rollcall_network::ReportPayload;
///
/// let id = CardIdentifier::normalize(&[0x04, 0xA1]);
/// let payload = ReportPayload::new(&id, Some(3));
/// assert_eq!(
///     serde_json::to_string(&payload).unwrap(),
///     r#"{"rfid":"04a1","group_id":3}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportPayload<'a> {
    /// `{"rfid": "<hex>", "group_id": <n>}`
    Grouped { rfid: &'a str, group_id: i32 },

    /// `{"uid": "<hex>"}`
    Minimal { uid: &'a str },
}

impl<'a> ReportPayload<'a> {
    /// Pick the body shape from the terminal's group assignment.
    pub fn new(id: &'a CardIdentifier, group_id: Option<i32>) -> Self {
        match group_id {
            Some(group_id) => Self::Grouped {
                rfid: id.as_str(),
                group_id,
            },
            None => Self::Minimal { uid: id.as_str() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_payload() {
        let id = CardIdentifier::normalize(&[0xB2, 0x00]);
        let value = serde_json::to_value(ReportPayload::new(&id, None)).unwrap();
        assert_eq!(value, json!({ "uid": "b200" }));
    }

    #[test]
    fn test_grouped_payload() {
        let id = CardIdentifier::normalize(&[0x04, 0x5A, 0x1B, 0x22]);
        let value = serde_json::to_value(ReportPayload::new(&id, Some(12))).unwrap();
        assert_eq!(value, json!({ "rfid": "045a1b22", "group_id": 12 }));
    }

    #[test]
    fn test_negative_group_id_is_sent_verbatim() {
        let id = CardIdentifier::normalize(&[0x01]);
        let value = serde_json::to_value(ReportPayload::new(&id, Some(-1))).unwrap();
        assert_eq!(value["group_id"], json!(-1));
    }
}
