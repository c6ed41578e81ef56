/// State ↔ portable JSON text.
///
/// A session may sit suspended for days between two comparisons, so the
/// whole machine state round-trips through text with no other context. The
/// loser→winner maps are encoded as a tagged structure
/// `{"dataType": "Map", "value": [[loser, winner], ...]}` instead of a plain
/// JSON object, so a reader can tell an id-keyed map apart from arbitrary
/// nesting; the layout matches how the original web client persisted its
/// sessions.
use crate::error::SortError;
use crate::types::SortState;

/// Encode a state as JSON text.
pub fn serialize_state(state: &SortState) -> Result<String, SortError> {
    Ok(serde_json::to_string(state)?)
}

/// Decode a state from JSON text produced by `serialize_state`.
pub fn deserialize_state(text: &str) -> Result<SortState, SortError> {
    Ok(serde_json::from_str(text)?)
}

/// serde adapter for the tagged map encoding, used via
/// `#[serde(with = "crate::serialize::tagged_map")]`.
pub(crate) mod tagged_map {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct TaggedMap {
        #[serde(rename = "dataType")]
        data_type: String,
        value: Vec<(String, String)>,
    }

    pub fn serialize<S>(map: &BTreeMap<String, String>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TaggedMap {
            data_type: "Map".to_string(),
            value: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
        .serialize(ser)
    }

    pub fn deserialize<'de, D>(de: D) -> Result<BTreeMap<String, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = TaggedMap::deserialize(de)?;
        if wire.data_type != "Map" {
            return Err(D::Error::custom(format!(
                "expected dataType \"Map\", got {:?}",
                wire.data_type
            )));
        }

        let mut map = BTreeMap::new();
        for (key, value) in wire.value {
            if map.contains_key(&key) {
                return Err(D::Error::custom(format!(
                    "duplicate key {key:?} in Map encoding"
                )));
            }
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{apply_decision, start_session};
    use crate::error::SortError;
    use crate::types::{Item, SortState};
    use proptest::prelude::*;

    fn items(n: usize) -> Vec<Item> {
        (1..=n)
            .map(|i| Item::new(format!("id_{i}"), format!("Item {i}")))
            .collect()
    }

    /// Drive a session with scripted left/right choices, stopping early if it
    /// completes. Returns every state visited, the initial one included.
    fn drive(n: usize, choices: &[bool]) -> Vec<SortState> {
        let mut state = start_session(&items(n));
        let mut visited = vec![state.clone()];
        for &left in choices {
            let Some(winner) = state
                .current_pair()
                .map(|p| if left { p.left.id.clone() } else { p.right.id.clone() })
            else {
                break;
            };
            state = apply_decision(&state, &winner).unwrap();
            visited.push(state.clone());
        }
        visited
    }

    #[test]
    fn test_round_trip_with_pairings_map() {
        // Two decisions into a 5-item session: the first round has closed,
        // so the stacked record carries a two-entry loser→winner map.
        let states = drive(5, &[true, false]);
        let state = states.last().unwrap();

        let text = serialize_state(state).unwrap();
        let restored = deserialize_state(&text).unwrap();
        assert_eq!(&restored, state);
    }

    #[test]
    fn test_wire_format_tags_phase_and_map() {
        let states = drive(4, &[true]);
        let text = serialize_state(states.last().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["phase"], "PAIRING");
        assert_eq!(value["round_pairings"]["dataType"], "Map");
        let entries = value["round_pairings"]["value"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0][0], "id_2");
        assert_eq!(entries[0][1], "id_1");
    }

    #[test]
    fn test_malformed_text_is_rejected() {
        let err = deserialize_state("{ not json").unwrap_err();
        assert!(matches!(err, SortError::MalformedState(_)));

        let err = deserialize_state(r#"{"phase": "NAPPING"}"#).unwrap_err();
        assert!(matches!(err, SortError::MalformedState(_)));
    }

    #[test]
    fn test_duplicate_map_keys_are_rejected() {
        let states = drive(4, &[true]);
        let text = serialize_state(states.last().unwrap()).unwrap();
        let dup = text.replace(
            r#"[["id_2","id_1"]]"#,
            r#"[["id_2","id_1"],["id_2","id_3"]]"#,
        );
        assert_ne!(dup, text, "fixture no longer matches the wire layout");
        let err = deserialize_state(&dup).unwrap_err();
        assert!(matches!(err, SortError::MalformedState(_)));
    }

    #[test]
    fn test_tag_other_than_map_is_rejected() {
        let states = drive(4, &[true]);
        let text = serialize_state(states.last().unwrap()).unwrap();
        let bad = text.replace(r#""dataType":"Map""#, r#""dataType":"Set""#);
        assert_ne!(bad, text, "fixture no longer matches the wire layout");
        assert!(deserialize_state(&bad).is_err());
    }

    proptest! {
        /// Every reachable state round-trips structurally, whichever phase
        /// the scripted decisions land it in.
        #[test]
        fn reachable_states_round_trip(n in 0usize..12, choices in proptest::collection::vec(any::<bool>(), 0..40)) {
            for state in drive(n, &choices) {
                let text = serialize_state(&state).unwrap();
                let restored = deserialize_state(&text).unwrap();
                prop_assert_eq!(restored, state);
            }
        }
    }
}
