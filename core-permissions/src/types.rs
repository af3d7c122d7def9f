//! Permission identifiers, states, and the per-round grant result.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use bridge_traits::{BridgeError, Result};

/// Identifier of a single host permission.
///
/// Permissions travel as numbers on the wire; the identifiers themselves
/// are host-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(pub u32);

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one permission in one request round.
///
/// Terminal for the round; `RequiresJustification` can only transition to
/// `Denied`, and only through the local justification-rejection transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    RequiresJustification,
    Denied,
}

impl PermissionState {
    /// Numeric wire encoding.
    pub fn code(&self) -> u8 {
        match self {
            PermissionState::Granted => 0,
            PermissionState::RequiresJustification => 1,
            PermissionState::Denied => 2,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(PermissionState::Granted),
            1 => Some(PermissionState::RequiresJustification),
            2 => Some(PermissionState::Denied),
            _ => None,
        }
    }
}

impl Serialize for PermissionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PermissionState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = u64::deserialize(deserializer)?;
        PermissionState::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown permission state {code}")))
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PermissionState::Granted => "granted",
            PermissionState::RequiresJustification => "requires justification",
            PermissionState::Denied => "denied",
        };
        write!(f, "{text}")
    }
}

/// Result of one permission request round.
///
/// Keeps the entries in request order. The only in-place mutation is
/// [`reject_justifications`](PermissionGrantResult::reject_justifications).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrantResult {
    entries: Vec<(PermissionId, PermissionState)>,
}

impl PermissionGrantResult {
    pub fn new(entries: Vec<(PermissionId, PermissionState)>) -> Self {
        Self { entries }
    }

    /// Decode a host response for the given requested permissions.
    ///
    /// The host answers with the states in request order, either as a bare
    /// array or as an object keyed by permission number.
    pub fn from_wire(requested: &[PermissionId], value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(states) => {
                if states.len() != requested.len() {
                    return Err(BridgeError::protocol(format!(
                        "permission response has {} entries for {} requested",
                        states.len(),
                        requested.len()
                    )));
                }
                let entries = requested
                    .iter()
                    .zip(states)
                    .map(|(id, state)| Ok((*id, decode_state(state)?)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::new(entries))
            }
            serde_json::Value::Object(map) => {
                let entries = requested
                    .iter()
                    .map(|id| {
                        let state = map.get(&id.to_string()).ok_or_else(|| {
                            BridgeError::protocol(format!(
                                "permission response is missing permission {id}"
                            ))
                        })?;
                        Ok((*id, decode_state(state)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::new(entries))
            }
            other => Err(BridgeError::protocol(format!(
                "permission response is neither array nor object: {other}"
            ))),
        }
    }

    pub fn state(&self, permission: PermissionId) -> Option<PermissionState> {
        self.entries
            .iter()
            .find(|(id, _)| *id == permission)
            .map(|(_, state)| *state)
    }

    pub fn is_granted(&self, permission: PermissionId) -> bool {
        self.state(permission) == Some(PermissionState::Granted)
    }

    /// True when no entry is anything other than granted. Vacuously true
    /// when empty.
    pub fn is_all_granted(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, state)| *state == PermissionState::Granted)
    }

    /// True when any entry still awaits justification.
    pub fn should_justify(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, state)| *state == PermissionState::RequiresJustification)
    }

    /// Convert every justification-pending entry to denied, in place.
    ///
    /// Applied when the justification flow is declined or unavailable; no
    /// round-trip is involved.
    pub fn reject_justifications(&mut self) {
        for (_, state) in &mut self.entries {
            if *state == PermissionState::RequiresJustification {
                *state = PermissionState::Denied;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PermissionId, PermissionState)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode_state(value: &serde_json::Value) -> Result<PermissionState> {
    let code = value.as_u64().ok_or_else(|| {
        BridgeError::protocol(format!("permission state is not a number: {value}"))
    })?;
    PermissionState::from_code(code)
        .ok_or_else(|| BridgeError::protocol(format!("unknown permission state {code}")))
}
