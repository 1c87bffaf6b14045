//! Field keys of the extraction contract and flat key/value views of a record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! field_keys {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// One field of the extraction contract, named as it appears on the wire.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum FieldKey {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl FieldKey {
            /// Every field, in contract order.
            pub const ALL: [FieldKey; field_keys!(@count $($variant)+)] = [$(FieldKey::$variant,)+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(FieldKey::$variant => $wire,)+
                }
            }
        }

        impl FromStr for FieldKey {
            type Err = UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(FieldKey::$variant),)+
                    other => Err(UnknownField(other.to_string())),
                }
            }
        }
    };
    (@count) => { 0usize };
    (@count $head:ident $($tail:ident)*) => { 1usize + field_keys!(@count $($tail)*) };
}

field_keys! {
    Discretionary => "discretionary",
    Wrap => "wrap",
    AdvisorName => "advisorName",
    RepCode => "repCode",
    ClientName => "clientName",
    EffectiveDate => "effectiveDate",
    AccountHolders => "accountHolders",
    AdvReceivedDate => "advReceivedDate",
    ClientSignedP11 => "clientSignedP11",
    ClientNameP11 => "clientNameP11",
    ClientDateP11 => "clientDateP11",
    Client2SignedP11 => "client2SignedP11",
    Client2NameP11 => "client2NameP11",
    Client2DateP11 => "client2DateP11",
    AdvisorSignedP11 => "advisorSignedP11",
    AdvisorNameP11 => "advisorNameP11",
    AdvisorDateP11 => "advisorDateP11",
    AccountNumber => "accountNumber",
    FeeType => "feeType",
    FeeAmount => "feeAmount",
    ClientSignedP14 => "clientSignedP14",
    ClientNameP14 => "clientNameP14",
    ClientDateP14 => "clientDateP14",
    Client2SignedP14 => "client2SignedP14",
    Client2NameP14 => "client2NameP14",
    Client2DateP14 => "client2DateP14",
    AdvisorSignedP14 => "advisorSignedP14",
    AdvisorNameP14 => "advisorNameP14",
    AdvisorDateP14 => "advisorDateP14",
}

impl FieldKey {
    /// Signature boxes, whose only acceptable values are `Yes` and `N/A`.
    pub fn is_signature(self) -> bool {
        matches!(
            self,
            FieldKey::ClientSignedP11
                | FieldKey::Client2SignedP11
                | FieldKey::AdvisorSignedP11
                | FieldKey::ClientSignedP14
                | FieldKey::Client2SignedP14
                | FieldKey::AdvisorSignedP14
        )
    }

    /// Fields that only apply to joint (two-holder) accounts.
    pub fn is_second_holder(self) -> bool {
        matches!(
            self,
            FieldKey::Client2SignedP11
                | FieldKey::Client2NameP11
                | FieldKey::Client2DateP11
                | FieldKey::Client2SignedP14
                | FieldKey::Client2NameP14
                | FieldKey::Client2DateP14
        )
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key that is not part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

/// Reviewer corrections for one document, keyed by field.
pub type FieldOverrides = BTreeMap<FieldKey, String>;

/// Flat string view of a record; absent keys read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<FieldKey, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Value of `key`, or `""` when absent.
    pub fn get(&self, key: FieldKey) -> &str {
        self.0.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy with reviewer overrides layered on top.
    pub fn merged(&self, overrides: &FieldOverrides) -> FieldValues {
        let mut merged = self.clone();
        for (key, value) in overrides {
            merged.insert(*key, value.clone());
        }
        merged
    }
}

/// Parse a raw `{ key: value }` patch, rejecting unknown keys.
pub fn parse_overrides(
    raw: impl IntoIterator<Item = (String, String)>,
) -> Result<FieldOverrides, UnknownField> {
    raw.into_iter()
        .map(|(key, value)| Ok((key.parse::<FieldKey>()?, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_twenty_nine_unique_fields() {
        let unique: std::collections::HashSet<_> = FieldKey::ALL.iter().collect();
        assert_eq!(FieldKey::ALL.len(), 29);
        assert_eq!(unique.len(), 29);
    }

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for key in FieldKey::ALL {
            assert_eq!(key.as_str().parse::<FieldKey>(), Ok(key));
        }
        assert_eq!(
            "clientSignature".parse::<FieldKey>(),
            Err(UnknownField("clientSignature".into()))
        );
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        let json = serde_json::to_string(&FieldKey::Client2SignedP14).unwrap();
        assert_eq!(json, "\"client2SignedP14\"");
    }

    #[test]
    fn test_merged_overrides_win() {
        let mut base = FieldValues::new();
        base.insert(FieldKey::RepCode, "Missing");
        base.insert(FieldKey::ClientName, "Ana Ortiz");

        let overrides = parse_overrides([("repCode".to_string(), "RC4821".to_string())]).unwrap();
        let merged = base.merged(&overrides);

        assert_eq!(merged.get(FieldKey::RepCode), "RC4821");
        assert_eq!(merged.get(FieldKey::ClientName), "Ana Ortiz");
        assert_eq!(base.get(FieldKey::RepCode), "Missing");
    }

    #[test]
    fn test_parse_overrides_rejects_unknown_key() {
        let err = parse_overrides([("nickname".to_string(), "x".to_string())]).unwrap_err();
        assert_eq!(err.0, "nickname");
    }
}
