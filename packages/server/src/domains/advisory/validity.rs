//! IGO / NIGO classification.
//!
//! A document is In Good Order when every field its contract requires holds a
//! usable value. Reviewer overrides are layered on before evaluation.

use serde::{Deserialize, Serialize};

use super::models::{FieldKey, FieldValues};

/// Values that mean "nothing usable was read".
pub const SENTINEL_VALUES: [&str; 3] = ["Not Found", "Missing", "Error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "IGO")]
    InGoodOrder,
    #[serde(rename = "NIGO")]
    NotInGoodOrder,
}

/// Which field set a document is held to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractVersion {
    /// Legacy twelve-field set with no advisor or second-holder fields
    V1,
    /// Full page 1/2/11/14 contract
    #[default]
    V2,
}

const LEGACY_FIELDS: [FieldKey; 12] = [
    FieldKey::Discretionary,
    FieldKey::Wrap,
    FieldKey::ClientName,
    FieldKey::EffectiveDate,
    FieldKey::ClientSignedP11,
    FieldKey::ClientDateP11,
    FieldKey::AccountNumber,
    FieldKey::FeeType,
    FieldKey::FeeAmount,
    FieldKey::AdvReceivedDate,
    FieldKey::ClientSignedP14,
    FieldKey::ClientDateP14,
];

impl ContractVersion {
    /// Fields that must be valid, given the account holder count.
    ///
    /// Under V2 the second-holder fields are required only for joint accounts.
    pub fn required_fields(self, account_holders: Option<u8>) -> Vec<FieldKey> {
        match self {
            ContractVersion::V1 => LEGACY_FIELDS.to_vec(),
            ContractVersion::V2 => FieldKey::ALL
                .into_iter()
                .filter(|key| !key.is_second_holder() || account_holders == Some(2))
                .collect(),
        }
    }
}

fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || SENTINEL_VALUES.contains(&trimmed)
}

/// Whether a single field value is usable.
///
/// Signature boxes accept only `Yes` or `N/A`; the holder count must be 1 or 2;
/// everything else (second-holder names and dates included) only has to be a
/// non-sentinel value.
pub fn is_valid(key: FieldKey, value: &str) -> bool {
    if is_sentinel(value) {
        return false;
    }

    if key.is_signature() {
        return matches!(value.trim(), "Yes" | "N/A");
    }

    if key == FieldKey::AccountHolders {
        return matches!(value.trim().parse::<u8>(), Ok(1 | 2));
    }

    true
}

/// Outcome of evaluating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: ComplianceStatus,
    pub invalid_fields: Vec<FieldKey>,
}

impl StatusReport {
    pub fn is_igo(&self) -> bool {
        self.status == ComplianceStatus::InGoodOrder
    }
}

/// Classify already-merged field values against a contract version.
pub fn evaluate(fields: &FieldValues, version: ContractVersion) -> StatusReport {
    let holders = fields.get(FieldKey::AccountHolders).trim().parse::<u8>().ok();

    let invalid_fields: Vec<FieldKey> = version
        .required_fields(holders)
        .into_iter()
        .filter(|key| !is_acceptable(*key, fields.get(*key), holders))
        .collect();

    let status = if invalid_fields.is_empty() {
        ComplianceStatus::InGoodOrder
    } else {
        ComplianceStatus::NotInGoodOrder
    };

    StatusReport {
        status,
        invalid_fields,
    }
}

// A joint account cannot mark its second holder as not applicable.
fn is_acceptable(key: FieldKey, value: &str, holders: Option<u8>) -> bool {
    if holders == Some(2) && key.is_second_holder() && value.trim() == "N/A" {
        return false;
    }
    is_valid(key, value)
}
