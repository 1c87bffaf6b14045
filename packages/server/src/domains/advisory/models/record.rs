//! The extraction contract: one record per scanned agreement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::fields::{FieldKey, FieldValues};

/// Placeholder written into every field when a value could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Sentinel {
    // value absent from the document
    Missing,
    // document could not be processed
    Error,
}

impl Sentinel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Error => "Error",
        }
    }
}

/// Declares a closed contract enum whose wire form is a fixed string and
/// which always carries the `Missing` / `Error` sentinels.
macro_rules! contract_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
            #[serde(rename = "Missing")]
            Missing,
            #[serde(rename = "Error")]
            Error,
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Missing => "Missing",
                    Self::Error => "Error",
                }
            }
        }

        impl From<Sentinel> for $name {
            fn from(sentinel: Sentinel) -> Self {
                match sentinel {
                    Sentinel::Missing => Self::Missing,
                    Sentinel::Error => Self::Error,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

contract_enum! {
    /// Page 1 checkbox: may the advisor trade without per-trade consent?
    Discretion {
        Discretionary => "Discretionary",
        NonDiscretionary => "Non-Discretionary",
    }
}

contract_enum! {
    /// Page 1 checkbox: bundled (WRAP) or unbundled fee program.
    WrapStatus {
        Wrap => "WRAP",
        NonWrap => "Non-WRAP",
    }
}

contract_enum! {
    /// Page 14 fee schedule shape.
    FeeType {
        Flat => "Flat",
        Tiered => "Tiered",
    }
}

contract_enum! {
    /// Whether a signature box carries a real signature.
    SignatureStatus {
        // handwritten or e-signature mark present
        Yes => "Yes",
        // empty box, or only the printed name
        No => "No",
        // second holder on a single-holder account
        NotApplicable => "N/A",
    }
}

/// Number of account holders, or a sentinel when it could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AccountHolders {
    Count(u8),
    Sentinel(Sentinel),
}

impl AccountHolders {
    pub fn count(self) -> Option<u8> {
        match self {
            Self::Count(n) => Some(n),
            Self::Sentinel(_) => None,
        }
    }

    pub fn as_field_value(self) -> String {
        match self {
            Self::Count(n) => n.to_string(),
            Self::Sentinel(s) => s.as_str().to_string(),
        }
    }
}

/// Everything read off one advisory agreement.
///
/// Pages 1-2 carry the program selection and parties, page 11 the signature
/// block, page 14 the fee schedule and its acknowledgement. Second-holder
/// fields are only meaningful when `account_holders` is 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    /// Page 1: which discretion checkbox is marked
    pub discretionary: Discretion,
    /// Page 1: which program checkbox is marked
    pub wrap: WrapStatus,
    /// Page 1: Investment Advisor Representative name
    pub advisor_name: String,
    /// Page 1: representative code
    pub rep_code: String,
    /// Page 1: client name(s)
    pub client_name: String,
    /// Page 1: agreement effective date
    pub effective_date: String,
    /// 1 or 2 account holders
    pub account_holders: AccountHolders,
    /// Page 2: date the client received the Form ADV brochure
    pub adv_received_date: String,

    /// Page 11: first client signature
    pub client_signed_p11: SignatureStatus,
    /// Page 11: first client printed name
    pub client_name_p11: String,
    /// Page 11: first client signature date
    pub client_date_p11: String,
    /// Page 11: second client signature (joint accounts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2_signed_p11: Option<SignatureStatus>,
    /// Page 11: second client printed name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2_name_p11: Option<String>,
    /// Page 11: second client signature date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2_date_p11: Option<String>,
    /// Page 11: advisor signature
    pub advisor_signed_p11: SignatureStatus,
    /// Page 11: advisor printed name
    pub advisor_name_p11: String,
    /// Page 11: advisor signature date
    pub advisor_date_p11: String,

    /// Page 14: account number
    pub account_number: String,
    /// Page 14: fee schedule type
    pub fee_type: FeeType,
    /// Page 14: flat percentage, or the full tier table
    pub fee_amount: String,
    /// Page 14: first client signature
    pub client_signed_p14: SignatureStatus,
    /// Page 14: first client printed name
    pub client_name_p14: String,
    /// Page 14: first client signature date
    pub client_date_p14: String,
    /// Page 14: second client signature (joint accounts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2_signed_p14: Option<SignatureStatus>,
    /// Page 14: second client printed name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2_name_p14: Option<String>,
    /// Page 14: second client signature date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client2_date_p14: Option<String>,
    /// Page 14: advisor signature
    pub advisor_signed_p14: SignatureStatus,
    /// Page 14: advisor printed name
    pub advisor_name_p14: String,
    /// Page 14: advisor signature date
    pub advisor_date_p14: String,
}

impl ExtractedRecord {
    /// A record with every field, second-holder ones included, set to `sentinel`.
    pub fn sentinel(sentinel: Sentinel) -> Self {
        let text = || sentinel.as_str().to_string();
        let signature = SignatureStatus::from(sentinel);

        Self {
            discretionary: sentinel.into(),
            wrap: sentinel.into(),
            advisor_name: text(),
            rep_code: text(),
            client_name: text(),
            effective_date: text(),
            account_holders: AccountHolders::Sentinel(sentinel),
            adv_received_date: text(),
            client_signed_p11: signature,
            client_name_p11: text(),
            client_date_p11: text(),
            client2_signed_p11: Some(signature),
            client2_name_p11: Some(text()),
            client2_date_p11: Some(text()),
            advisor_signed_p11: signature,
            advisor_name_p11: text(),
            advisor_date_p11: text(),
            account_number: text(),
            fee_type: sentinel.into(),
            fee_amount: text(),
            client_signed_p14: signature,
            client_name_p14: text(),
            client_date_p14: text(),
            client2_signed_p14: Some(signature),
            client2_name_p14: Some(text()),
            client2_date_p14: Some(text()),
            advisor_signed_p14: signature,
            advisor_name_p14: text(),
            advisor_date_p14: text(),
        }
    }

    /// True for the record produced when a document could not be processed.
    pub fn is_error_sentinel(&self) -> bool {
        *self == Self::sentinel(Sentinel::Error)
    }

    pub fn account_holder_count(&self) -> Option<u8> {
        self.account_holders.count()
    }

    /// Flatten into string values keyed by field, the form validity rules read.
    ///
    /// Absent second-holder fields are left out rather than blanked.
    pub fn to_fields(&self) -> FieldValues {
        let mut fields = FieldValues::new();
        fields.insert(FieldKey::Discretionary, self.discretionary.as_str());
        fields.insert(FieldKey::Wrap, self.wrap.as_str());
        fields.insert(FieldKey::AdvisorName, &self.advisor_name);
        fields.insert(FieldKey::RepCode, &self.rep_code);
        fields.insert(FieldKey::ClientName, &self.client_name);
        fields.insert(FieldKey::EffectiveDate, &self.effective_date);
        fields.insert(FieldKey::AccountHolders, self.account_holders.as_field_value());
        fields.insert(FieldKey::AdvReceivedDate, &self.adv_received_date);

        fields.insert(FieldKey::ClientSignedP11, self.client_signed_p11.as_str());
        fields.insert(FieldKey::ClientNameP11, &self.client_name_p11);
        fields.insert(FieldKey::ClientDateP11, &self.client_date_p11);
        if let Some(signed) = self.client2_signed_p11 {
            fields.insert(FieldKey::Client2SignedP11, signed.as_str());
        }
        if let Some(name) = &self.client2_name_p11 {
            fields.insert(FieldKey::Client2NameP11, name);
        }
        if let Some(date) = &self.client2_date_p11 {
            fields.insert(FieldKey::Client2DateP11, date);
        }
        fields.insert(FieldKey::AdvisorSignedP11, self.advisor_signed_p11.as_str());
        fields.insert(FieldKey::AdvisorNameP11, &self.advisor_name_p11);
        fields.insert(FieldKey::AdvisorDateP11, &self.advisor_date_p11);

        fields.insert(FieldKey::AccountNumber, &self.account_number);
        fields.insert(FieldKey::FeeType, self.fee_type.as_str());
        fields.insert(FieldKey::FeeAmount, &self.fee_amount);
        fields.insert(FieldKey::ClientSignedP14, self.client_signed_p14.as_str());
        fields.insert(FieldKey::ClientNameP14, &self.client_name_p14);
        fields.insert(FieldKey::ClientDateP14, &self.client_date_p14);
        if let Some(signed) = self.client2_signed_p14 {
            fields.insert(FieldKey::Client2SignedP14, signed.as_str());
        }
        if let Some(name) = &self.client2_name_p14 {
            fields.insert(FieldKey::Client2NameP14, name);
        }
        if let Some(date) = &self.client2_date_p14 {
            fields.insert(FieldKey::Client2DateP14, date);
        }
        fields.insert(FieldKey::AdvisorSignedP14, self.advisor_signed_p14.as_str());
        fields.insert(FieldKey::AdvisorNameP14, &self.advisor_name_p14);
        fields.insert(FieldKey::AdvisorDateP14, &self.advisor_date_p14);

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openai_client::StructuredOutput;

    #[test]
    fn test_error_sentinel_sets_every_field() {
        let record = ExtractedRecord::sentinel(Sentinel::Error);
        let fields = record.to_fields();

        assert_eq!(fields.len(), FieldKey::ALL.len());
        for key in FieldKey::ALL {
            assert_eq!(fields.get(key), "Error", "{key} should be Error");
        }
        assert!(record.is_error_sentinel());
        assert!(!ExtractedRecord::sentinel(Sentinel::Missing).is_error_sentinel());
    }

    #[test]
    fn test_wire_names_are_camel_case_with_page_suffix() {
        let value = serde_json::to_value(ExtractedRecord::sentinel(Sentinel::Missing)).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("clientSignedP11"));
        assert!(object.contains_key("client2DateP14"));
        assert!(object.contains_key("advReceivedDate"));
        assert_eq!(object.len(), 29);
    }

    #[test]
    fn test_single_holder_record_omits_second_holder_fields() {
        let json = serde_json::json!({
            "discretionary": "Non-Discretionary",
            "wrap": "WRAP",
            "advisorName": "Jane Advisor",
            "repCode": "RC12345",
            "clientName": "Sam Client",
            "effectiveDate": "01/15/2025",
            "accountHolders": 1,
            "advReceivedDate": "01/10/2025",
            "clientSignedP11": "Yes",
            "clientNameP11": "Sam Client",
            "clientDateP11": "01/15/2025",
            "client2SignedP11": null,
            "client2NameP11": null,
            "client2DateP11": null,
            "advisorSignedP11": "Yes",
            "advisorNameP11": "Jane Advisor",
            "advisorDateP11": "01/15/2025",
            "accountNumber": "ABC123456",
            "feeType": "Flat",
            "feeAmount": "1.25%",
            "clientSignedP14": "Yes",
            "clientNameP14": "Sam Client",
            "clientDateP14": "01/15/2025",
            "advisorSignedP14": "N/A",
            "advisorNameP14": "Jane Advisor",
            "advisorDateP14": "01/15/2025"
        });

        let record: ExtractedRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.discretionary, Discretion::NonDiscretionary);
        assert_eq!(record.account_holder_count(), Some(1));
        assert_eq!(record.advisor_signed_p14, SignatureStatus::NotApplicable);
        assert!(record.client2_signed_p14.is_none());

        let fields = record.to_fields();
        assert!(!fields.contains(FieldKey::Client2NameP11));
        assert_eq!(fields.get(FieldKey::AccountHolders), "1");
    }

    #[test]
    fn test_account_holders_accepts_sentinel() {
        let holders: AccountHolders = serde_json::from_str("\"Missing\"").unwrap();
        assert_eq!(holders, AccountHolders::Sentinel(Sentinel::Missing));
        assert_eq!(holders.count(), None);
    }

    #[test]
    fn test_model_schema_is_strict() {
        let schema = ExtractedRecord::openai_schema();
        let required = schema["required"].as_array().unwrap();

        assert_eq!(required.len(), 29);
        assert_eq!(schema["additionalProperties"], serde_json::Value::Bool(false));
        let text = serde_json::to_string(&schema).unwrap();
        assert!(!text.contains("$ref"));
        assert!(!text.contains("allOf"));
        assert_eq!(
            schema["properties"]["wrap"]["enum"],
            serde_json::json!(["WRAP", "Non-WRAP", "Missing", "Error"])
        );
    }
}
