//! AcroForm filling for generated agreements.
//!
//! Field names differ between template revisions, so values are routed by an
//! ordered list of name rules; the first rule that matches a field wins and
//! fields no rule claims are left untouched.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::values::GeneratedAgreement;

/// Maps a form field to one generated value.
pub struct FillRule {
    pub name: &'static str,
    /// Receives the lower-cased, fully qualified field name
    pub matches: fn(&str) -> bool,
    pub value: fn(&GeneratedAgreement) -> Option<String>,
}

/// Evaluated top to bottom. Specific rules sit above the generic ones they overlap.
pub const FILL_RULES: &[FillRule] = &[
    FillRule {
        name: "second client name",
        matches: |n| {
            n.contains("name") && (n.contains("client 2") || n.contains("client2") || n.contains("joint"))
        },
        value: |v| v.client2_name.clone(),
    },
    FillRule {
        name: "advisor name",
        matches: |n| (n.contains("advisor") || n.contains("adviser")) && n.contains("name"),
        value: |v| Some(v.advisor_name.clone()),
    },
    FillRule {
        name: "rep code",
        matches: |n| n.contains("rep code"),
        value: |v| Some(v.rep_code.clone()),
    },
    FillRule {
        name: "client name",
        matches: |n| n.contains("client") && n.contains("name"),
        value: |v| Some(v.client_name.clone()),
    },
    FillRule {
        name: "account number",
        matches: |n| n.contains("account") && (n.contains("number") || n.contains("registration")),
        value: |v| Some(v.account_number.clone()),
    },
    FillRule {
        name: "fee schedule",
        matches: |n| n == "text3" || n.contains("fee"),
        value: |v| Some(v.fee_amount.clone()),
    },
    FillRule {
        name: "adv received date",
        matches: |n| n.contains("date received") || (n.contains("adv") && n.contains("date")),
        value: |v| Some(v.adv_received_date.clone()),
    },
    FillRule {
        name: "effective date",
        matches: |n| n.contains("effective date"),
        value: |v| Some(v.effective_date.clone()),
    },
    FillRule {
        name: "signature date",
        matches: |n| n.starts_with("date"),
        value: |v| Some(v.effective_date.clone()),
    },
];

/// Value the first matching rule assigns to `field_name`, if any.
pub fn value_for_field(field_name: &str, values: &GeneratedAgreement) -> Option<String> {
    let lowered = field_name.to_lowercase();
    FILL_RULES
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .and_then(|rule| (rule.value)(values))
}

/// A filled copy of a template.
#[derive(Debug)]
pub struct FilledForm {
    pub bytes: Vec<u8>,
    pub filled_fields: Vec<String>,
}

struct TextField {
    id: ObjectId,
    name: String,
    widgets: Vec<ObjectId>,
}

const MAX_FIELD_DEPTH: usize = 16;

/// Write generated values into every text field a rule claims.
pub fn fill_form(template: &[u8], values: &GeneratedAgreement) -> Result<FilledForm> {
    let mut document = Document::load_mem(template).context("template is not a readable PDF")?;
    let fields = text_fields(&document)?;

    let mut filled_fields = Vec::new();
    for field in &fields {
        let Some(value) = value_for_field(&field.name, values) else {
            continue;
        };

        let dict = document
            .get_object_mut(field.id)
            .and_then(Object::as_dict_mut)
            .with_context(|| format!("form field {} is not a dictionary", field.name))?;
        dict.set("V", Object::string_literal(value));
        // Stale appearance streams would keep showing the blank value
        dict.remove(b"AP");

        for widget in &field.widgets {
            if let Ok(widget) = document.get_object_mut(*widget).and_then(Object::as_dict_mut) {
                widget.remove(b"AP");
            }
        }

        filled_fields.push(field.name.clone());
    }

    if !filled_fields.is_empty() {
        mark_need_appearances(&mut document)?;
    }

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .context("failed to serialize filled PDF")?;

    Ok(FilledForm {
        bytes,
        filled_fields,
    })
}

/// Current value of every text field, by fully qualified name.
pub fn read_text_fields(pdf: &[u8]) -> Result<BTreeMap<String, Option<String>>> {
    let document = Document::load_mem(pdf).context("not a readable PDF")?;
    let fields = text_fields(&document)?;

    Ok(fields
        .into_iter()
        .map(|field| {
            let value = document
                .get_dictionary(field.id)
                .ok()
                .and_then(|dict| dict.get(b"V").ok())
                .and_then(|v| v.as_str().ok())
                .map(decode_text);
            (field.name, value)
        })
        .collect())
}

fn root_id(document: &Document) -> Result<ObjectId> {
    document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .context("PDF has no document catalog")
}

fn acro_form(document: &Document) -> Result<Option<&Dictionary>> {
    let catalog = document
        .get_dictionary(root_id(document)?)
        .context("document catalog is not a dictionary")?;

    Ok(match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => document.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    })
}

fn text_fields(document: &Document) -> Result<Vec<TextField>> {
    let Some(form) = acro_form(document)? else {
        return Ok(Vec::new());
    };

    let roots: Vec<ObjectId> = match form.get(b"Fields") {
        Ok(Object::Array(items)) => items.iter().filter_map(|o| o.as_reference().ok()).collect(),
        Ok(Object::Reference(id)) => document
            .get_object(*id)
            .and_then(Object::as_array)
            .map(|items| items.iter().filter_map(|o| o.as_reference().ok()).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    let mut fields = Vec::new();
    for id in roots {
        walk_field(document, id, None, None, 0, &mut fields);
    }
    Ok(fields)
}

// Field names are dotted paths of partial names; FT is inherited from ancestors.
fn walk_field(
    document: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_type: Option<&[u8]>,
    depth: usize,
    out: &mut Vec<TextField>,
) {
    if depth > MAX_FIELD_DEPTH {
        return;
    }
    let Ok(dict) = document.get_dictionary(id) else {
        return;
    };

    let partial = dict
        .get(b"T")
        .ok()
        .and_then(|t| t.as_str().ok())
        .map(decode_text);
    let name = match (parent_name, partial) {
        (Some(parent), Some(partial)) => format!("{}.{}", parent, partial),
        (None, Some(partial)) => partial,
        (Some(parent), None) => parent.to_string(),
        (None, None) => String::new(),
    };
    let field_type = dict
        .get(b"FT")
        .ok()
        .and_then(|ft| ft.as_name().ok())
        .or(inherited_type);

    let kids: Vec<ObjectId> = dict
        .get(b"Kids")
        .ok()
        .and_then(|k| k.as_array().ok())
        .map(|items| items.iter().filter_map(|o| o.as_reference().ok()).collect())
        .unwrap_or_default();

    // Kids without a partial name are widget annotations of this field
    let (children, widgets): (Vec<ObjectId>, Vec<ObjectId>) = kids.into_iter().partition(|kid| {
        document
            .get_dictionary(*kid)
            .map(|d| d.has(b"T"))
            .unwrap_or(false)
    });

    if children.is_empty() {
        if field_type == Some(b"Tx".as_slice()) && !name.is_empty() {
            out.push(TextField { id, name, widgets });
        }
        return;
    }

    for child in children {
        walk_field(document, child, Some(&name), field_type, depth + 1, out);
    }
}

fn mark_need_appearances(document: &mut Document) -> Result<()> {
    let root = root_id(document)?;
    let form_ref = document
        .get_dictionary(root)
        .ok()
        .and_then(|catalog| catalog.get(b"AcroForm").ok())
        .and_then(|form| form.as_reference().ok());

    let form = match form_ref {
        Some(id) => document.get_object_mut(id).and_then(Object::as_dict_mut),
        None => document
            .get_object_mut(root)
            .and_then(Object::as_dict_mut)
            .and_then(|catalog| catalog.get_mut(b"AcroForm"))
            .and_then(Object::as_dict_mut),
    }
    .context("AcroForm is not a dictionary")?;

    form.set("NeedAppearances", Object::Boolean(true));
    Ok(())
}

/// PDF text strings are UTF-16BE with a BOM, or single-byte otherwise.
fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::advisory::models::FeeType;

    fn agreement() -> GeneratedAgreement {
        GeneratedAgreement {
            advisor_name: "Linda Moore".into(),
            rep_code: "PQR".into(),
            client_first_name: "James".into(),
            client_last_name: "Garcia".into(),
            client_name: "James Garcia".into(),
            client2_name: None,
            account_number: "QRT482913".into(),
            effective_date: "03/01/2025".into(),
            adv_received_date: "02/27/2025".into(),
            fee_type: FeeType::Flat,
            fee_amount: "1.25%".into(),
        }
    }

    #[test]
    fn test_rules_route_known_template_field_names() {
        let values = agreement();
        let cases = [
            ("Investment Advisor Representative Name", "Linda Moore"),
            ("Investment Adviser Name Printed_2", "Linda Moore"),
            ("Rep Code", "PQR"),
            ("Client Name Printed", "James Garcia"),
            ("Print Client Name Trustee or Authorized Signor", "James Garcia"),
            ("Account Registration Name  TypeRow1", "QRT482913"),
            ("Text3", "1.25%"),
            ("Effective Date", "03/01/2025"),
            ("Date received", "02/27/2025"),
            ("Date_6", "03/01/2025"),
        ];

        for (field, expected) in cases {
            assert_eq!(value_for_field(field, &values).as_deref(), Some(expected), "{field}");
        }
    }

    #[test]
    fn test_unmatched_and_absent_values_are_skipped() {
        let values = agreement();
        assert_eq!(value_for_field("Signature1", &values), None);
        // No second holder on this agreement
        assert_eq!(value_for_field("Client 2 Name Printed", &values), None);
    }

    #[test]
    fn test_decode_text_handles_utf16_bom() {
        assert_eq!(decode_text(&[0xFE, 0xFF, 0x00, b'R', 0x00, b'e']), "Re");
        assert_eq!(decode_text(b"Rep Code"), "Rep Code");
    }

    #[test]
    fn test_non_pdf_bytes_are_rejected() {
        assert!(fill_form(b"not a pdf", &agreement()).is_err());
    }
}
