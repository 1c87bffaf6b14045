//! Instruction set sent with every extraction call.

pub const SYSTEM_PROMPT: &str = "You review signed investment advisory agreements for a \
brokerage operations team. You read every page of the attached PDF, including scanned pages, \
and report exactly what is on the form. You never invent values.";

const FIELD_GUIDE: &str = r#"FIELD EXTRACTION GUIDE

Page 1
- discretionary: which box is checked, "Discretionary" or "Non-Discretionary".
- wrap: which program box is checked, "WRAP" or "Non-WRAP".
- advisorName: the Investment Advisor Representative name.
- repCode: the representative code next to the advisor name.
- clientName: the client name(s) as written on page 1.
- effectiveDate: the agreement effective date, MM/DD/YYYY.
- accountHolders: 1 for an individual account, 2 for a joint account.

Page 2
- advReceivedDate: the date the client acknowledged receiving Form ADV, MM/DD/YYYY.

Page 11 (signature page)
- clientSignedP11 / clientNameP11 / clientDateP11: first client signature, printed name, date.
- client2SignedP11 / client2NameP11 / client2DateP11: second client; null when the account has one holder.
- advisorSignedP11 / advisorNameP11 / advisorDateP11: advisor signature, printed name, date.

Page 14 (fee schedule)
- accountNumber: the account number on the fee schedule.
- feeType: "Flat" for a single percentage, "Tiered" for a schedule of asset bands.
- feeAmount: the flat percentage (e.g. "1.25%") or every tier, one per line, as written.
- clientSignedP14 / clientNameP14 / clientDateP14: first client acknowledgement.
- client2SignedP14 / client2NameP14 / client2DateP14: second client; null when the account has one holder.
- advisorSignedP14 / advisorNameP14 / advisorDateP14: advisor acknowledgement.

SIGNATURE RULES
- "Yes" when the signature line carries any handwritten, drawn, stamped or electronic signature mark.
- A typed or printed name alone in the signature line is NOT a signature: answer "No".
- "No" when the signature line is empty.
- "N/A" only for a box that does not apply to this agreement.
- Page numbers drift between versions; look for the signature block in the same section if it moved.

OTHER RULES
- Use "Missing" for any field you cannot find on the form.
- Copy names, dates and numbers exactly as written. Do not normalise or guess.
- Dates are MM/DD/YYYY."#;

/// User-turn text. With a reference, the model is told the second file is a
/// correctly completed example of the same form.
pub fn user_instructions(with_reference: bool) -> String {
    let mut text = String::from(
        "The first attached file is the advisory agreement to review. Extract every field below.\n\n",
    );
    if with_reference {
        text.push_str(
            "The second attached file is a correctly completed example of the same agreement. Use it \
             only to learn where each field sits on the page and what a valid signature looks like. \
             Never copy values from it.\n\n",
        );
    }
    text.push_str(FIELD_GUIDE);
    text
}
