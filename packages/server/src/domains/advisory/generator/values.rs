//! Plausible random values for one synthetic agreement.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::domains::advisory::models::{FeeType, TemplateConfig};

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Lisa", "James", "Mary",
    "William", "Jennifer", "Richard", "Linda", "Thomas", "Patricia", "Charles", "Barbara", "Daniel",
    "Susan",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore",
    "Jackson", "Martin",
];

const REP_CODES: &[&str] = &["ABC", "DEF", "GHI", "JKL", "MNO", "PQR", "STU", "VWX", "YZA", "BCD"];

const FLAT_FEES: &[&str] = &["1.00%", "1.25%", "1.50%", "0.75%", "2.00%"];

/// Asset bands of the tiered schedule, in order.
const TIER_BANDS: [&str; 4] = [
    "$0 To $500,000",
    "$500,000 To $1,000,000",
    "$1,000,000 To $2,000,000",
    "$2,000,000 To $5,000,000",
];

/// Basis-point step down from the top rate for each band.
const TIER_STEPS_BPS: [u32; 4] = [0, 15, 25, 50];

const TOP_TIER_RATES_BPS: &[u32] = &[100, 125, 150];

/// Days back from today that generated dates may fall.
const DATE_WINDOW_DAYS: i64 = 30;

/// Everything written into one generated agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAgreement {
    pub advisor_name: String,
    pub rep_code: String,
    pub client_first_name: String,
    pub client_last_name: String,
    pub client_name: String,
    pub client2_name: Option<String>,
    pub account_number: String,
    pub effective_date: String,
    pub adv_received_date: String,
    pub fee_type: FeeType,
    pub fee_amount: String,
}

impl GeneratedAgreement {
    /// Draw values for `template`, with dates counted back from `today`.
    pub fn random<R: Rng + ?Sized>(template: &TemplateConfig, today: NaiveDate, rng: &mut R) -> Self {
        let advisor_name = format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng));
        let client_first_name = pick(FIRST_NAMES, rng).to_string();
        let client_last_name = pick(LAST_NAMES, rng).to_string();

        let client2_name = template
            .is_joint()
            .then(|| format!("{} {}", pick(FIRST_NAMES, rng), client_last_name));

        let effective_offset = rng.gen_range(0..=DATE_WINDOW_DAYS);
        let received_offset = rng.gen_range(effective_offset..=DATE_WINDOW_DAYS);

        let fee_amount = match template.fee_type {
            FeeType::Tiered => tier_schedule(rng),
            _ => pick(FLAT_FEES, rng).to_string(),
        };

        Self {
            advisor_name,
            rep_code: pick(REP_CODES, rng).to_string(),
            client_name: format!("{} {}", client_first_name, client_last_name),
            client_first_name,
            client_last_name,
            client2_name,
            account_number: account_number(rng),
            effective_date: format_date(today - Duration::days(effective_offset)),
            adv_received_date: format_date(today - Duration::days(received_offset)),
            fee_type: template.fee_type,
            fee_amount,
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Three uppercase letters followed by six digits, e.g. `QRT482913`.
fn account_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix: String = (0..3).map(|_| rng.gen_range(b'A'..=b'Z') as char).collect();
    format!("{}{}", prefix, rng.gen_range(100_000..=999_999))
}

/// One line per band, rates stepping down from a random top rate.
fn tier_schedule<R: Rng + ?Sized>(rng: &mut R) -> String {
    let top = TOP_TIER_RATES_BPS.choose(rng).copied().unwrap_or(100);
    TIER_BANDS
        .iter()
        .zip(TIER_STEPS_BPS)
        .map(|(band, step)| {
            let bps = top - step;
            format!("{}: {}.{:02}%", band, bps / 100, bps % 100)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
