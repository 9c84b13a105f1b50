//! Synthetic invoices for load testing.

use chrono::{Duration, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::invoice::InvoiceData;

const COMPANIES: &[&str] = &[
    "Northwind Traders",
    "Globex Corporation",
    "Initech Exports",
    "Umbrella Textiles",
    "Stark Industrial Supply",
    "Wayne Fabrics",
    "Hooli Logistics",
    "Vandelay Industries",
];
const FIRST_NAMES: &[&str] = &[
    "Anita", "Brian", "Carmen", "Deepak", "Elena", "Farah", "Gustav", "Hiro", "Ines", "Jonas",
];
const LAST_NAMES: &[&str] = &[
    "Rao", "Fischer", "Okafor", "Moreau", "Tanaka", "Silva", "Novak", "Haddad", "Larsen", "Kim",
];
const CITIES: &[&str] = &[
    "Hamburg", "Rotterdam", "Mumbai", "Chennai", "Singapore", "Dubai", "Antwerp", "Felixstowe",
    "Valencia", "Busan",
];
const COUNTRIES: &[&str] = &[
    "India", "Germany", "Netherlands", "Singapore", "United Arab Emirates", "Belgium",
    "United Kingdom", "Spain", "South Korea", "Japan",
];
const WORDS: &[&str] = &[
    "carton", "bale", "crate", "pallet", "drum", "bundle", "truck", "rail", "barge", "sack",
];
const ADJECTIVES: &[&str] = &[
    "Organic", "Premium", "Handwoven", "Recycled", "Standard", "Printed", "Dyed", "Washed",
];
const PRODUCTS: &[&str] = &[
    "Cotton T-Shirts",
    "Linen Shirts",
    "Wool Scarves",
    "Denim Jeans",
    "Silk Ties",
    "Canvas Bags",
    "Bath Towels",
    "Bed Sheets",
];
const SENTENCE_WORDS: &[&str] = &[
    "shipment", "cleared", "customs", "goods", "packed", "as", "per", "order", "subject", "to",
    "inspection", "payment", "within", "thirty", "days", "of", "invoice", "date", "plus", "minus",
];

/// Replace every `#` in `pattern` with a random digit.
pub fn bothify<R: Rng + ?Sized>(rng: &mut R, pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| {
            if c == '#' {
                char::from(b'0' + rng.random_range(0..10u8))
            } else {
                c
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct FakeInvoiceGenerator<R> {
    rng: R,
}

impl<R: Rng> FakeInvoiceGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, options: &[&str]) -> String {
        options.choose(&mut self.rng).copied().unwrap_or_default().to_string()
    }

    fn name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    fn date(&mut self) -> String {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let offset = self.rng.random_range(0..20_000);
        (epoch + Duration::days(offset)).format("%Y-%m-%d").to_string()
    }

    fn sentence(&mut self, words: usize) -> String {
        let mut text = (0..words)
            .map(|_| self.pick(SENTENCE_WORDS))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        text.push('.');
        text
    }

    /// Sentences of filler text, cut at a word boundary before `max_chars`.
    fn text(&mut self, max_chars: usize) -> String {
        let mut out = String::new();
        loop {
            let words = self.rng.random_range(4..=8);
            let next = self.sentence(words);
            if !out.is_empty() && out.len() + 1 + next.len() > max_chars {
                break;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&next);
            if out.len() >= max_chars {
                break;
            }
        }
        out
    }

    fn description(&mut self) -> String {
        format!("{} {}", self.pick(ADJECTIVES), self.pick(PRODUCTS))
    }

    pub fn invoice(&mut self) -> InvoiceData {
        let rows = self.rng.random_range(3..=6);

        InvoiceData {
            exporter: self.pick(COMPANIES),
            invoice_no_and_date: format!("{}, {}", bothify(&mut self.rng, "INV-#####"), self.date()),
            exporter_ref: bothify(&mut self.rng, "REF-####"),
            buyers_order_no_and_date: format!("{}, {}", bothify(&mut self.rng, "ORD-#####"), self.date()),
            consignee: self.name(),
            buyer_if_other_than_consignee: self.name(),
            pre_carriage_by: self.pick(WORDS),
            place_of_receipt: self.pick(CITIES),
            country_of_origin_of_goods: self.pick(COUNTRIES),
            country_of_final_destination: self.pick(COUNTRIES),
            vessel_or_flight_no: bothify(&mut self.rng, "VES###"),
            port_of_loading: self.pick(CITIES),
            terms_of_delivery_and_payment: "FOB".to_string(),
            port_of_discharge: self.pick(CITIES),
            final_destination: self.pick(CITIES),

            hs_codes: (0..rows).map(|_| bothify(&mut self.rng, "####.##")).collect(),
            marks_and_nos: (0..rows).map(|_| bothify(&mut self.rng, "PKG##")).collect(),
            packages: (0..rows).map(|_| self.pick(WORDS)).collect(),
            descriptions: (0..rows).map(|_| self.description()).collect(),
            quantities: (0..rows).map(|_| self.rng.random_range(1..=100i64)).collect(),
            rates: (0..rows)
                .map(|_| round2(self.rng.random_range(10.0..200.0)))
                .collect(),

            total_cartons: self.rng.random_range(10..=50).to_string(),
            total_quantity: self.rng.random_range(100..=500),
            net_weight: round2(self.rng.random_range(100.0..500.0)).to_string(),
            gross_weight: round2(self.rng.random_range(150.0..600.0)).to_string(),
            variation: self.sentence(4),
            exporter_bank_details: self.text(100),
            total_amount_in_words: self.sentence(8),
            company_name_stamp: self.pick(COMPANIES),
            authorised_signature: self.name(),
        }
    }
}

impl<R: Rng> Iterator for FakeInvoiceGenerator<R> {
    type Item = InvoiceData;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.invoice())
    }
}
