use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Commercial invoice payload.
///
/// Field names on the wire keep the form's own labels (`Exporter`,
/// `HS_Codes`, ...) so existing clients and CSV exports map one to one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct InvoiceData {
    #[serde(rename = "Exporter")]
    #[schema(example = "Acme Exports Pvt Ltd")]
    pub exporter: String,
    #[serde(rename = "Invoice_No_and_Date")]
    #[schema(example = "INV-00123, 2024-05-01")]
    pub invoice_no_and_date: String,
    #[serde(rename = "Exporter_Ref")]
    #[schema(example = "REF-0042")]
    pub exporter_ref: String,
    #[serde(rename = "Buyers_Order_No_and_Date")]
    #[schema(example = "ORD-55120, 2024-04-20")]
    pub buyers_order_no_and_date: String,
    #[serde(rename = "Consignee")]
    pub consignee: String,
    #[serde(rename = "Buyer_If_Other_than_Consignee")]
    pub buyer_if_other_than_consignee: String,
    #[serde(rename = "Pre_carriage_by")]
    pub pre_carriage_by: String,
    #[serde(rename = "Place_of_Receipt")]
    pub place_of_receipt: String,
    #[serde(rename = "Country_of_Origin_of_Goods")]
    pub country_of_origin_of_goods: String,
    #[serde(rename = "Country_of_Final_Destination")]
    pub country_of_final_destination: String,
    #[serde(rename = "Vessel_or_Flight_No")]
    pub vessel_or_flight_no: String,
    #[serde(rename = "Port_of_Loading")]
    pub port_of_loading: String,
    #[serde(rename = "Terms_of_Delivery_and_Payment")]
    #[schema(example = "FOB")]
    pub terms_of_delivery_and_payment: String,
    #[serde(rename = "Port_of_Discharge")]
    pub port_of_discharge: String,
    #[serde(rename = "Final_Destination")]
    pub final_destination: String,

    #[serde(rename = "HS_Codes")]
    #[schema(example = json!(["6109.10", "6205.20"]))]
    pub hs_codes: Vec<String>,
    #[serde(rename = "Marks_and_Nos")]
    pub marks_and_nos: Vec<String>,
    #[serde(rename = "Packages")]
    pub packages: Vec<String>,
    #[serde(rename = "Descriptions")]
    pub descriptions: Vec<String>,
    #[serde(rename = "Quantities", deserialize_with = "whole_numbers")]
    #[schema(example = json!([10, 25]))]
    pub quantities: Vec<i64>,
    #[serde(rename = "Rates")]
    #[schema(example = json!([12.5, 40.0]))]
    pub rates: Vec<f64>,

    #[serde(rename = "Total_Cartons")]
    pub total_cartons: String,
    #[serde(rename = "Total_Quantity", deserialize_with = "whole_number")]
    pub total_quantity: i64,
    #[serde(rename = "Net_Weight")]
    pub net_weight: String,
    #[serde(rename = "Gross_Weight")]
    pub gross_weight: String,
    #[serde(rename = "Variation")]
    pub variation: String,
    #[serde(rename = "Exporter_Bank_Details")]
    pub exporter_bank_details: String,
    #[serde(rename = "Total_Amount_in_Words")]
    pub total_amount_in_words: String,
    #[serde(rename = "Company_Name_Stamp")]
    pub company_name_stamp: String,
    #[serde(rename = "Authorised_Signature")]
    pub authorised_signature: String,
}

/// Integer on the wire, also accepted as an integral float (`10.0`) since
/// spreadsheet exports write whole numbers that way.
#[derive(Deserialize)]
#[serde(untagged)]
enum WholeNumber {
    Int(i64),
    Float(f64),
}

impl WholeNumber {
    fn into_i64<E: de::Error>(self) -> Result<i64, E> {
        match self {
            WholeNumber::Int(value) => Ok(value),
            WholeNumber::Float(value)
                if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
            {
                Ok(value as i64)
            }
            WholeNumber::Float(value) => Err(E::invalid_value(
                de::Unexpected::Float(value),
                &"a whole number",
            )),
        }
    }
}

fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    WholeNumber::deserialize(deserializer)?.into_i64()
}

fn whole_numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
    Vec::<WholeNumber>::deserialize(deserializer)?
        .into_iter()
        .map(WholeNumber::into_i64)
        .collect()
}

/// One row of the item table, borrowed from the parallel lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceItem<'a> {
    pub serial: usize,
    pub hs_code: &'a str,
    pub marks_and_nos: &'a str,
    pub packages: &'a str,
    pub description: &'a str,
    pub quantity: i64,
    pub rate: f64,
}

impl InvoiceItem<'_> {
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.rate
    }
}

impl InvoiceData {
    /// Number of item rows. Only meaningful once the item lists are validated.
    pub fn item_count(&self) -> usize {
        self.hs_codes.len()
    }

    pub fn line_amount(&self, index: usize) -> Option<f64> {
        let quantity = *self.quantities.get(index)?;
        let rate = *self.rates.get(index)?;
        Some(quantity as f64 * rate)
    }

    /// Iterate the item table. Stops at the shortest list.
    pub fn items(&self) -> impl Iterator<Item = InvoiceItem<'_>> {
        let rows = [
            self.hs_codes.len(),
            self.marks_and_nos.len(),
            self.packages.len(),
            self.descriptions.len(),
            self.quantities.len(),
            self.rates.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);

        (0..rows).map(move |i| InvoiceItem {
            serial: i + 1,
            hs_code: &self.hs_codes[i],
            marks_and_nos: &self.marks_and_nos[i],
            packages: &self.packages[i],
            description: &self.descriptions[i],
            quantity: self.quantities[i],
            rate: self.rates[i],
        })
    }

    /// Sum of `quantity * rate` over every row.
    pub fn total_value(&self) -> f64 {
        self.items().map(|item| item.amount()).sum()
    }
}
