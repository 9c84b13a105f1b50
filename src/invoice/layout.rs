//! Fixed coordinate table of the commercial invoice template.
//!
//! Coordinates are pixels on the template image, measured from its top-left
//! corner to the top-left corner of the drawn text.

use super::models::InvoiceData;

/// Text bound to a position on the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

impl Placement {
    pub fn new(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Column x positions: serial, HS code, marks, packages, description,
/// quantity, rate, amount.
pub const TABLE_COLUMNS: [i32; 8] = [100, 300, 500, 850, 1275, 1700, 1950, 2200];
pub const TABLE_Y_START: i32 = 1440;
pub const TABLE_ROW_HEIGHT: i32 = 55;

/// Money and rates are always printed with two decimals.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// y coordinate of the item row at `index` (zero based).
pub fn row_y(index: usize) -> i32 {
    TABLE_Y_START + index as i32 * TABLE_ROW_HEIGHT
}

fn header(data: &InvoiceData) -> Vec<Placement> {
    vec![
        Placement::new(100, 375, data.exporter.as_str()),
        Placement::new(1350, 375, data.invoice_no_and_date.as_str()),
        Placement::new(1950, 375, data.exporter_ref.as_str()),
        Placement::new(1350, 510, data.buyers_order_no_and_date.as_str()),
        Placement::new(100, 615, data.consignee.as_str()),
        Placement::new(1300, 625, data.buyer_if_other_than_consignee.as_str()),
        Placement::new(100, 850, data.pre_carriage_by.as_str()),
        Placement::new(700, 850, data.place_of_receipt.as_str()),
        Placement::new(1350, 875, data.country_of_origin_of_goods.as_str()),
        Placement::new(1950, 875, data.country_of_final_destination.as_str()),
        Placement::new(90, 975, data.vessel_or_flight_no.as_str()),
        Placement::new(700, 975, data.port_of_loading.as_str()),
        Placement::new(1350, 975, data.terms_of_delivery_and_payment.as_str()),
        Placement::new(90, 1225, data.port_of_discharge.as_str()),
        Placement::new(700, 1225, data.final_destination.as_str()),
    ]
}

fn table(data: &InvoiceData) -> impl Iterator<Item = Placement> + '_ {
    data.items().flat_map(|item| {
        let y = row_y(item.serial - 1);
        let cells = [
            item.serial.to_string(),
            item.hs_code.to_string(),
            item.marks_and_nos.to_string(),
            item.packages.to_string(),
            item.description.to_string(),
            item.quantity.to_string(),
            format_amount(item.rate),
            format_amount(item.amount()),
        ];
        TABLE_COLUMNS
            .into_iter()
            .zip(cells)
            .map(move |(x, text)| Placement::new(x, y, text))
    })
}

fn footer(data: &InvoiceData) -> Vec<Placement> {
    vec![
        Placement::new(520, 1820, data.total_cartons.as_str()),
        Placement::new(1700, 2480, format!("{} PCS", data.total_quantity)),
        Placement::new(520, 1870, format!("{} KGS", data.net_weight)),
        Placement::new(520, 1930, format!("{} KGS", data.gross_weight)),
        Placement::new(520, 1990, data.variation.as_str()),
        Placement::new(100, 2100, data.exporter_bank_details.as_str()),
        Placement::new(2190, 2475, format_amount(data.total_value())),
        Placement::new(350, 2475, data.total_amount_in_words.as_str()),
        Placement::new(1700, 2600, data.company_name_stamp.as_str()),
        Placement::new(1750, 2640, data.authorised_signature.as_str()),
    ]
}

/// Every piece of text to draw for `data`, header first, then the item
/// table, then the footer.
pub fn layout(data: &InvoiceData) -> Vec<Placement> {
    header(data)
        .into_iter()
        .chain(table(data))
        .chain(footer(data))
        .collect()
}
