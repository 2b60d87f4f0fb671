use aumdash_derive::SheetColumns;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Display labels for months 1..=12.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Label for a month number, `None` outside 1..=12.
pub fn month_name(month: u8) -> Option<&'static str> {
    match month {
        1..=12 => Some(MONTH_NAMES[usize::from(month) - 1]),
        _ => None,
    }
}

/// First day of the given month, `None` for an impossible date.
pub fn first_of_month(year: i16, month: u8) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), 1)
}

/// One client's AUM position reported by one advisor for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub year: i16,
    pub month: u8,
    pub segment: String,
    pub desk: String,
    pub advisor_id: String,
    pub advisor_name: String,
    pub client_id: String,
    pub client_name: String,
    pub aum_value: Decimal,
    pub client_flag: u8,
    pub date: NaiveDate,
    pub month_name: &'static str,
}

impl Record {
    /// Identity used for the advisor dimension.
    pub fn advisor(&self) -> &str {
        &self.advisor_name
    }
}

/// Description of one input column, generated by `SheetColumns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Headers accepted in place of `name`.
    pub aliases: &'static [&'static str],
    pub kind: &'static str,
    pub description: &'static str,
}

impl ColumnSpec {
    pub fn accepts(&self, header: &str) -> bool {
        self.name == header || self.aliases.contains(&header)
    }
}

/// Raw sheet row as read from a batch, before coercion.
///
/// Every cell is kept as text so blanks and loosely formatted numbers
/// (`2017.0`, `1.5e7`) can be normalized in one place by the loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, SheetColumns)]
pub struct SheetRow {
    /// Fiscal year of the observation
    #[serde(alias = "Año")]
    #[column(kind = "integer")]
    pub year: Option<String>,
    /// Month number, 1-12
    #[serde(alias = "Numero de Mes")]
    #[column(kind = "integer")]
    pub month: Option<String>,
    /// Client segment within the desk
    #[serde(alias = "Segmento Mesa")]
    pub segment: Option<String>,
    /// Business desk
    #[serde(alias = "Mesa")]
    pub desk: Option<String>,
    /// Advisor identification document
    #[serde(alias = "Doc. Identificación")]
    pub advisor_id: Option<String>,
    /// Advisor display name
    #[serde(alias = "Asesor Comercial")]
    pub advisor_name: Option<String>,
    /// Client identification number
    #[serde(alias = "Numero  Identificación")]
    pub client_id: Option<String>,
    /// Client display name
    #[serde(alias = "Nombre Cliente")]
    pub client_name: Option<String>,
    /// Assets under management at month end
    #[serde(alias = "AUM Fin de Mes")]
    #[column(kind = "decimal")]
    pub aum_value: Option<String>,
    /// Client count indicator (0 or 1)
    #[serde(alias = "No.Clientes")]
    #[column(kind = "integer")]
    pub client_flag: Option<String>,
}

impl From<&Record> for SheetRow {
    fn from(record: &Record) -> Self {
        SheetRow {
            year: Some(record.year.to_string()),
            month: Some(record.month.to_string()),
            segment: Some(record.segment.clone()),
            desk: Some(record.desk.clone()),
            advisor_id: Some(record.advisor_id.clone()),
            advisor_name: Some(record.advisor_name.clone()),
            client_id: Some(record.client_id.clone()),
            client_name: Some(record.client_name.clone()),
            aum_value: Some(record.aum_value.to_string()),
            client_flag: Some(record.client_flag.to_string()),
        }
    }
}
