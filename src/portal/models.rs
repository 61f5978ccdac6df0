use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

macro_rules! status_label {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }
    };
}

status_label!(AppointmentStatus {
    Upcoming => "UPCOMING",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
});

status_label!(TestStatus {
    Pass => "PASS",
    Fail => "FAIL",
    Pending => "PENDING",
});

status_label!(InvoiceStatus {
    Paid => "PAID",
    Pending => "PENDING",
    Overdue => "OVERDUE",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub date: NaiveDate,
    /// Time window as shown to the client, e.g. "09:00 - 12:00".
    pub time: String,
    pub status: AppointmentStatus,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub equipment_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub client_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub serial_number: String,
    pub last_test_date: NaiveDate,
    pub next_test_date: NaiveDate,
    pub status: TestStatus,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub client_id: String,
    pub appointment_id: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub equipment_tested: u32,
    pub file_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub appointment_id: String,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub file_url: String,
    pub file_name: String,
}

/// Everything a client can see, as delivered by a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRecords {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}
