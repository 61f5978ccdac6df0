use chrono::NaiveDate;

use super::models::{Appointment, AppointmentStatus, Equipment};

pub const RECENT_APPOINTMENT_LIMIT: usize = 3;

pub fn upcoming_appointments(appointments: &[Appointment]) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Upcoming)
        .collect()
}

/// Completed visits in the order the data source lists them, capped at `limit`.
pub fn recent_appointments(appointments: &[Appointment], limit: usize) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .take(limit)
        .collect()
}

/// Case-insensitive match on name, type or serial number. An empty query
/// returns everything.
pub fn search_equipment<'a>(equipment: &'a [Equipment], query: &str) -> Vec<&'a Equipment> {
    let needle = query.trim().to_lowercase();
    equipment
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.name.to_lowercase().contains(&needle)
                || item.kind.to_lowercase().contains(&needle)
                || item.serial_number.to_lowercase().contains(&needle)
        })
        .collect()
}

// en-GB short form, e.g. "4 Nov 2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

pub fn format_amount(amount: f64) -> String {
    format!("£{:.2}", amount)
}

pub fn notes_or_default(appointment: &Appointment) -> &str {
    appointment
        .notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("No additional notes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::models::TestStatus;

    fn appointment(id: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "c".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 4).unwrap(),
            time: "09:00 - 12:00".to_string(),
            status,
            location: "Leeds".to_string(),
            notes: None,
            equipment_count: None,
        }
    }

    fn equipment(name: &str, kind: &str, serial: &str) -> Equipment {
        Equipment {
            id: serial.to_string(),
            client_id: "c".to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            serial_number: serial.to_string(),
            last_test_date: NaiveDate::from_ymd_opt(2026, 8, 14).unwrap(),
            next_test_date: NaiveDate::from_ymd_opt(2027, 8, 14).unwrap(),
            status: TestStatus::Pass,
            location: "Office".to_string(),
        }
    }

    #[test]
    fn splits_upcoming_and_recent() {
        let list = vec![
            appointment("a", AppointmentStatus::Upcoming),
            appointment("b", AppointmentStatus::Completed),
            appointment("c", AppointmentStatus::Cancelled),
            appointment("d", AppointmentStatus::Completed),
            appointment("e", AppointmentStatus::Completed),
            appointment("f", AppointmentStatus::Completed),
            appointment("g", AppointmentStatus::Upcoming),
        ];

        let upcoming: Vec<&str> = upcoming_appointments(&list).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(upcoming, ["a", "g"]);

        let recent: Vec<&str> = recent_appointments(&list, RECENT_APPOINTMENT_LIMIT)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(recent, ["b", "d", "e"]);
    }

    #[test]
    fn equipment_search_covers_name_type_and_serial() {
        let items = vec![
            equipment("Breville Kettle", "Kitchen Appliance", "BK-3000"),
            equipment("Dell Laptop", "IT Equipment", "DL-7420"),
            equipment("Extension Lead", "Cable", "EL-4W"),
        ];

        assert_eq!(search_equipment(&items, "").len(), 3);
        assert_eq!(search_equipment(&items, "KETTLE")[0].serial_number, "BK-3000");
        assert_eq!(search_equipment(&items, "it equip")[0].name, "Dell Laptop");
        assert_eq!(search_equipment(&items, "el-4")[0].name, "Extension Lead");
        assert!(search_equipment(&items, "forklift").is_empty());
    }

    #[test]
    fn formats_dates_and_money_for_uk_readers() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 4).unwrap();
        assert_eq!(format_date(date), "4 Nov 2026");
        assert_eq!(format_amount(225.5), "£225.50");
        assert_eq!(format_amount(378.0), "£378.00");
    }

    #[test]
    fn missing_notes_fall_back() {
        let mut apt = appointment("a", AppointmentStatus::Upcoming);
        assert_eq!(notes_or_default(&apt), "No additional notes");
        apt.notes = Some("Bring ladder".to_string());
        assert_eq!(notes_or_default(&apt), "Bring ladder");
    }
}
