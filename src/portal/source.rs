use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashSet;

use super::models::{AppointmentStatus, ClientRecords};
use crate::auth::demo_provider::DEMO_CLIENT_ID;

const BUNDLED_FIXTURES: &str = include_str!("fixtures.json");

/// Totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortalSummary {
    pub clients: usize,
    pub upcoming_appointments: usize,
}

/// Where display records come from. Records are keyed by the client's
/// identity id.
#[async_trait]
pub trait PortalDataSource: Send + Sync {
    async fn records_for(&self, client_id: &str) -> Result<ClientRecords>;

    async fn summary(&self) -> Result<PortalSummary>;
}

/// Serves the fixture set bundled with the binary.
#[derive(Debug, Clone, Default)]
pub struct FixtureDataSource {
    records: ClientRecords,
    // Client whose records stand in for clients that have none of their own
    shared_with: Option<String>,
}

impl FixtureDataSource {
    /// The demo fixtures. Every client without records of their own is shown
    /// the demo client's records, so freshly enrolled demo accounts see data.
    pub fn bundled() -> Result<Self> {
        let source =
            Self::from_json(BUNDLED_FIXTURES).context("Failed to parse bundled portal fixtures")?;
        Ok(source.shared_with(DEMO_CLIENT_ID))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: ClientRecords = serde_json::from_str(json)?;
        log::debug!(
            "Loaded fixtures: {} appointments, {} equipment, {} certificates, {} invoices",
            records.appointments.len(),
            records.equipment.len(),
            records.certificates.len(),
            records.invoices.len()
        );
        Ok(Self {
            records,
            shared_with: None,
        })
    }

    pub fn shared_with(mut self, client_id: &str) -> Self {
        self.shared_with = Some(client_id.to_string());
        self
    }

    fn owned_by(&self, client_id: &str) -> ClientRecords {
        let all = &self.records;
        ClientRecords {
            appointments: all
                .appointments
                .iter()
                .filter(|a| a.client_id == client_id)
                .cloned()
                .collect(),
            equipment: all
                .equipment
                .iter()
                .filter(|e| e.client_id == client_id)
                .cloned()
                .collect(),
            certificates: all
                .certificates
                .iter()
                .filter(|c| c.client_id == client_id)
                .cloned()
                .collect(),
            invoices: all
                .invoices
                .iter()
                .filter(|i| i.client_id == client_id)
                .cloned()
                .collect(),
        }
    }
}

#[async_trait]
impl PortalDataSource for FixtureDataSource {
    async fn records_for(&self, client_id: &str) -> Result<ClientRecords> {
        let records = self.owned_by(client_id);
        match &self.shared_with {
            Some(shared) if records == ClientRecords::default() && shared != client_id => {
                log::debug!("No records for {}, showing those of {}", client_id, shared);
                Ok(self.owned_by(shared))
            }
            _ => Ok(records),
        }
    }

    async fn summary(&self) -> Result<PortalSummary> {
        let clients: HashSet<&str> = self
            .records
            .appointments
            .iter()
            .map(|a| a.client_id.as_str())
            .chain(self.records.equipment.iter().map(|e| e.client_id.as_str()))
            .collect();

        Ok(PortalSummary {
            clients: clients.len(),
            upcoming_appointments: self
                .records
                .appointments
                .iter()
                .filter(|a| a.status == AppointmentStatus::Upcoming)
                .count(),
        })
    }
}
