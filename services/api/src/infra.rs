use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rentbook::rentals::{
    PaymentId, PaymentRecord, PaymentRepository, Property, PropertyId, PropertyRepository,
    RepositoryError, Tenancy, TenancyId, TenancyRepository,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

// Insertion order doubles as store order, which the listing endpoints rely on.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyRepository {
    records: Arc<Mutex<Vec<Property>>>,
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.records.lock().expect("property mutex poisoned").clone())
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        let guard = self.records.lock().expect("property mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn create(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.records.lock().expect("property mutex poisoned");
        if guard.iter().any(|record| record.id == property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("property mutex poisoned");
        match guard.iter_mut().find(|record| record.id == property.id) {
            Some(record) => {
                *record = property;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: &PropertyId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("property mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTenancyRepository {
    records: Arc<Mutex<Vec<Tenancy>>>,
}

impl TenancyRepository for InMemoryTenancyRepository {
    fn list(&self) -> Result<Vec<Tenancy>, RepositoryError> {
        Ok(self.records.lock().expect("tenancy mutex poisoned").clone())
    }

    fn fetch(&self, id: &TenancyId) -> Result<Option<Tenancy>, RepositoryError> {
        let guard = self.records.lock().expect("tenancy mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn create(&self, tenancy: Tenancy) -> Result<Tenancy, RepositoryError> {
        let mut guard = self.records.lock().expect("tenancy mutex poisoned");
        if guard.iter().any(|record| record.id == tenancy.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(tenancy.clone());
        Ok(tenancy)
    }

    fn update(&self, tenancy: Tenancy) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("tenancy mutex poisoned");
        match guard.iter_mut().find(|record| record.id == tenancy.id) {
            Some(record) => {
                *record = tenancy;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: &TenancyId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("tenancy mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPaymentRepository {
    records: Arc<Mutex<Vec<PaymentRecord>>>,
}

impl PaymentRepository for InMemoryPaymentRepository {
    fn list(&self) -> Result<Vec<PaymentRecord>, RepositoryError> {
        Ok(self.records.lock().expect("payment mutex poisoned").clone())
    }

    fn fetch(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("payment mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn create(&self, payment: PaymentRecord) -> Result<PaymentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("payment mutex poisoned");
        if guard.iter().any(|record| record.id == payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(payment.clone());
        Ok(payment)
    }

    fn update(&self, payment: PaymentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("payment mutex poisoned");
        match guard.iter_mut().find(|record| record.id == payment.id) {
            Some(record) => {
                *record = payment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: &PaymentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("payment mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
