use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::rentals::domain::{
    PaymentId, PaymentRecord, Property, PropertyId, PropertyKind, PropertyPurpose, Tenancy,
    TenancyId, TenantInput,
};
use crate::rentals::repository::{
    PaymentRepository, PropertyRepository, RepositoryError, TenancyRepository,
};
use crate::rentals::service::RentalService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn rental_property(id: &str, address: &str, rental_price: u32) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        address: address.to_string(),
        purpose: PropertyPurpose::ForRent,
        owner: "Helena Duarte".to_string(),
        kind: PropertyKind::House,
        sale_price: 0,
        rental_price,
    }
}

pub(super) fn sale_property(id: &str, address: &str, sale_price: u32) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        address: address.to_string(),
        purpose: PropertyPurpose::ForSale,
        owner: "Helena Duarte".to_string(),
        kind: PropertyKind::Apartment,
        sale_price,
        rental_price: 0,
    }
}

pub(super) fn tenancy_for(id: &str, property_id: &str, start: NaiveDate) -> Tenancy {
    Tenancy {
        id: TenancyId(id.to_string()),
        name: "Maria Souza".to_string(),
        property_id: PropertyId(property_id.to_string()),
        due_day: 10,
        monthly_rent: 2500,
        start_date: start,
        end_date: None,
        email: None,
        phone: None,
    }
}

pub(super) fn ended(mut tenancy: Tenancy, end: NaiveDate) -> Tenancy {
    tenancy.end_date = Some(end);
    tenancy
}

pub(super) fn tenant_input(name: &str) -> TenantInput {
    TenantInput {
        name: name.to_string(),
        email: None,
        phone: None,
        due_day: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProperties {
    records: Arc<Mutex<Vec<Property>>>,
}

impl PropertyRepository for MemoryProperties {
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

#[derive(Clone)]
pub(super) struct MemoryTenancies {
    records: Arc<Mutex<Vec<Tenancy>>>,
    fail_delete: bool,
}

impl Default for MemoryTenancies {
    fn default() -> Self {
        Self {
            records: Arc::default(),
            fail_delete: false,
        }
    }
}

impl MemoryTenancies {
    /// Variant whose `delete` always fails, for compensation-failure tests.
    pub(super) fn failing_delete() -> Self {
        Self {
            records: Arc::default(),
            fail_delete: true,
        }
    }
}

impl TenancyRepository for MemoryTenancies {
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
        if self.fail_delete {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
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
pub(super) struct MemoryPayments {
    records: Arc<Mutex<Vec<PaymentRecord>>>,
}

impl PaymentRepository for MemoryPayments {
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

/// Payment store whose writes always fail, for rollback tests.
pub(super) struct UnavailablePayments;

impl PaymentRepository for UnavailablePayments {
    fn list(&self) -> Result<Vec<PaymentRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn fetch(&self, _id: &PaymentId) -> Result<Option<PaymentRecord>, RepositoryError> {
        Ok(None)
    }

    fn create(&self, _payment: PaymentRecord) -> Result<PaymentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _payment: PaymentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn delete(&self, _id: &PaymentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<RentalService<MemoryProperties, MemoryTenancies, MemoryPayments>>,
    Arc<MemoryProperties>,
    Arc<MemoryTenancies>,
    Arc<MemoryPayments>,
) {
    let properties = Arc::new(MemoryProperties::default());
    let tenancies = Arc::new(MemoryTenancies::default());
    let payments = Arc::new(MemoryPayments::default());
    let service = Arc::new(RentalService::new(
        properties.clone(),
        tenancies.clone(),
        payments.clone(),
    ));
    (service, properties, tenancies, payments)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
