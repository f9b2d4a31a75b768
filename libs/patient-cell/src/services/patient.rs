use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use security_cell::ValidationService;
use shared_database::{collections, decode, DocumentStore};
use shared_utils::AppState;

use crate::models::{Patient, PatientError, UpdatePatientProfileRequest};

pub struct PatientService {
    store: Arc<dyn DocumentStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn get_patient(&self, patient_id: &str) -> Result<Patient, PatientError> {
        debug!("Fetching patient {}", patient_id);

        let document = self
            .store
            .find_by_id(collections::PATIENTS, patient_id)
            .await?
            .ok_or(PatientError::NotFound)?;
        Ok(decode(document)?)
    }

    /// Applies the provided fields after validating each of them. `today` is
    /// the clinic-local date used to check the date of birth.
    pub async fn update_profile(
        &self,
        patient_id: &str,
        request: UpdatePatientProfileRequest,
        today: NaiveDate,
    ) -> Result<Patient, PatientError> {
        let validator = ValidationService::new();
        let mut patch = Map::new();

        if let Some(name) = request.name {
            validator.validate_name(&name)?;
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = request.phone {
            let digits = validator.validate_phone(&phone)?;
            patch.insert("phone".to_string(), json!(digits));
        }
        if let Some(address) = request.address {
            validator.validate_patient_address_line(&address.line1, true)?;
            validator.validate_patient_address_line(&address.line2, false)?;
            patch.insert("address".to_string(), json!(address));
        }
        if let Some(gender) = request.gender {
            validator.validate_gender(&gender)?;
            patch.insert("gender".to_string(), json!(gender));
        }
        if let Some(dob) = request.dob {
            validator.validate_dob(&dob, today)?;
            patch.insert("dob".to_string(), json!(dob));
        }
        if let Some(image) = request.image {
            validator.validate_image_url(&image)?;
            patch.insert("image".to_string(), json!(image));
        }

        if patch.is_empty() {
            return self.get_patient(patient_id).await;
        }

        let document = self
            .store
            .update_by_id(collections::PATIENTS, patient_id, Value::Object(patch))
            .await?
            .ok_or(PatientError::NotFound)?;

        info!("Patient {} updated their profile", patient_id);
        Ok(decode(document)?)
    }
}
