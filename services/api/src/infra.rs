use metrics_exporter_prometheus::PrometheusHandle;
use portal_familia::workflows::dignometro::{
    sort_newest_first, AssessmentRecord, AssessmentRepository, FamilyId, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local assessment store, grouped by family.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<FamilyId, Vec<AssessmentRecord>>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate = guard
            .values()
            .flatten()
            .any(|existing| existing.id == record.id);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard
            .entry(record.family_id.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn history(&self, family_id: &FamilyId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records = guard.get(family_id).cloned().unwrap_or_default();
        sort_newest_first(&mut records);
        Ok(records)
    }
}
