use crate::modules::job::service::JobOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: JobOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        Self { orchestrator }
    }
}
