//! Template persistence collaborator.

use std::collections::HashMap;

use async_trait::async_trait;
use certkit_core::DesignerError;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::persistence::TemplateDocument;

/// Create/update/get contract of the template backend.
///
/// Failures are reported as [`DesignerError::Persistence`] carrying the
/// backend's message.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Stores a new template and returns its id.
    async fn create(&self, template: &TemplateDocument) -> Result<String, DesignerError>;

    async fn update(&self, id: &str, template: &TemplateDocument) -> Result<(), DesignerError>;

    async fn get(&self, id: &str) -> Result<TemplateDocument, DesignerError>;
}

/// In-process store for hosts without a backend, and for tests.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, TemplateDocument>>,
    fail_next: Mutex<Option<String>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with `message` (may be empty).
    pub fn fail_next_with(&self, message: impl Into<String>) {
        *self.fail_next.lock() = Some(message.into());
    }

    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }

    /// Snapshot of a stored template.
    pub fn snapshot(&self, id: &str) -> Option<TemplateDocument> {
        self.templates.read().get(id).cloned()
    }

    fn injected_failure(&self) -> Result<(), DesignerError> {
        match self.fail_next.lock().take() {
            Some(message) => Err(DesignerError::persistence(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn create(&self, template: &TemplateDocument) -> Result<String, DesignerError> {
        self.injected_failure()?;
        let id = Uuid::new_v4().to_string();
        self.templates.write().insert(id.clone(), template.clone());
        Ok(id)
    }

    async fn update(&self, id: &str, template: &TemplateDocument) -> Result<(), DesignerError> {
        self.injected_failure()?;
        let mut templates = self.templates.write();
        match templates.get_mut(id) {
            Some(existing) => {
                *existing = template.clone();
                Ok(())
            }
            None => Err(DesignerError::persistence(format!("Template {} not found", id))),
        }
    }

    async fn get(&self, id: &str) -> Result<TemplateDocument, DesignerError> {
        self.injected_failure()?;
        self.templates
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| DesignerError::persistence(format!("Template {} not found", id)))
    }
}
