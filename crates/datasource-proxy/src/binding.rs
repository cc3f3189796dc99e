//! # Project Binding
//!
//! The immutable tuple tying a proxy to one project and the platform
//! registries that govern it. Set once at deployment.

use crate::ports::outbound::{Directory, OperatorStore, ProjectsRegistry};
use shared_types::ProjectId;
use std::fmt;
use std::sync::Arc;

/// Registries and project a proxy is bound to.
#[derive(Clone)]
pub struct ProjectBinding {
    directory: Arc<dyn Directory>,
    projects: Arc<dyn ProjectsRegistry>,
    operator_store: Arc<dyn OperatorStore>,
    project_id: ProjectId,
}

impl ProjectBinding {
    /// Bind to `project_id` through the given registries.
    #[must_use]
    pub fn new(
        directory: Arc<dyn Directory>,
        projects: Arc<dyn ProjectsRegistry>,
        operator_store: Arc<dyn OperatorStore>,
        project_id: ProjectId,
    ) -> Self {
        Self {
            directory,
            projects,
            operator_store,
            project_id,
        }
    }

    /// Project served.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Project directory.
    #[must_use]
    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    /// Project ownership registry.
    #[must_use]
    pub fn projects(&self) -> &Arc<dyn ProjectsRegistry> {
        &self.projects
    }

    /// Operator permission registry.
    #[must_use]
    pub fn operator_store(&self) -> &Arc<dyn OperatorStore> {
        &self.operator_store
    }
}

impl fmt::Debug for ProjectBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectBinding")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}
