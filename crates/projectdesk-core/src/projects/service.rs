use reqwest::Method;
use tracing::{debug, info};

use super::query::ListProjectsParams;
use crate::api::{ApiClient, ApiError};
use crate::models::{Page, Project, ProjectInput};

const PROJECTS_PATH: &str = "/projects";

/// CRUD calls on `/projects`. Every call is protected.
#[derive(Clone)]
pub struct ProjectService {
    api: ApiClient,
}

impl ProjectService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, params: &ListProjectsParams) -> Result<Page<Project>, ApiError> {
        let page: Page<Project> = self.api.get(PROJECTS_PATH, &params.to_query()).await?;
        debug!(
            page = page.number,
            count = page.content.len(),
            total = page.total_elements,
            "Fetched projects"
        );
        Ok(page)
    }

    pub async fn get(&self, id: i64) -> Result<Project, ApiError> {
        self.api.get(&item_path(id), &[]).await
    }

    pub async fn create(&self, input: &ProjectInput) -> Result<Project, ApiError> {
        let project: Project = self.api.post(PROJECTS_PATH, input).await?;
        info!(id = project.id, "Project created");
        Ok(project)
    }

    pub async fn update(&self, id: i64, input: &ProjectInput) -> Result<Project, ApiError> {
        let project: Project = self.api.put(&item_path(id), input).await?;
        info!(id, "Project updated");
        Ok(project)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.send::<()>(Method::DELETE, &item_path(id), None).await?;
        info!(id, "Project deleted");
        Ok(())
    }
}

fn item_path(id: i64) -> String {
    format!("{}/{}", PROJECTS_PATH, id)
}
