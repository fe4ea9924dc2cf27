//! Application routes and the navigation seam used by the request pipeline.

use std::fmt;

/// Every screen the front-end can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Projects,
    ProjectNew,
    ProjectDetail(i64),
    ProjectEdit(i64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::ProjectNew => "/projects/new".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{}", id),
            Route::ProjectEdit(id) => format!("/projects/{}/edit", id),
        }
    }

    /// Resolve a path. Unknown paths fall back to the project list.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["projects", "new"] => Route::ProjectNew,
            ["projects", id] => id
                .parse()
                .map(Route::ProjectDetail)
                .unwrap_or(Route::Projects),
            ["projects", id, "edit"] => id
                .parse()
                .map(Route::ProjectEdit)
                .unwrap_or(Route::Projects),
            _ => Route::Projects,
        }
    }

    /// Routes reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the UI currently is, and how to move it.
pub trait Navigator: Send + Sync {
    fn current_route(&self) -> Route;

    fn navigate(&self, route: Route);
}

/// Accept only app-relative return paths.
///
/// Scheme-qualified (`https://...`) and protocol-relative (`//host`) values
/// are rejected so a crafted link cannot send the user off-site after login.
pub fn sanitize_return_route(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || !trimmed.starts_with('/') || trimmed.starts_with("//") {
        return None;
    }
    if has_scheme(trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}

fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}
