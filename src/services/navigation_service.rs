// src/services/navigation_service.rs

use crate::models::{
    auth::AppRole,
    navigation::{GateOutcome, SessionState, View},
};

pub const LOGIN_PATH: &str = "/login";

/// Traduz um caminho do aplicativo para a tela correspondente.
pub fn resolve_path(path: &str) -> View {
    let trimmed = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => View::Entry,
        ["login"] => View::Login,

        ["importer", "dashboard"] => View::ImporterDashboard,
        ["importer", "products"] => View::ImporterProducts,
        ["importer", "products", "new"] => View::ImporterProductNew,
        ["importer", "products", id] => View::ImporterProductDetail(id.to_string()),
        ["importer", "products", id, "edit"] => View::ImporterProductEdit(id.to_string()),
        ["importer", "quote-requests"] => View::ImporterQuoteRequests,
        ["importer", "quote-requests", "new"] => View::ImporterQuoteRequestNew,
        ["importer", "quote-requests", id] => View::ImporterQuoteRequestDetail(id.to_string()),
        ["importer", "quotes", id, "simulate"] => View::ImporterCostSimulation(id.to_string()),

        ["exporter", "dashboard"] => View::ExporterDashboard,
        ["exporter", "quote-requests"] => View::ExporterQuoteRequests,
        ["exporter", "quote-requests", id] => View::ExporterQuoteRequestDetail(id.to_string()),

        _ => View::NotFound,
    }
}

fn redirect(location: &str) -> GateOutcome {
    GateOutcome::Redirect { location: location.to_string() }
}

/// Decide o que fazer com a tela pedida dado o estado da sessão.
pub fn gate(session: &SessionState, view: &View) -> GateOutcome {
    if *session == SessionState::Loading {
        return GateOutcome::Wait;
    }

    match (view, view.required_role(), session) {
        (View::Entry, _, _) => redirect(LOGIN_PATH),
        (View::Login, _, SessionState::Authenticated { role, .. }) => redirect(role.home_path()),
        (_, None, _) => GateOutcome::Render,
        (_, Some(_), SessionState::Anonymous) => redirect(LOGIN_PATH),
        (_, Some(required), SessionState::Authenticated { role, .. }) if *role != required => {
            redirect(role.home_path())
        }
        _ => GateOutcome::Render,
    }
}

pub fn session_for(role: Option<(uuid::Uuid, AppRole)>) -> SessionState {
    match role {
        Some((profile_id, role)) => SessionState::Authenticated { profile_id, role },
        None => SessionState::Anonymous,
    }
}
