// src/handlers/navigation.rs

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    config::AppState,
    models::navigation::{NavigationQuery, NavigationResponse},
    services::navigation_service::{gate, resolve_path, session_for},
};

// Rota pública: o token é opcional e um token inválido equivale a não ter sessão.
#[utoipa::path(
    get,
    path = "/api/navigation",
    tag = "Navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Tela resolvida e decisão do guardião", body = NavigationResponse)
    ),
    security(
        (),
        ("api_jwt" = [])
    )
)]
pub async fn resolve_navigation(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let session = match bearer {
        Some(TypedHeader(Authorization(bearer))) => {
            match app_state.auth_service.validate_token(bearer.token()).await {
                Ok(user) => session_for(Some((user.profile_id(), user.role()))),
                Err(e) => {
                    tracing::debug!("token ignorado na navegação: {}", e);
                    session_for(None)
                }
            }
        }
        None => session_for(None),
    };

    let view = resolve_path(&query.path);
    let decision = gate(&session, &view);

    Json(NavigationResponse {
        path: query.path,
        view,
        decision,
    })
}
