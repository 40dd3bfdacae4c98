//! HTTP command/status surface
//!
//! The UI (web page, CLI, anything) talks to the session through these four
//! routes. Commands are fire-and-forget: they answer 202 immediately and
//! their effect is observed through `/api/status`.

use ariametadata::NowPlaying;
use ariasession::{LoadingSignal, SessionController, StatusSnapshot};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    controller: SessionController,
    loading: LoadingSignal,
    now_playing: watch::Receiver<NowPlaying>,
}

impl AppState {
    pub fn new(
        controller: SessionController,
        loading: LoadingSignal,
        now_playing: watch::Receiver<NowPlaying>,
    ) -> Self {
        Self {
            controller,
            loading,
            now_playing,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/play", post(play))
        .route("/api/pause", post(pause))
        .route("/api/nowplaying", get(now_playing))
        .with_state(state)
}

/// Current status snapshot, `isLoading` read live from the shared signal.
async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    let mut snapshot = state.controller.snapshot();
    snapshot.is_loading = state.loading.get();
    Json(snapshot)
}

async fn play(State(state): State<AppState>) -> StatusCode {
    state.controller.play().await;
    StatusCode::ACCEPTED
}

async fn pause(State(state): State<AppState>) -> StatusCode {
    state.controller.pause().await;
    StatusCode::ACCEPTED
}

async fn now_playing(State(state): State<AppState>) -> Json<NowPlaying> {
    Json(state.now_playing.borrow().clone())
}
