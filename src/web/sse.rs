use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::warn;

use super::state::{AppState, ViewUpdate};

pub async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let rx = state.tx.subscribe();
    let stream = BroadcastStream::new(rx);

    let stream = stream.filter_map(|result| match result {
        Ok(update) => view_event(&update).map(Ok),
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn view_event(update: &ViewUpdate) -> Option<Event> {
    match Event::default().event(update.event_name()).json_data(update) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Failed to encode view update: {}", e);
            None
        }
    }
}
