use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, warn};

use crate::app_state::AppState;
use crate::db::models::{TrainingProgram, TrainingUpdateDetail};
use crate::db::repositories::{ProgramFilter, TrainingRepository, UpdateRepository};
use crate::db::DbResult;
use crate::feed::{ChangeTable, ClientMessage, FeedMessage, LiveFeed, SubscriptionFilter};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn load_initial(state: &AppState) -> DbResult<(Vec<TrainingUpdateDetail>, Vec<TrainingProgram>)> {
    let recent = UpdateRepository::list_recent(&state.db, state.env.feed.recent_cap as i64).await?;
    let active = TrainingRepository::list_programs(&state.db, &ProgramFilter::ongoing()).await?;
    Ok((recent, active))
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &FeedMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(text) => sender.send(Message::Text(text.into())).await,
        Err(e) => {
            error!("Failed to serialize feed message: {}", e);
            Ok(())
        }
    }
}

/// One dashboard connection: a snapshot of the recent updates and active
/// programs, then incremental messages until either side goes away. Both
/// subscriptions are taken before the snapshot query and released when the
/// connection ends.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut update_events = state
        .hub
        .subscribe(SubscriptionFilter::inserts(ChangeTable::TrainingUpdates));
    let mut program_events = state
        .hub
        .subscribe(SubscriptionFilter::table(ChangeTable::TrainingPrograms));

    let mut feed = LiveFeed::new(state.env.feed.recent_cap);
    match load_initial(&state).await {
        Ok((recent, active)) => feed.load(recent, active),
        Err(e) => warn!("Initial feed load failed: {}", e),
    }
    if send_message(&mut sender, &feed.snapshot()).await.is_err() {
        return;
    }

    loop {
        let outgoing = tokio::select! {
            event = update_events.next() => {
                let Some(event) = event else { break };
                match UpdateRepository::get_detail(&state.db, event.id).await {
                    Ok(Some(detail)) => feed.apply_update(detail),
                    Ok(None) => None,
                    Err(e) => {
                        warn!(update_id = %event.id, "Failed to load update: {}", e);
                        None
                    }
                }
            }
            event = program_events.next() => {
                if event.is_none() {
                    break;
                }
                match TrainingRepository::list_programs(&state.db, &ProgramFilter::ongoing()).await {
                    Ok(active) => Some(feed.replace_active(active)),
                    Err(e) => {
                        warn!("Failed to refresh active trainings: {}", e);
                        None
                    }
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => Some(feed.handle_client(message)),
                        Err(e) => {
                            debug!("Ignoring unknown client message: {}", e);
                            None
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => None,
            },
        };

        if let Some(message) = outgoing {
            if send_message(&mut sender, &message).await.is_err() {
                break;
            }
        }
    }

    debug!("Dashboard socket closed");
}
