use std::time::Duration;

use guandan_client::{ClientConfig, ClientError, Transport, ViewReconciler, ViewSnapshot};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guandan_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env(std::env::args().nth(1))?;
    info!(url = %config.ws_url, player = %config.player_name, "Starting Guandan client");

    let transport = Transport::connect(&config.ws_url).await?;
    let view = ViewReconciler::attach(transport.clone()).await;

    match &config.room_id {
        Some(room_id) => view.join_room(room_id, &config.player_name),
        None => view.create_room(&config.player_name),
    }
    if config.fill_bots {
        view.fill_bots();
    }

    tokio::select! {
        _ = follow(&view, config.autoplay) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    view.detach().await;
    transport.close();
    Ok(())
}

/// Log view changes until the connection drops, answering our own turns when
/// autoplay is on
async fn follow(view: &ViewReconciler, autoplay: bool) {
    let mut changes = view.watch();
    let mut acted = false;
    let mut last_error: Option<String> = None;

    while changes.changed().await.is_ok() {
        let snapshot = changes.borrow_and_update().clone();
        log_snapshot(&snapshot);

        if !snapshot.connected {
            warn!("Connection lost");
            break;
        }
        if !autoplay {
            continue;
        }

        if !snapshot.is_my_turn() {
            acted = false;
            continue;
        }
        // A rejection leaves the turn with us, so try again
        if snapshot.error_message.is_some() && snapshot.error_message != last_error {
            acted = false;
        }
        last_error = snapshot.error_message.clone();
        if acted {
            continue;
        }
        acted = true;

        let delay_ms = 300 + (rand::random::<u64>() % 700);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        autoplay_turn(view, &snapshot).await;
    }
}

/// Lead with the lowest card, otherwise pass
async fn autoplay_turn(view: &ViewReconciler, snapshot: &ViewSnapshot) {
    let leading = snapshot.table_cards.is_empty() || !snapshot.can_pass;
    if !leading {
        view.submit_pass();
        return;
    }
    let Some(lowest) = snapshot.hand.first() else {
        return;
    };
    for id in &snapshot.selected_ids {
        view.toggle_card(*id).await;
    }
    if view.toggle_card(lowest.id).await {
        view.submit_play().await;
    }
}

fn log_snapshot(snapshot: &ViewSnapshot) {
    let table: Vec<String> = snapshot.table_cards.iter().map(|c| c.to_string()).collect();
    info!(
        turn = snapshot.current_turn,
        my_turn = snapshot.is_my_turn(),
        level = %snapshot.level,
        hand = snapshot.hand.len(),
        table = ?table,
        combo = %snapshot.combo_type,
        counts = ?snapshot.player_card_counts,
        "View updated"
    );
    if let Some(message) = &snapshot.error_message {
        warn!(message = %message, "Server rejected");
    }
    if let Some(result) = &snapshot.game_result {
        info!(winning_team = result.winning_team, "Game finished");
    }
}
