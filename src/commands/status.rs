use crate::output::UserOutput;
use service_dashboard::{
    ConnectionState, DashboardClient, DashboardConfig, EffectiveStatus, HealthStream, PollLoop,
    ServiceListSource, ServiceOverview, StatusStore,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn run_status(
    config: &DashboardConfig,
    json: bool,
    watch: bool,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let client = Arc::new(DashboardClient::new(&config.base_url)?);
    let store = Arc::new(StatusStore::new(client.clone()));

    if watch {
        return run_watch(config, client, store, out).await;
    }

    // One-shot: a single fetch seeds the merger, then render.
    let entries = client.fetch_services().await?;
    store.merger().apply_service_list(entries);

    if json {
        out.status(&render_json(&store.overview())?);
    } else {
        render_table(&store.overview(), None, out);
    }
    Ok(())
}

/// Follow mode: poll loop + health stream feed the store until Ctrl-C.
async fn run_watch(
    config: &DashboardConfig,
    client: Arc<DashboardClient>,
    store: Arc<StatusStore>,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let merger = store.merger();

    let poll = PollLoop::new(
        client.clone(),
        merger.clone(),
        config.poll_interval(),
        cancel.clone(),
    );
    let stream = Arc::new(HealthStream::new(
        client.health_stream_url(),
        merger,
        cancel.clone(),
        config.reconnect_base(),
        config.reconnect_max(),
    ));

    let poll_task = tokio::spawn(poll.run());
    let stream_task = tokio::spawn(Arc::clone(&stream).run());

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                // ANSI clear + home, then re-render from the latest snapshots.
                print!("\x1b[2J\x1b[H");
                render_table(&store.overview(), Some(stream.connection_state()), out);
                if let Some(bulk) = store.active_bulk() {
                    out.status(&format!(
                        "  bulk {} in progress across {} services",
                        bulk.kind.as_str(),
                        bulk.affected.len()
                    ));
                }
            }
        }
    }

    // Deterministic teardown: closes the stream with a normal-closure frame
    // and stops the pending reconnect timer along with the poll loop.
    cancel.cancel();
    let _ = poll_task.await;
    let _ = stream_task.await;
    Ok(())
}

fn status_icon(status: EffectiveStatus) -> &'static str {
    if status.is_transitioning() {
        return ".";
    }
    match status {
        EffectiveStatus::Healthy | EffectiveStatus::Built | EffectiveStatus::Completed => "+",
        EffectiveStatus::Degraded => "~",
        EffectiveStatus::Unhealthy | EffectiveStatus::Failed | EffectiveStatus::Error => "x",
        EffectiveStatus::Stopped | EffectiveStatus::NotRunning => "o",
        EffectiveStatus::Watching | EffectiveStatus::Building => ".",
        _ => "?",
    }
}

fn render_table(
    overview: &[ServiceOverview],
    connection: Option<ConnectionState>,
    out: &dyn UserOutput,
) {
    out.status("Service Status:");
    out.status(&format!("{:-<64}", ""));

    if overview.is_empty() {
        out.status("  No services known");
    } else {
        for row in overview {
            let url = row.snapshot.runtime.url.as_deref().unwrap_or("");
            out.status(&format!(
                "  {} {:<24} {:<14} {}",
                status_icon(row.status),
                row.snapshot.name,
                row.status.label(),
                url
            ));
            if let Some(error) = &row.error {
                out.warning(&format!("      last operation failed: {}", error));
            }
        }
    }

    if let Some(state) = connection {
        if !state.is_connected() {
            out.warning("  health stream disconnected; showing last known health");
        }
    }
}

fn render_json(overview: &[ServiceOverview]) -> anyhow::Result<String> {
    use serde_json::json;

    let rows = overview
        .iter()
        .map(|row| {
            (
                row.snapshot.name.clone(),
                json!({
                    "lifecycle": row.snapshot.lifecycle.to_string(),
                    "health": row.snapshot.health.to_string(),
                    "operation": row.operation.to_string(),
                    "requested_at": row.requested_at,
                    "status": row.status,
                    "url": row.snapshot.runtime.url,
                    "port": row.snapshot.runtime.port,
                    "error": row.error,
                }),
            )
        })
        .collect::<serde_json::Map<_, _>>();

    Ok(serde_json::to_string_pretty(&rows)?)
}
