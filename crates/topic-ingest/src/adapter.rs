use std::time::Duration;

use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use topic_tree::{StoreError, TopicStore};

const UPDATE_CHANNEL_CAPACITY: usize = 1024;
const COMMAND_CHANNEL_CAPACITY: usize = 4;
const KEEP_ALIVE: Duration = Duration::from_secs(60);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// One decoded message from the broker, as delivered to the writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicUpdate {
    pub topic: String,
    pub payload: Vec<u8>,
}

enum IngestCommand {
    Shutdown,
}

/// Handle over the two ingest tasks. Dropping it leaves the pipeline
/// running until the process exits; [`IngestHandle::shutdown`] tears it
/// down in order (MQTT task first, then the writer drains and stops).
pub struct IngestHandle {
    command_tx: mpsc::Sender<IngestCommand>,
    mqtt_task: JoinHandle<()>,
    apply_task: JoinHandle<()>,
}

impl IngestHandle {
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(IngestCommand::Shutdown).await;
        let _ = self.mqtt_task.await;
        // The MQTT task dropped its sender; the writer ends once the
        // channel is drained.
        let _ = self.apply_task.await;
    }
}

/// Start the ingest pipeline: an MQTT event-loop task feeding a bounded
/// channel, and a single writer task applying updates to `store`.
pub fn spawn_ingest(store: TopicStore, config: crate::IngestConfig) -> IngestHandle {
    let (update_tx, update_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

    let mqtt_task = tokio::spawn(run_mqtt_loop(config, update_tx, command_rx));
    let apply_task = tokio::spawn(apply_updates(store, update_rx));

    IngestHandle {
        command_tx,
        mqtt_task,
        apply_task,
    }
}

/// Owns the broker connection. Subscribes to the root pattern on every
/// `ConnAck` so a reconnect restores the subscription, and forwards each
/// inbound publish to the writer. Connection errors log and back off;
/// they never cross the channel.
async fn run_mqtt_loop(
    config: crate::IngestConfig,
    update_tx: mpsc::Sender<TopicUpdate>,
    mut command_rx: mpsc::Receiver<IngestCommand>,
) {
    let client_id = format!("topic-mcp-{}", std::process::id());
    let mut options = MqttOptions::new(client_id, &config.broker_host, config.broker_port);
    options.set_keep_alive(KEEP_ALIVE);

    info!(
        "Connecting to {}:{} (subscription {})",
        config.broker_host, config.broker_port, config.topic_root
    );
    let (client, mut event_loop) = AsyncClient::new(options, 64);

    loop {
        tokio::select! {
            Some(IngestCommand::Shutdown) = command_rx.recv() => {
                let _ = client.disconnect().await;
                break;
            }
            event = event_loop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected, subscribing to {}", config.topic_root);
                    if let Err(err) = client.subscribe(&config.topic_root, QoS::AtMostOnce).await {
                        error!("Subscribe request failed: {err}");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let update = TopicUpdate {
                        topic: publish.topic,
                        payload: publish.payload.to_vec(),
                    };
                    // Bounded channel: a full buffer makes the transport
                    // wait, it never drops an update.
                    if update_tx.send(update).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("MQTT connection error: {err}; retrying in {RECONNECT_DELAY:?}");
                    time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }
}

/// The single writer: drains the channel in order and applies each update.
/// Malformed paths are dropped with a warning; nothing here is fatal.
async fn apply_updates(store: TopicStore, mut update_rx: mpsc::Receiver<TopicUpdate>) {
    while let Some(update) = update_rx.recv().await {
        match store.ingest(&update.topic, &update.payload) {
            Ok(()) => debug!("Applied update for {}", update.topic),
            Err(StoreError::MalformedPath) => {
                warn!("Dropping update with malformed topic {:?}", update.topic);
            }
            Err(err) => warn!("Dropping update for {}: {err}", update.topic),
        }
    }
}
