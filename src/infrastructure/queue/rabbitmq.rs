//! RabbitMQ ingress for jobs: one durable queue in, one durable queue out.

use crate::modules::job::dto::JobResultMessage;
use anyhow::{Context, Result, anyhow};
use lapin::{
    BasicProperties, Channel, Connection, ConnectionProperties, Consumer, options::*,
    types::FieldTable,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const JOB_QUEUE: &str = "media_jobs";
pub const RESULT_QUEUE: &str = "media_job_results";
const CONSUMER_TAG: &str = "media_worker";

/// Live connection plus the channel opened on it; replaced as a pair on reconnect.
struct Link {
    conn: Connection,
    channel: Channel,
}

#[derive(Clone)]
pub struct RabbitMqService {
    url: String,
    link: Arc<Mutex<Link>>,
}

impl RabbitMqService {
    async fn connect(url: &str) -> Result<Link> {
        info!("Connecting to RabbitMQ");
        let conn = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| anyhow!("Failed to connect to RabbitMQ: {}", e))?;

        let channel = conn
            .create_channel()
            .await
            .map_err(|e| anyhow!("Failed to create channel: {}", e))?;

        for queue in [JOB_QUEUE, RESULT_QUEUE] {
            channel
                .queue_declare(
                    queue,
                    QueueDeclareOptions {
                        durable: true,
                        ..QueueDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(|e| anyhow!("Failed to declare queue {}: {}", queue, e))?;
        }

        info!("Connected to RabbitMQ");
        Ok(Link { conn, channel })
    }

    pub async fn new(url: &str) -> Result<Self> {
        let link = Self::connect(url).await?;

        Ok(Self {
            url: url.to_string(),
            link: Arc::new(Mutex::new(link)),
        })
    }

    async fn reconnect(&self, link: &mut Link) -> Result<()> {
        warn!("RabbitMQ connection dropped, reconnecting...");
        *link = Self::connect(&self.url).await?;
        Ok(())
    }

    /// Starts consuming [`JOB_QUEUE`] with a prefetch of one, so a worker busy
    /// in ffmpeg never holds more than the job it is running.
    pub async fn consume_jobs(&self) -> Result<Consumer> {
        let link = self.link.lock().await;

        link.channel
            .basic_qos(1, BasicQosOptions::default())
            .await
            .map_err(|e| anyhow!("Failed to set prefetch: {}", e))?;

        link.channel
            .basic_consume(
                JOB_QUEUE,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| anyhow!("Failed to create consumer: {}", e))
    }

    async fn send(channel: &Channel, payload: &[u8]) -> Result<()> {
        channel
            .basic_publish(
                "",
                RESULT_QUEUE,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default()
                    .with_delivery_mode(2) // persistent
                    .with_content_type("application/json".into()),
            )
            .await
            .map_err(|e| anyhow!("Failed to publish message: {}", e))?
            .await
            .map_err(|e| anyhow!("Failed to confirm publication: {}", e))?;
        Ok(())
    }

    /// Publishes a job reply to [`RESULT_QUEUE`], reconnecting once if the link is down
    /// or the first attempt fails.
    pub async fn publish_result(&self, message: &JobResultMessage) -> Result<()> {
        let payload = encode_result(message)?;
        let mut link = self.link.lock().await;

        if !link.conn.status().connected() {
            self.reconnect(&mut link).await?;
        }

        if let Err(e) = Self::send(&link.channel, &payload).await {
            warn!("RabbitMQ publish failed: {}. Retrying after reconnect.", e);
            self.reconnect(&mut link).await?;
            Self::send(&link.channel, &payload).await?;
        }

        debug!(id = ?message.id, "Job result published");
        Ok(())
    }
}

fn encode_result(message: &JobResultMessage) -> Result<Vec<u8>> {
    serde_json::to_vec(message).context("Failed to encode job result")
}
