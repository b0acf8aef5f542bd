use crate::infrastructure::queue::rabbitmq::{JOB_QUEUE, RabbitMqService};
use crate::modules::job::dto::{JobEnvelope, JobResponse, JobResultMessage};
use crate::modules::job::service::JobOrchestrator;
use anyhow::Result;
use futures_util::StreamExt;
use lapin::options::BasicAckOptions;
use tracing::{error, info, warn};

/// Decodes one delivery into the reply to publish. Never fails: bad payloads get the error shape.
pub async fn handle_delivery(orchestrator: &JobOrchestrator, payload: &[u8]) -> JobResultMessage {
    match serde_json::from_slice::<JobEnvelope>(payload) {
        Ok(envelope) => {
            let output = orchestrator.run(&envelope.input).await;
            JobResultMessage {
                id: envelope.id,
                output,
            }
        }
        Err(e) => {
            warn!("❌ Failed to parse job: {}", e);
            JobResultMessage {
                id: None,
                output: JobResponse::error(format!("Invalid job payload: {}", e)),
            }
        }
    }
}

pub async fn start_job_consumer(queue: RabbitMqService, orchestrator: JobOrchestrator) -> Result<()> {
    info!("🎥 Starting job consumer...");

    let mut consumer = queue.consume_jobs().await?;

    info!("🎥 Job consumer listening on '{}'", JOB_QUEUE);

    // Sequential on purpose: each job already saturates the CPU with ffmpeg.
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                error!("Consumer error: {}", e);
                continue;
            }
        };

        info!("📦 Received job");
        let reply = handle_delivery(&orchestrator, &delivery.data).await;
        info!(id = ?reply.id, success = reply.output.is_success(), "Job finished");

        if let Err(e) = queue.publish_result(&reply).await {
            error!("Failed to publish job result: {}", e);
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            error!("Failed to ack message: {}", e);
        }
    }

    warn!("Job consumer stream ended");
    Ok(())
}
