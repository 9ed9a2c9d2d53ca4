//! Integration tests for the background job worker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use tubebrief_core::config::WorkerConfig;
use tubebrief_core::{JobRepository, JobStatus, VideoMetadata};
use tubebrief_db::{InMemoryJobRepository, InMemorySubscriptionRepository, InMemoryVideoRepository};
use tubebrief_generate::MockArtifactGenerator;
use tubebrief_pipeline::{JobWorker, VideoProcessor};
use tubebrief_youtube::MockMetadataGateway;

const VIDEO_ID: &str = "abc123XYZ_";

fn sample_video() -> VideoMetadata {
    VideoMetadata {
        external_video_id: VIDEO_ID.to_string(),
        title: "How Rust Works".to_string(),
        description: None,
        external_channel_id: "UCabcdEFGHijklMNOpqrstuv".to_string(),
        channel_title: "Rust Channel".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

fn processor(gateway: MockMetadataGateway) -> Arc<VideoProcessor> {
    Arc::new(VideoProcessor::new(
        Arc::new(gateway),
        Arc::new(MockArtifactGenerator::new()),
        Arc::new(InMemorySubscriptionRepository::new()),
        Arc::new(InMemoryVideoRepository::new()),
    ))
}

fn test_config() -> WorkerConfig {
    WorkerConfig {
        poll_interval_ms: 10,
        max_concurrent_jobs: 2,
        enabled: true,
    }
}

/// Poll until every job reaches a terminal state or the deadline passes.
async fn wait_for_settled(jobs: &InMemoryJobRepository) {
    for _ in 0..200 {
        let settled = jobs
            .all()
            .iter()
            .all(|j| matches!(j.status, JobStatus::Completed | JobStatus::Failed));
        if settled {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("jobs did not settle in time");
}

#[tokio::test]
async fn worker_completes_a_processable_job() {
    let jobs = Arc::new(InMemoryJobRepository::new());
    let gateway = MockMetadataGateway::new()
        .with_video(sample_video())
        .with_transcript(VIDEO_ID, "a transcript");

    jobs.queue(Uuid::now_v7(), VIDEO_ID).await.unwrap();

    let handle = JobWorker::new(jobs.clone(), processor(gateway), test_config()).start();
    wait_for_settled(&jobs).await;
    handle.shutdown().await.unwrap();

    let all = jobs.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, JobStatus::Completed);
    assert!(all[0].completed_at.is_some());
}

#[tokio::test]
async fn worker_fails_a_job_for_a_missing_video_without_retrying() {
    let jobs = Arc::new(InMemoryJobRepository::new());

    // Gateway knows nothing: NotFound, which is not retry-eligible.
    jobs.queue(Uuid::now_v7(), VIDEO_ID).await.unwrap();

    let handle = JobWorker::new(jobs.clone(), processor(MockMetadataGateway::new()), test_config())
        .start();
    wait_for_settled(&jobs).await;
    handle.shutdown().await.unwrap();

    let all = jobs.all();
    assert_eq!(all[0].status, JobStatus::Failed);
    assert_eq!(all[0].retry_count, 1);
    assert!(all[0].error_message.as_deref().unwrap().contains("found"));
}

#[tokio::test]
async fn worker_retries_gateway_failures_until_the_budget_runs_out() {
    let jobs = Arc::new(InMemoryJobRepository::new());
    let gateway = MockMetadataGateway::new()
        .with_video(sample_video())
        .with_failing_op("fetch_video");

    jobs.queue(Uuid::now_v7(), VIDEO_ID).await.unwrap();

    let handle = JobWorker::new(jobs.clone(), processor(gateway), test_config()).start();
    wait_for_settled(&jobs).await;
    handle.shutdown().await.unwrap();

    let all = jobs.all();
    assert_eq!(all[0].status, JobStatus::Failed);
    assert_eq!(all[0].retry_count, all[0].max_retries);
}

#[tokio::test]
async fn disabled_worker_leaves_the_queue_alone() {
    let jobs = Arc::new(InMemoryJobRepository::new());
    jobs.queue(Uuid::now_v7(), VIDEO_ID).await.unwrap();

    let config = WorkerConfig {
        enabled: false,
        ..test_config()
    };
    let handle = JobWorker::new(jobs.clone(), processor(MockMetadataGateway::new()), config).start();

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.shutdown().await.unwrap();

    assert_eq!(jobs.all()[0].status, JobStatus::Pending);
}
