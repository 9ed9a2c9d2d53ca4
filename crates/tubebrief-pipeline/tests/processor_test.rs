//! Behavioral tests for the video processing orchestrator.
//!
//! Runs the full pipeline against in-memory repositories, the mock
//! metadata gateway, and the mock artifact generator, covering
//! idempotency, partial-failure degradation, transcript absence, and
//! reference validation.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use tubebrief_core::{
    ChannelMetadata, Error, StructuredSummary, SubscriptionRepository, VideoMetadata,
    VideoRepository,
};
use tubebrief_db::{InMemorySubscriptionRepository, InMemoryVideoRepository};
use tubebrief_generate::MockArtifactGenerator;
use tubebrief_pipeline::{SubscriptionService, VideoProcessor};
use tubebrief_youtube::MockMetadataGateway;

const VIDEO_ID: &str = "abc123XYZ_";
const CHANNEL_ID: &str = "UCabcdEFGHijklMNOpqrstuv";

fn sample_video() -> VideoMetadata {
    VideoMetadata {
        external_video_id: VIDEO_ID.to_string(),
        title: "How Rust Works".to_string(),
        description: Some("A tour of the borrow checker".to_string()),
        external_channel_id: CHANNEL_ID.to_string(),
        channel_title: "Rust Channel".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

struct Fixture {
    gateway: MockMetadataGateway,
    generator: MockArtifactGenerator,
    subscriptions: Arc<InMemorySubscriptionRepository>,
    videos: Arc<InMemoryVideoRepository>,
    processor: VideoProcessor,
}

fn fixture(gateway: MockMetadataGateway, generator: MockArtifactGenerator) -> Fixture {
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let videos = Arc::new(InMemoryVideoRepository::new());
    let processor = VideoProcessor::new(
        Arc::new(gateway.clone()),
        Arc::new(generator.clone()),
        subscriptions.clone(),
        videos.clone(),
    );
    Fixture {
        gateway,
        generator,
        subscriptions,
        videos,
        processor,
    }
}

fn happy_gateway() -> MockMetadataGateway {
    MockMetadataGateway::new()
        .with_video(sample_video())
        .with_transcript(VIDEO_ID, "today we talk about ownership")
}

#[tokio::test]
async fn full_pipeline_finalizes_with_all_artifacts() {
    let f = fixture(happy_gateway(), MockArtifactGenerator::new());
    let user_id = Uuid::now_v7();

    let record = f.processor.process_video(user_id, VIDEO_ID).await.unwrap();

    assert!(record.is_finalized());
    assert_eq!(record.external_video_id, VIDEO_ID);
    assert_eq!(record.title, "How Rust Works");
    assert_eq!(
        record.transcript.as_deref(),
        Some("today we talk about ownership")
    );
    assert!(record.mindmap_url.is_some());
    assert!(record.mp3_url.is_some());

    let summary: StructuredSummary =
        serde_json::from_value(record.summary_json.clone().unwrap()).unwrap();
    assert!(!summary.is_degraded());

    // The subscription was created from the video's channel metadata.
    let subscription = f
        .subscriptions
        .find(user_id, CHANNEL_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(subscription.channel_title, "Rust Channel");
    assert_eq!(record.channel_id, subscription.id);
}

#[tokio::test]
async fn url_reference_resolves_to_the_same_record() {
    let f = fixture(happy_gateway(), MockArtifactGenerator::new());
    let user_id = Uuid::now_v7();

    let record = f
        .processor
        .process_video(user_id, &format!("https://youtu.be/{}", VIDEO_ID))
        .await
        .unwrap();

    assert_eq!(record.external_video_id, VIDEO_ID);
}

#[tokio::test]
async fn second_invocation_short_circuits_with_zero_external_calls() {
    let f = fixture(happy_gateway(), MockArtifactGenerator::new());
    let user_id = Uuid::now_v7();

    let first = f.processor.process_video(user_id, VIDEO_ID).await.unwrap();
    let calls_after_first = f.gateway.call_count();
    let generator_calls_after_first = f.generator.call_count();

    let second = f.processor.process_video(user_id, VIDEO_ID).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(f.gateway.call_count(), calls_after_first);
    assert_eq!(f.generator.call_count(), generator_calls_after_first);
    assert_eq!(f.videos.len(), 1);
}

#[tokio::test]
async fn partial_failure_still_finalizes() {
    let generator = MockArtifactGenerator::new()
        .with_degraded_summary()
        .with_mindmap_failure();
    let f = fixture(happy_gateway(), generator);

    let record = f
        .processor
        .process_video(Uuid::now_v7(), VIDEO_ID)
        .await
        .unwrap();

    assert!(record.is_finalized());
    assert!(record.mindmap_url.is_none());
    assert!(record.mp3_url.is_some());

    let summary: StructuredSummary =
        serde_json::from_value(record.summary_json.clone().unwrap()).unwrap();
    assert!(summary.is_degraded());
}

#[tokio::test]
async fn missing_transcript_aborts_but_keeps_metadata() {
    // Video exists upstream; captions do not.
    let gateway = MockMetadataGateway::new().with_video(sample_video());
    let f = fixture(gateway, MockArtifactGenerator::new());
    let user_id = Uuid::now_v7();

    let err = f
        .processor
        .process_video(user_id, VIDEO_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TranscriptUnavailable(_)));
    assert_eq!(f.generator.call_count(), 0);

    // The record with its metadata stands, unfinalized.
    let subscription = f
        .subscriptions
        .find(user_id, CHANNEL_ID)
        .await
        .unwrap()
        .unwrap();
    let record = f
        .videos
        .find(VIDEO_ID, subscription.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!record.is_finalized());
    assert_eq!(record.title, "How Rust Works");
}

#[tokio::test]
async fn unfinalized_record_is_resumed() {
    // First attempt fails at the transcript stage.
    let gateway = MockMetadataGateway::new().with_video(sample_video());
    let f = fixture(gateway, MockArtifactGenerator::new());
    let user_id = Uuid::now_v7();

    let err = f
        .processor
        .process_video(user_id, VIDEO_ID)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TranscriptUnavailable(_)));

    // Captions appear; the retry resumes the existing record against the
    // same repositories.
    let retry = VideoProcessor::new(
        Arc::new(
            MockMetadataGateway::new()
                .with_video(sample_video())
                .with_transcript(VIDEO_ID, "captions arrived"),
        ),
        Arc::new(f.generator.clone()),
        f.subscriptions.clone(),
        f.videos.clone(),
    );

    let record = retry.process_video(user_id, VIDEO_ID).await.unwrap();

    assert!(record.is_finalized());
    assert_eq!(record.transcript.as_deref(), Some("captions arrived"));
    assert_eq!(f.videos.len(), 1);
}

#[tokio::test]
async fn unknown_video_is_not_found() {
    let f = fixture(MockMetadataGateway::new(), MockArtifactGenerator::new());

    let err = f
        .processor
        .process_video(Uuid::now_v7(), VIDEO_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert!(!err.is_retryable());
    assert!(f.videos.is_empty());
}

#[tokio::test]
async fn gateway_failure_is_retryable() {
    let gateway = MockMetadataGateway::new()
        .with_video(sample_video())
        .with_failing_op("fetch_video");
    let f = fixture(gateway, MockArtifactGenerator::new());

    let err = f
        .processor
        .process_video(Uuid::now_v7(), VIDEO_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Gateway(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn invalid_reference_fails_fast_with_no_network() {
    let f = fixture(MockMetadataGateway::new(), MockArtifactGenerator::new());

    let err = f
        .processor
        .process_video(Uuid::now_v7(), "not a video!!")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidReference(_)));
    assert_eq!(f.gateway.call_count(), 0);
    assert!(f.videos.is_empty());
}

#[tokio::test]
async fn finalizing_a_newer_video_advances_the_subscription_watermark() {
    let newer = VideoMetadata {
        external_video_id: "def456UVW_".to_string(),
        title: "Lifetimes in Depth".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ..sample_video()
    };
    let gateway = happy_gateway()
        .with_video(newer)
        .with_transcript("def456UVW_", "lifetimes elide");
    let f = fixture(gateway, MockArtifactGenerator::new());
    let user_id = Uuid::now_v7();

    f.processor.process_video(user_id, VIDEO_ID).await.unwrap();
    f.processor
        .process_video(user_id, "def456UVW_")
        .await
        .unwrap();

    let subscription = f
        .subscriptions
        .find(user_id, CHANNEL_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        subscription.last_published_at,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );

    // Reprocessing the older video does not move the watermark back.
    f.processor.process_video(user_id, VIDEO_ID).await.unwrap();
    let subscription = f
        .subscriptions
        .find(user_id, CHANNEL_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        subscription.last_published_at,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn processing_for_two_users_keeps_separate_subscriptions() {
    let f = fixture(happy_gateway(), MockArtifactGenerator::new());

    f.processor
        .process_video(Uuid::now_v7(), VIDEO_ID)
        .await
        .unwrap();
    f.processor
        .process_video(Uuid::now_v7(), VIDEO_ID)
        .await
        .unwrap();

    assert_eq!(f.subscriptions.len(), 2);
    assert_eq!(f.videos.len(), 2);
}

// =============================================================================
// SUBSCRIPTION SERVICE
// =============================================================================

fn channel_gateway() -> MockMetadataGateway {
    MockMetadataGateway::new()
        .with_channel(
            CHANNEL_ID,
            ChannelMetadata {
                external_channel_id: CHANNEL_ID.to_string(),
                title: "Rust Channel".to_string(),
            },
        )
        .with_channel(
            "somehandle",
            ChannelMetadata {
                external_channel_id: CHANNEL_ID.to_string(),
                title: "Rust Channel".to_string(),
            },
        )
}

#[tokio::test]
async fn subscribe_by_channel_url_extracts_the_id() {
    let gateway = channel_gateway();
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let service = SubscriptionService::new(Arc::new(gateway.clone()), subscriptions.clone());

    let subscription = service
        .subscribe(
            Uuid::now_v7(),
            "https://youtube.com/channel/UCabcdEFGHijklMNOpqrstuv",
        )
        .await
        .unwrap();

    assert_eq!(subscription.external_channel_id, CHANNEL_ID);
    assert_eq!(gateway.get_calls()[0].input, CHANNEL_ID);
}

#[tokio::test]
async fn subscribe_by_handle_strips_the_at_prefix() {
    let gateway = channel_gateway();
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let service = SubscriptionService::new(Arc::new(gateway.clone()), subscriptions);

    let subscription = service
        .subscribe(Uuid::now_v7(), "https://youtube.com/@somehandle")
        .await
        .unwrap();

    assert_eq!(subscription.external_channel_id, CHANNEL_ID);
    // The gateway saw the handle without its @ prefix.
    assert_eq!(gateway.get_calls()[0].input, "somehandle");
}

#[tokio::test]
async fn duplicate_subscribe_resolves_to_existing_row() {
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let service = SubscriptionService::new(Arc::new(channel_gateway()), subscriptions.clone());
    let user_id = Uuid::now_v7();

    let first = service.subscribe(user_id, CHANNEL_ID).await.unwrap();
    let second = service.subscribe(user_id, CHANNEL_ID).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(subscriptions.len(), 1);
}

#[tokio::test]
async fn subscribe_to_unknown_channel_is_not_found() {
    let service = SubscriptionService::new(
        Arc::new(MockMetadataGateway::new()),
        Arc::new(InMemorySubscriptionRepository::new()),
    );

    let err = service
        .subscribe(Uuid::now_v7(), CHANNEL_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn subscribe_with_garbage_reference_fails_fast() {
    let gateway = MockMetadataGateway::new();
    let service = SubscriptionService::new(
        Arc::new(gateway.clone()),
        Arc::new(InMemorySubscriptionRepository::new()),
    );

    let err = service
        .subscribe(Uuid::now_v7(), "not-a-channel-or-url")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidReference(_)));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn unsubscribe_removes_only_the_owners_row() {
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let service = SubscriptionService::new(Arc::new(channel_gateway()), subscriptions.clone());
    let user_id = Uuid::now_v7();

    let subscription = service.subscribe(user_id, CHANNEL_ID).await.unwrap();

    // Another user cannot delete it.
    let err = service
        .unsubscribe(subscription.id, Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    service.unsubscribe(subscription.id, user_id).await.unwrap();
    assert!(subscriptions.is_empty());
}
