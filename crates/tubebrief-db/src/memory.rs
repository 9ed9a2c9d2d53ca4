//! In-memory repository implementations.
//!
//! Enforce the same uniqueness invariants as the PostgreSQL repositories and
//! back the orchestrator and worker tests without a live database. Always
//! compiled so integration tests in other crates can use them.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use tubebrief_core::defaults::JOB_MAX_RETRIES;
use tubebrief_core::{
    ChannelSubscription, Error, JobRepository, JobStatus, NewVideoRecord, ProcessingJob,
    ProcessingOutcome, Result, SubscriptionRepository, User, UserIdentity, UserRepository,
    VideoRecord, VideoRepository,
};

/// In-memory implementation of UserRepository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert(&self, identity: &UserIdentity) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == identity.email) {
            if identity.first_name.is_some() {
                user.first_name = identity.first_name.clone();
            }
            if identity.last_name.is_some() {
                user.last_name = identity.last_name.clone();
            }
            user.updated_at = Utc::now();
            return Ok(user.clone());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            oauth_refresh_token: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn set_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))?;
        user.oauth_refresh_token = token.map(String::from);
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory implementation of SubscriptionRepository.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Mutex<Vec<ChannelSubscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscriptions, for uniqueness assertions.
    pub fn len(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find(
        &self,
        user_id: Uuid,
        external_channel_id: &str,
    ) -> Result<Option<ChannelSubscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id && s.external_channel_id == external_channel_id)
            .cloned())
    }

    async fn ensure(
        &self,
        user_id: Uuid,
        external_channel_id: &str,
        channel_title: &str,
        last_published_at: Option<DateTime<Utc>>,
    ) -> Result<ChannelSubscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if let Some(existing) = subscriptions
            .iter()
            .find(|s| s.user_id == user_id && s.external_channel_id == external_channel_id)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let subscription = ChannelSubscription {
            id: Uuid::now_v7(),
            user_id,
            external_channel_id: external_channel_id.to_string(),
            channel_title: channel_title.to_string(),
            last_published_at,
            created_at: now,
            updated_at: now,
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChannelSubscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn touch_last_published(&self, id: Uuid, published_at: DateTime<Utc>) -> Result<()> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if let Some(sub) = subscriptions.iter_mut().find(|s| s.id == id) {
            if sub.last_published_at.map_or(true, |t| t < published_at) {
                sub.last_published_at = Some(published_at);
            }
            sub.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let before = subscriptions.len();
        subscriptions.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(subscriptions.len() < before)
    }
}

/// In-memory implementation of VideoRepository.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<Vec<VideoRecord>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, for uniqueness assertions.
    pub fn len(&self) -> usize {
        self.videos.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn find(&self, external_video_id: &str, channel_id: Uuid) -> Result<Option<VideoRecord>> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.external_video_id == external_video_id && v.channel_id == channel_id)
            .cloned())
    }

    async fn insert_or_fetch(&self, new: NewVideoRecord) -> Result<VideoRecord> {
        let mut videos = self.videos.lock().unwrap();
        if let Some(existing) = videos
            .iter()
            .find(|v| v.external_video_id == new.external_video_id && v.channel_id == new.channel_id)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let record = VideoRecord {
            id: Uuid::now_v7(),
            external_video_id: new.external_video_id,
            channel_id: new.channel_id,
            title: new.title,
            description: new.description,
            published_at: new.published_at,
            transcript: None,
            summary_json: None,
            mindmap_url: None,
            mp3_url: None,
            processed_at: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        };
        videos.push(record.clone());
        Ok(record)
    }

    async fn finalize(&self, id: Uuid, outcome: ProcessingOutcome) -> Result<VideoRecord> {
        let mut videos = self.videos.lock().unwrap();
        let record = videos
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| Error::NotFound(format!("video record {}", id)))?;

        record.transcript = Some(outcome.transcript);
        record.summary_json = Some(outcome.summary_json);
        record.mindmap_url = outcome.mindmap_url;
        record.mp3_url = outcome.mp3_url;
        record.processed_at = Some(outcome.processed_at);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn list_for_channel(
        &self,
        channel_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VideoRecord>> {
        let mut matching: Vec<VideoRecord> = self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.channel_id == channel_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

/// In-memory implementation of JobRepository.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<Vec<ProcessingJob>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all jobs, for assertions.
    pub fn all(&self) -> Vec<ProcessingJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn queue(&self, user_id: Uuid, video_reference: &str) -> Result<Uuid> {
        let job = ProcessingJob {
            id: Uuid::now_v7(),
            user_id,
            video_reference: video_reference.to_string(),
            status: JobStatus::Pending,
            error_message: None,
            retry_count: 0,
            max_retries: JOB_MAX_RETRIES,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };
        let id = job.id;
        self.jobs.lock().unwrap().push(job);
        Ok(id)
    }

    async fn claim_next(&self) -> Result<Option<ProcessingJob>> {
        let mut jobs = self.jobs.lock().unwrap();
        let next = jobs
            .iter_mut()
            .filter(|j| j.status == JobStatus::Pending)
            .min_by_key(|j| j.created_at);
        if let Some(job) = next {
            job.status = JobStatus::Running;
            job.started_at = Some(Utc::now());
            return Ok(Some(job.clone()));
        }
        Ok(None)
    }

    async fn complete(&self, id: Uuid) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
            job.error_message = None;
        }
        Ok(())
    }

    async fn fail(&self, id: Uuid, error: &str, retryable: bool) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            job.retry_count += 1;
            job.error_message = Some(error.to_string());
            if retryable && job.retry_count < job.max_retries {
                job.status = JobStatus::Pending;
                job.started_at = None;
            } else {
                job.status = JobStatus::Failed;
                job.completed_at = Some(Utc::now());
            }
        }
        Ok(())
    }
}
