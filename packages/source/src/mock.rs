//! In-memory feedback store with simulated latency.
//!
//! Stands in for a real backend: records live for the life of the
//! process, new submissions are prepended, and every call sleeps for the
//! configured delay before answering.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feedback_map_analytics::compute_stats;
use feedback_map_analytics_models::FeedbackStats;
use feedback_map_feedback_models::{
    DepartmentSelection, FeedbackPriority, FeedbackRecord, FeedbackStatus, FeedbackType,
    GeoLocation, NewFeedback,
};
use feedback_map_geography::resolver::CountyResolver;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::SourceError;
use crate::config::{MockDelays, SourceConfig};
use crate::repository::FeedbackRepository;

/// Feedback store backed by a `Vec`.
#[derive(Debug)]
pub struct MockFeedbackRepository {
    records: RwLock<Vec<FeedbackRecord>>,
    delays: MockDelays,
}

impl MockFeedbackRepository {
    /// An empty store.
    #[must_use]
    pub fn new(delays: MockDelays) -> Self {
        Self::with_records(Vec::new(), delays)
    }

    /// A store holding `records`, which should be newest first.
    #[must_use]
    pub fn with_records(records: Vec<FeedbackRecord>, delays: MockDelays) -> Self {
        Self {
            records: RwLock::new(records),
            delays,
        }
    }

    /// A store holding the built-in sample records.
    #[must_use]
    pub fn seeded(delays: MockDelays) -> Self {
        Self::with_records(sample_records(), delays)
    }

    /// Builds the store described by `config`.
    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        if config.seed_mock_data {
            Self::seeded(config.mock_delay_ms)
        } else {
            Self::new(config.mock_delay_ms)
        }
    }
}

#[async_trait]
impl FeedbackRepository for MockFeedbackRepository {
    async fn list(&self) -> Result<Vec<FeedbackRecord>, SourceError> {
        pause(self.delays.list()).await;
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, submission: NewFeedback) -> Result<FeedbackRecord, SourceError> {
        submission.validate()?;
        pause(self.delays.create()).await;

        let record = build_record(submission, Uuid::new_v4(), Utc::now());
        log::info!(
            "Stored feedback {} ({}) for county {:?}",
            record.reference_number,
            record.feedback_type,
            record.county()
        );
        self.records.write().await.insert(0, record.clone());
        Ok(record)
    }

    async fn stats(&self) -> Result<FeedbackStats, SourceError> {
        pause(self.delays.stats()).await;
        Ok(compute_stats(&self.records.read().await))
    }
}

/// Turns a validated submission into a stored record.
///
/// Display names are filled from the department catalog and, if the
/// location has coordinates but no county, the nearest county is
/// attached.
#[must_use]
pub fn build_record(submission: NewFeedback, id: Uuid, now: DateTime<Utc>) -> FeedbackRecord {
    let mut department = submission.department;
    department.fill_names();

    let location = submission.location.map(|mut location| {
        CountyResolver::default().attach(&mut location);
        location
    });

    FeedbackRecord {
        id: id.to_string(),
        reference_number: reference_number(id, now),
        feedback_type: submission.feedback_type.unwrap_or_default(),
        department,
        priority: submission.priority,
        description: submission.description.trim().to_string(),
        attachments: submission.attachments,
        phone_number: submission.phone_number.trim().to_string(),
        email: submission.email.filter(|e| !e.trim().is_empty()),
        location,
        status: FeedbackStatus::New,
        created_at: now,
        updated_at: now,
        assigned_to: None,
        resolution_notes: None,
        resolution_date: None,
    }
}

/// Human-facing reference, e.g. `FB-20250115-3F2A9C`.
#[must_use]
pub fn reference_number(id: Uuid, now: DateTime<Utc>) -> String {
    let suffix: String = id.simple().to_string().chars().take(6).collect();
    format!("FB-{}-{}", now.format("%Y%m%d"), suffix.to_uppercase())
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

struct Sample {
    county: Option<&'static str>,
    coordinates: Option<(f64, f64)>,
    department: (&'static str, &'static str, &'static str),
    feedback_type: FeedbackType,
    status: FeedbackStatus,
    priority: FeedbackPriority,
    description: &'static str,
    created: (u32, u32),
}

const SAMPLES: &[Sample] = &[
    Sample {
        county: Some("Nairobi"),
        coordinates: Some((-1.2864, 36.8172)),
        department: ("interior", "immigration", "passport-application"),
        feedback_type: FeedbackType::Complaint,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::High,
        description: "Passport application has been pending for over two months.",
        created: (3, 12),
    },
    Sample {
        county: None,
        coordinates: None,
        department: ("ict", "ecitizen", "payments"),
        feedback_type: FeedbackType::Bug,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::Medium,
        description: "Payment was deducted but the receipt never arrived.",
        created: (3, 10),
    },
    Sample {
        county: None,
        coordinates: Some((-1.5221, 37.2632)),
        department: ("finance", "kra", "pin-registration"),
        feedback_type: FeedbackType::Feedback,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::Low,
        description: "PIN registration at the local office was quick and helpful.",
        created: (3, 8),
    },
    Sample {
        county: Some("Meru"),
        coordinates: Some((0.0515, 37.6456)),
        department: ("ict", "huduma", "queues"),
        feedback_type: FeedbackType::Feedback,
        status: FeedbackStatus::Resolved,
        priority: FeedbackPriority::Low,
        description: "The new queue system at the Huduma Centre has cut waiting times.",
        created: (3, 1),
    },
    Sample {
        county: Some("Kisii"),
        coordinates: Some((-0.6833, 34.7667)),
        department: ("water", "water-supply", "billing"),
        feedback_type: FeedbackType::Complaint,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::High,
        description: "Billed for water during weeks when supply was cut off.",
        created: (2, 22),
    },
    Sample {
        county: Some("Kakamega"),
        coordinates: Some((0.2833, 34.75)),
        department: ("energy", "kplc", "outages"),
        feedback_type: FeedbackType::Complaint,
        status: FeedbackStatus::InProgress,
        priority: FeedbackPriority::Medium,
        description: "Repeated power outages in the town centre every evening.",
        created: (2, 20),
    },
    Sample {
        county: Some("Uasin Gishu"),
        coordinates: Some((0.5167, 35.2833)),
        department: ("education", "higher-education", "helb"),
        feedback_type: FeedbackType::Suggestion,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::Medium,
        description: "HELB should send status updates by SMS.",
        created: (2, 15),
    },
    Sample {
        county: Some("Nakuru"),
        coordinates: Some((-0.3, 36.0667)),
        department: ("health", "hospitals", "admission"),
        feedback_type: FeedbackType::Feedback,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::Medium,
        description: "Admission desk staff were courteous but understaffed.",
        created: (2, 10),
    },
    Sample {
        county: Some("Kisumu"),
        coordinates: Some((-0.1, 34.75)),
        department: ("water", "water-supply", "billing"),
        feedback_type: FeedbackType::Complaint,
        status: FeedbackStatus::Resolved,
        priority: FeedbackPriority::Medium,
        description: "Estimated water bills far above actual usage.",
        created: (2, 2),
    },
    Sample {
        county: Some("Mombasa"),
        coordinates: Some((-4.0435, 39.6682)),
        department: ("transport", "roads", "maintenance"),
        feedback_type: FeedbackType::Complaint,
        status: FeedbackStatus::New,
        priority: FeedbackPriority::High,
        description: "Roads in the CBD need urgent maintenance.",
        created: (1, 18),
    },
    Sample {
        county: Some("Nairobi"),
        coordinates: Some((-1.2864, 36.8172)),
        department: ("interior", "immigration", "passport-renewal"),
        feedback_type: FeedbackType::Complaint,
        status: FeedbackStatus::InProgress,
        priority: FeedbackPriority::Medium,
        description: "Renewal booking slots are always full.",
        created: (1, 15),
    },
];

/// The built-in sample records, newest first.
#[must_use]
pub fn sample_records() -> Vec<FeedbackRecord> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let (month, day) = sample.created;
            let created = Utc
                .with_ymd_and_hms(2025, month, day, 9, 0, 0)
                .single()
                .unwrap_or_default();

            let (department_id, sub_department_id, service_id) = sample.department;
            let mut record = build_record(
                NewFeedback {
                    phone_number: format!("+2547000000{i:02}"),
                    feedback_type: Some(sample.feedback_type),
                    department: DepartmentSelection {
                        department_id: department_id.to_string(),
                        sub_department_id: sub_department_id.to_string(),
                        service_id: service_id.to_string(),
                        ..DepartmentSelection::default()
                    },
                    description: sample.description.to_string(),
                    priority: sample.priority,
                    location: sample.coordinates.map(|(lat, lng)| GeoLocation {
                        county: sample.county.map(str::to_string),
                        ..GeoLocation::new(lat, lng)
                    }),
                    ..NewFeedback::default()
                },
                sample_id(i),
                created,
            );
            record.status = sample.status;
            record
        })
        .collect()
}

/// Stable, well-spread id for the `index`th sample, so every sample gets
/// its own reference number across restarts.
fn sample_id(index: usize) -> Uuid {
    const SPREAD: u128 = 0x9E37_79B9_7F4A_7C15_F39C_C060_5CED_C835;
    Uuid::from_u128((index as u128 + 1).wrapping_mul(SPREAD))
}
