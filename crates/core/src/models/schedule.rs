use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slots::{UnavailableTime, WeeklySchedule};

/// Office-hour settings submitted by a professor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityData {
    pub email: String,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub unavailable_times: Vec<UnavailableTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub professor_id: String,
    pub email: String,
    pub weekly_schedule: WeeklySchedule,
    pub unavailable_times: Vec<UnavailableTime>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub professor_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub student_name: String,
    pub professor_id: String,
    pub day: String,
    pub date: String,
    pub time: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub student_name: String,
    pub professor_id: String,
    pub professor_name: String,
    pub day: String,
    pub date: String,
    pub time: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReservationFilter {
    pub user_id: Option<String>,
}

/// Query for the raw slot generator.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub start: String,
    pub end: String,
    pub interval: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSlots {
    pub slots: Vec<String>,
}

/// Either a day name or a `YYYY-MM-DD` date.
#[derive(Debug, Clone, Deserialize)]
pub struct BookableSlotsQuery {
    pub day: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSlots {
    pub professor_id: String,
    pub day: String,
    pub slots: Vec<String>,
}
