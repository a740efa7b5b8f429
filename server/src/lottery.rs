//! # Lottery Model
//!
//! The stored lottery document plus every state transition it supports:
//! creation, allow-listed partial update, participant registration and the
//! one-time draw. All transitions are plain functions over the document so
//! the HTTP layer stays a thin fetch-mutate-save wrapper.
//!
//! ## Document shape
//! - Wire and stored field names are camelCase (`startDate`, `maxParticipants`).
//! - `excludedNumbers` and `result` are integers; any zero-padded display is
//!   a client concern.
//! - `isOpen` only ever transitions open -> closed, either by a draw or by an
//!   explicit close through [`UpdateLottery`].

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{engine, error::AppError};

pub const DEFAULT_START_NUMBER: i32 = 1;
pub const DEFAULT_END_NUMBER: i32 = 99;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub registration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lottery {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub prize: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub draw_date: NaiveDate,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
    pub is_open: bool,
    #[serde(default)]
    pub excluded_numbers: Vec<i32>,
    pub start_number: i32,
    pub end_number: i32,
    pub result: Option<i32>,
    pub winner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLottery {
    pub title: String,
    pub description: String,
    pub prize: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub draw_date: NaiveDate,
    pub max_participants: u32,
    #[serde(default)]
    pub excluded_numbers: Vec<i32>,
    pub start_number: Option<i32>,
    pub end_number: Option<i32>,
}

/// Allow-listed PATCH body. Anything not listed here (`result`, `winner`,
/// `participants`, timestamps, `id`) is simply not writable.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLottery {
    pub title: Option<String>,
    pub description: Option<String>,
    pub prize: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub draw_date: Option<NaiveDate>,
    pub max_participants: Option<u32>,
    pub excluded_numbers: Option<Vec<i32>>,
    pub start_number: Option<i32>,
    pub end_number: Option<i32>,
    pub is_open: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParticipant {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOptions {
    pub excluded_numbers: Option<Vec<i32>>,
    pub start_number: Option<i32>,
    pub end_number: Option<i32>,
    pub fixed_result: Option<i32>,
}

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn check_dates(start: NaiveDate, end: NaiveDate, draw: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation(
            "endDate must not be before startDate".to_string(),
        ));
    }
    if draw < start {
        return Err(AppError::Validation(
            "drawDate must not be before startDate".to_string(),
        ));
    }
    Ok(())
}

fn check_range(start: i32, end: i32) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::Validation(
            "startNumber must be less than endNumber".to_string(),
        ));
    }
    Ok(())
}

fn normalize_excluded(mut numbers: Vec<i32>) -> Vec<i32> {
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

impl Lottery {
    pub fn create(req: CreateLottery, now: DateTime<Utc>) -> Result<Self, AppError> {
        let title = require_text("title", &req.title)?;
        let description = require_text("description", &req.description)?;
        let prize = require_text("prize", &req.prize)?;

        if req.max_participants == 0 {
            return Err(AppError::Validation(
                "maxParticipants must be at least 1".to_string(),
            ));
        }

        check_dates(req.start_date, req.end_date, req.draw_date)?;

        let start_number = req.start_number.unwrap_or(DEFAULT_START_NUMBER);
        let end_number = req.end_number.unwrap_or(DEFAULT_END_NUMBER);
        check_range(start_number, end_number)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description,
            prize,
            start_date: req.start_date,
            end_date: req.end_date,
            draw_date: req.draw_date,
            max_participants: req.max_participants,
            participants: Vec::new(),
            is_open: true,
            excluded_numbers: normalize_excluded(req.excluded_numbers),
            start_number,
            end_number,
            result: None,
            winner: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges a PATCH body onto the document. Setting `isOpen: false` closes
    /// the lottery without drawing, so `result`/`winner` stay untouched.
    pub fn apply_update(&mut self, patch: UpdateLottery, now: DateTime<Utc>) -> Result<(), AppError> {
        match patch.is_open {
            Some(true) if !self.is_open => {
                return Err(AppError::Validation(
                    "a closed lottery cannot be reopened".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(title) = &patch.title {
            self.title = require_text("title", title)?;
        }
        if let Some(description) = &patch.description {
            self.description = require_text("description", description)?;
        }
        if let Some(prize) = &patch.prize {
            self.prize = require_text("prize", prize)?;
        }

        let start_date = patch.start_date.unwrap_or(self.start_date);
        let end_date = patch.end_date.unwrap_or(self.end_date);
        let draw_date = patch.draw_date.unwrap_or(self.draw_date);
        check_dates(start_date, end_date, draw_date)?;
        self.start_date = start_date;
        self.end_date = end_date;
        self.draw_date = draw_date;

        if let Some(cap) = patch.max_participants {
            if cap == 0 {
                return Err(AppError::Validation(
                    "maxParticipants must be at least 1".to_string(),
                ));
            }
            if (cap as usize) < self.participants.len() {
                return Err(AppError::Validation(
                    "maxParticipants cannot be below the current participant count".to_string(),
                ));
            }
            self.max_participants = cap;
        }

        let start_number = patch.start_number.unwrap_or(self.start_number);
        let end_number = patch.end_number.unwrap_or(self.end_number);
        check_range(start_number, end_number)?;
        self.start_number = start_number;
        self.end_number = end_number;

        if let Some(excluded) = patch.excluded_numbers {
            self.excluded_numbers = normalize_excluded(excluded);
        }

        if patch.is_open == Some(false) {
            self.is_open = false;
        }

        self.updated_at = now;
        Ok(())
    }

    pub fn register(&mut self, req: NewParticipant, now: DateTime<Utc>) -> Result<(), AppError> {
        let name = require_text("name", &req.name)?;
        let phone = require_text("phone", &req.phone)?;
        let email = require_text("email", &req.email)?;

        if !self.is_open {
            return Err(AppError::LotteryClosed);
        }
        if self.participants.len() >= self.max_participants as usize {
            return Err(AppError::CapacityExceeded);
        }
        if self
            .participants
            .iter()
            .any(|p| p.phone == phone || p.email == email)
        {
            return Err(AppError::DuplicateParticipant);
        }

        self.participants.push(Participant {
            name,
            phone,
            email,
            registration_date: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Runs the one-time draw. Range and exclusion overrides from the request
    /// are persisted onto the document before drawing, matching how clients
    /// configure the draw at reveal time.
    pub fn execute_draw<R: Rng>(
        &mut self,
        opts: DrawOptions,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if !self.is_open {
            return Err(AppError::AlreadyDrawn);
        }

        if let Some(excluded) = opts.excluded_numbers {
            self.excluded_numbers = normalize_excluded(excluded);
        }
        if let Some(start) = opts.start_number {
            self.start_number = start;
        }
        if let Some(end) = opts.end_number {
            self.end_number = end;
        }

        let outcome = engine::draw(
            self.start_number,
            self.end_number,
            &self.excluded_numbers,
            &self.participants,
            opts.fixed_result,
            rng,
        )?;

        self.is_open = false;
        self.result = Some(outcome.result);
        self.winner = Some(outcome.winner);
        self.updated_at = now;
        Ok(())
    }
}

/// Newest-created-first, the order the listing endpoint serves.
pub fn newest_first(mut lotteries: Vec<Lottery>) -> Vec<Lottery> {
    lotteries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    lotteries
}

/// The newest lottery still open for registration, if any.
pub fn current(lotteries: Vec<Lottery>) -> Option<Lottery> {
    lotteries
        .into_iter()
        .filter(|l| l.is_open)
        .max_by_key(|l| l.created_at)
}
