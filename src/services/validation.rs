//! Field validation for placed entries.
//!
//! Create and update go through the same [`resolve`] pass: every field is taken from
//! the submitted form when present, otherwise from the stored record (update) or a
//! default (create). The resolved values are then checked as a whole, so an update
//! that flips priority on is held to the same rank rule as a create.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::entities::placed_entry::{self, EntryKind, EntryStatus};
use crate::models::placement::{
    RankScope, ScheduleRule, AUTOPLAY_SPEED_RANGE, DEFAULT_AUTOPLAY_SPEED, TILE_RANGE,
};

/// Raw text fields of a create or update submission, keyed by their wire names.
#[derive(Debug, Default, Clone)]
pub struct EntryForm {
    pub brand_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tile: Option<String>,
    pub rank: Option<String>,
    pub priority: Option<String>,
    pub autoplay_speed: Option<String>,
    pub link: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    pub status: Option<String>,
}

impl EntryForm {
    /// Stores a submitted field. Unknown names are ignored; blank values count as absent.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "brandName" => &mut self.brand_name,
            "description" => &mut self.description,
            "type" | "category" => &mut self.category,
            "tile" => &mut self.tile,
            "rank" => &mut self.rank,
            "priority" => &mut self.priority,
            "autoplaySpeed" => &mut self.autoplay_speed,
            "link" => &mut self.link,
            "startDateTime" => &mut self.start_date_time,
            "endDateTime" => &mut self.end_date_time,
            "status" => &mut self.status,
            _ => return,
        };
        let value = value.trim();
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, format!("{field} is required"))
    }
}

/// Fully resolved field values, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub brand_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tile: Option<i32>,
    pub rank: i32,
    pub priority: bool,
    pub autoplay_speed: Option<i32>,
    pub link: String,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub status: Option<EntryStatus>,
}

impl EntryDraft {
    pub fn apply_to(self, entry: &mut placed_entry::Model) {
        entry.brand_name = self.brand_name;
        entry.description = self.description;
        entry.category = self.category;
        entry.tile = self.tile;
        entry.rank = self.rank;
        entry.priority = self.priority;
        entry.autoplay_speed = self.autoplay_speed;
        entry.link = self.link;
        entry.start_date_time = self.start_date_time;
        entry.end_date_time = self.end_date_time;
        entry.status = self.status;
    }

    /// Whether this draft takes part in a rank uniqueness check for `kind`.
    pub fn claims_rank(&self, kind: EntryKind) -> bool {
        match kind.placement().rank_scope {
            RankScope::Unscoped => false,
            RankScope::PerTile => self.priority,
            RankScope::Global => true,
        }
    }
}

pub fn validate_create(kind: EntryKind, form: &EntryForm) -> Result<EntryDraft, Vec<FieldError>> {
    resolve(kind, form, None)
}

pub fn validate_update(
    kind: EntryKind,
    form: &EntryForm,
    existing: &placed_entry::Model,
) -> Result<EntryDraft, Vec<FieldError>> {
    resolve(kind, form, Some(existing))
}

fn resolve(
    kind: EntryKind,
    form: &EntryForm,
    existing: Option<&placed_entry::Model>,
) -> Result<EntryDraft, Vec<FieldError>> {
    let placement = kind.placement();
    let mut errors = Vec::new();

    let (brand_name, description, category) = if placement.branded {
        (
            text(
                "brandName",
                &form.brand_name,
                existing.and_then(|e| e.brand_name.clone()),
                true,
                &mut errors,
            ),
            text(
                "description",
                &form.description,
                existing.and_then(|e| e.description.clone()),
                true,
                &mut errors,
            ),
            text(
                "type",
                &form.category,
                existing.and_then(|e| e.category.clone()),
                placement.category_required,
                &mut errors,
            )
            .or_else(|| Some(String::new())),
        )
    } else {
        (None, None, None)
    };

    let link = text(
        "link",
        &form.link,
        existing.map(|e| e.link.clone()),
        true,
        &mut errors,
    )
    .unwrap_or_default();

    let tile = if placement.tiled {
        match form.tile.as_deref() {
            Some(raw) => match parse_int(raw) {
                Some(tile) if TILE_RANGE.contains(&tile) => Some(tile),
                _ => {
                    errors.push(FieldError::new("tile", "Tile must be between 1 and 28"));
                    None
                }
            },
            None => {
                let stored = existing.and_then(|e| e.tile);
                if stored.is_none() {
                    errors.push(FieldError::missing("tile"));
                }
                stored
            }
        }
    } else {
        None
    };

    let priority = if placement.branded {
        match form.priority.as_deref() {
            Some(raw) => match parse_bool(raw) {
                Some(priority) => priority,
                None => {
                    errors.push(FieldError::new("priority", "Priority must be true or false"));
                    false
                }
            },
            None => match existing {
                Some(entry) => entry.priority,
                None => {
                    errors.push(FieldError::missing("priority"));
                    false
                }
            },
        }
    } else {
        false
    };

    // Branded kinds only rank priority entries; PiP videos are always ranked.
    let ranked = priority || !placement.branded;
    let rank = if ranked {
        let submitted = form.rank.as_deref().map(parse_int);
        let resolved = match submitted {
            Some(parsed) => parsed,
            None => existing.map(|e| e.rank),
        };
        match resolved {
            Some(rank) if rank >= 1 => rank,
            _ if placement.branded => {
                errors.push(FieldError::new(
                    "rank",
                    "Rank must be at least 1 when priority is enabled",
                ));
                0
            }
            _ => {
                errors.push(FieldError::new(
                    "rank",
                    "Rank is required and must be at least 1",
                ));
                0
            }
        }
    } else {
        0
    };

    let autoplay_speed = if placement.branded {
        match form.autoplay_speed.as_deref() {
            Some(raw) => match parse_int(raw) {
                Some(speed) if AUTOPLAY_SPEED_RANGE.contains(&speed) => Some(speed),
                _ => {
                    errors.push(FieldError::new(
                        "autoplaySpeed",
                        "Autoplay speed must be between 1000 and 30000 ms",
                    ));
                    None
                }
            },
            None => Some(
                existing
                    .and_then(|e| e.autoplay_speed)
                    .unwrap_or(DEFAULT_AUTOPLAY_SPEED),
            ),
        }
    } else {
        None
    };

    let status = if placement.has_status {
        match form.status.as_deref() {
            Some(raw) => match parse_status(raw) {
                Some(status) => Some(status),
                None => {
                    errors.push(FieldError::new(
                        "status",
                        "Status must be either active or inactive",
                    ));
                    None
                }
            },
            None => Some(
                existing
                    .and_then(|e| e.status)
                    .unwrap_or(EntryStatus::Active),
            ),
        }
    } else {
        None
    };

    let (start_date_time, end_date_time) = match placement.schedule {
        ScheduleRule::None => (None, None),
        rule => resolve_window(rule, form, existing, &mut errors),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(EntryDraft {
        brand_name,
        description,
        category,
        tile,
        rank,
        priority,
        autoplay_speed,
        link,
        start_date_time,
        end_date_time,
        status,
    })
}

fn text(
    field: &'static str,
    submitted: &Option<String>,
    stored: Option<String>,
    required: bool,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = submitted.clone().or(stored);
    if value.is_none() && required {
        errors.push(FieldError::missing(field));
    }
    value
}

fn resolve_window(
    rule: ScheduleRule,
    form: &EntryForm,
    existing: Option<&placed_entry::Model>,
    errors: &mut Vec<FieldError>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let mut bound = |field: &'static str,
                     label: &str,
                     submitted: &Option<String>,
                     stored: Option<DateTime<Utc>>| match submitted.as_deref() {
        Some(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    field,
                    format!("Invalid {label} date-time format"),
                ));
            }
            (parsed, true)
        }
        None => (stored, false),
    };

    let (start, start_given) = bound(
        "startDateTime",
        "start",
        &form.start_date_time,
        existing.and_then(|e| e.start_date_time),
    );
    let (end, end_given) = bound(
        "endDateTime",
        "end",
        &form.end_date_time,
        existing.and_then(|e| e.end_date_time),
    );

    // A malformed bound has already been reported.
    let malformed = (start_given && start.is_none()) || (end_given && end.is_none());
    if malformed {
        return (start, end);
    }

    match (start, end) {
        (Some(start), Some(end)) => {
            if end <= start {
                errors.push(FieldError::new(
                    "endDateTime",
                    "End date-time must be after start date-time",
                ));
            }
            (Some(start), Some(end))
        }
        (None, None) if rule == ScheduleRule::Optional => (None, None),
        _ => {
            errors.push(FieldError::new(
                "startDateTime",
                "Start date-time and End date-time are required",
            ));
            (start, end)
        }
    }
}

fn parse_int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        // Form encoders sometimes send "3.0" for integral numbers.
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
            .map(|n| n as i32)
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_status(raw: &str) -> Option<EntryStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "active" => Some(EntryStatus::Active),
        "inactive" => Some(EntryStatus::Inactive),
        _ => None,
    }
}

/// Accepts RFC 3339 plus the zone-less forms emitted by `datetime-local` inputs,
/// which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
